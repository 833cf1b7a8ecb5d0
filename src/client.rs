//! Typed client for the diary API.
//!
//! [`DiaryClient`] binds endpoints to response types on top of one generic
//! [`DiaryClient::request`]. The wire is abstracted as a [`Transport`] so the
//! hooks can be driven without a server. Failures come back exactly as the
//! transport or the status check produced them: no retries, no caching.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::constants::USER_TOKEN_KEY;
use crate::models::{DiaryMonthResData, ExportRow, JsonExportForm, RespData};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    /// Path relative to the server root, e.g. `/api/month/202401`
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends one request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ClientError>;
}

/// `reqwest`-backed transport against a base URL
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send `token` in the `USER_TOKEN_KEY` header on every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ClientError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method, url);
        if let Some(token) = &self.token {
            builder = builder.header(USER_TOKEN_KEY, token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(Box::new(e)))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(Box::new(e)))?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

pub struct DiaryClient<T> {
    transport: T,
}

impl<T: Transport> DiaryClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and decode a 2xx body as `R`
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<R, ClientError> {
        let response = self
            .transport
            .send(TransportRequest {
                method,
                path: path.to_string(),
                body,
            })
            .await?;

        if !(200..300).contains(&response.status) {
            return Err(ClientError::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Entries of one `YYYYMM` month
    pub async fn diary_list_for(
        &self,
        month: &str,
    ) -> Result<RespData<DiaryMonthResData>, ClientError> {
        self.request(Method::GET, &format!("/api/month/{}", month), None)
            .await
    }

    pub async fn export_as_json(&self, form: &JsonExportForm) -> Result<Vec<ExportRow>, ClientError> {
        let body = serde_json::to_value(form)?;
        self.request(Method::POST, "/api/export/json", Some(body))
            .await
    }

    /// Ask the server to recount words, returning the new total
    pub async fn refresh_word_count(&self) -> Result<u64, ClientError> {
        self.request(Method::POST, "/api/refreshCount", None).await
    }
}
