//! Auth gate for `/api/*`.
//!
//! Every gated request goes through two checkpoints: the user-creation route
//! (`POST /api/user`) is forwarded untouched, everything else has its token
//! handed to a [`TokenVerifier`]. A verified username is attached to the
//! request as [`AuthUser`].
//!
//! Under [`GatePolicy::PassThrough`] (the default) a failed verification is
//! still forwarded, exactly like a successful one minus the attached user.
//! [`GatePolicy::Reject`] answers `401` instead.

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{header, request::Parts, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::constants::{USER_CREATE_PATH, USER_TOKEN_KEY};
use crate::error::AppError;
use crate::security::verify_token;
use crate::AppState;

/// What the gate does with a request whose token did not verify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePolicy {
    /// Forward anyway
    #[default]
    PassThrough,
    /// Answer 401
    Reject,
}

/// Checks a token and yields the username it belongs to
///
/// The gate calls this exactly once per request it does not bypass.
pub trait TokenVerifier: Send + Sync {
    /// # Arguments
    /// * `token` - The raw token, or an empty string when none was sent
    ///
    /// # Returns
    /// * The verified username, or `None` if the token must not be trusted
    fn verify(&self, token: &str) -> Option<String>;
}

/// Verifies tokens produced by [`crate::security::issue_token`]
///
/// Expiry is checked against the wall clock at verification time.
pub struct HmacTokenVerifier {
    secret: String,
}

impl HmacTokenVerifier {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl TokenVerifier for HmacTokenVerifier {
    fn verify(&self, token: &str) -> Option<String> {
        if token.is_empty() {
            return None;
        }
        verify_token(token, &self.secret, Utc::now().timestamp())
    }
}

/// Username attached by the gate after a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// True only for the user-creation route with a creation verb
///
/// # Arguments
/// * `method` - The request method
/// * `path` - The full request path, including the `/api` prefix
pub fn is_bypassed(method: &Method, path: &str) -> bool {
    method == Method::POST && path == USER_CREATE_PATH
}

/// Token from the `USER_TOKEN_KEY` header, falling back to the cookie
///
/// Blank header values count as absent so a stale empty header does not
/// shadow a valid cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_TOKEN_KEY)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| cookie_value(headers, USER_TOKEN_KEY))
}

/// Value of one cookie across all `Cookie` headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Path as the client sent it, before any `nest` prefix was stripped
fn request_path(req: &Request) -> String {
    req.extensions()
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string())
}

/// Middleware wrapping everything under `/api`
///
/// Layered over the nested API router including its fallback, so unknown
/// paths and unsupported methods are verified like any other request.
///
/// # Security Note
/// Under [`GatePolicy::PassThrough`] this only attaches an identity; it never
/// stops a request. Handlers that take [`AuthUser`] still answer `401`, but a
/// handler without it serves anonymous callers.
pub async fn auth_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = request_path(&req);
    if is_bypassed(req.method(), &path) {
        return next.run(req).await;
    }

    let token = extract_token(req.headers()).unwrap_or_default();
    match state.verifier.verify(&token) {
        Some(username) => {
            req.extensions_mut().insert(AuthUser(username));
        }
        None => {
            tracing::debug!("Token verification failed for {} {}", req.method(), path);
            if state.config.gate_policy == GatePolicy::Reject {
                return AppError::Unauthorized.into_response();
            }
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::issue_token;
    use axum::http::HeaderValue;

    #[test]
    fn test_bypass_only_for_user_creation() {
        assert!(is_bypassed(&Method::POST, "/api/user"));
        assert!(!is_bypassed(&Method::GET, "/api/user"));
        assert!(!is_bypassed(&Method::PUT, "/api/user"));
        assert!(!is_bypassed(&Method::POST, "/api/user/statistic"));
        assert!(!is_bypassed(&Method::POST, "/api/refreshCount"));
    }

    #[test]
    fn test_request_path_sees_through_nesting() {
        let mut req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/user")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(request_path(&req), "/user");

        req.extensions_mut()
            .insert(OriginalUri("/api/user".parse().unwrap()));
        assert_eq!(request_path(&req), "/api/user");
        assert!(is_bypassed(req.method(), &request_path(&req)));
    }

    #[test]
    fn test_extract_token_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_TOKEN_KEY, HeaderValue::from_static("from-header"));
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("diary-token=from-cookie"),
        );
        assert_eq!(extract_token(&headers), Some("from-header".to_string()));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; diary-token=abc.1.ff; other=x"),
        );
        assert_eq!(extract_token(&headers), Some("abc.1.ff".to_string()));
    }

    #[test]
    fn test_extract_token_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("diary-token="));
        assert_eq!(extract_token(&headers), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_hmac_verifier() {
        let verifier = HmacTokenVerifier::new("secret".to_string());
        let token = issue_token("alice", Utc::now().timestamp() + 60, "secret");
        assert_eq!(verifier.verify(&token), Some("alice".to_string()));
        assert_eq!(verifier.verify(""), None);

        let other = issue_token("alice", Utc::now().timestamp() + 60, "other");
        assert_eq!(verifier.verify(&other), None);
    }
}
