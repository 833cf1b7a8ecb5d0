//! Diary Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod auth;
pub mod client;
pub mod config;
pub mod constants;
pub mod dates;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod views;

pub use auth::{AuthUser, GatePolicy, HmacTokenVerifier, TokenVerifier};
pub use config::Config;
pub use dates::{Clock, SystemClock};
pub use db::{open_database, Db};
pub use error::{AppError, Result};

use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub verifier: Arc<dyn TokenVerifier>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// State backed by HMAC token verification and the system clock
    pub fn new(db: Db, config: Config) -> Self {
        let verifier = Arc::new(HmacTokenVerifier::new(config.token_secret.clone()));
        Self {
            db,
            config,
            verifier,
            clock: Arc::new(SystemClock),
        }
    }
}
