use axum::{extract::State, Json};
use serde::Serialize;

use crate::db;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    /// Whether the first user has seeded the app config yet
    pub initialized: bool,
    pub version: &'static str,
}

/// Liveness plus a read of the app config table
///
/// A store that opens but cannot read the config row counts as disconnected.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db = state.db.clone();
    let check = tokio::task::spawn_blocking(move || db::app_config::get_app_config(&db)).await;

    let (database, initialized) = match check {
        Ok(Ok(config)) => ("connected", config.is_some()),
        Ok(Err(e)) => {
            tracing::error!("Database health check failed: {:?}", e);
            ("disconnected", false)
        }
        Err(e) => {
            tracing::error!("Health check task failed: {:?}", e);
            ("error", false)
        }
    };

    Json(HealthResponse {
        status: if database == "connected" { "healthy" } else { "unhealthy" },
        database,
        initialized,
        version: env!("CARGO_PKG_VERSION"),
    })
}
