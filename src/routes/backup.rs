use axum::{extract::State, Json};
use chrono::Utc;

use crate::dates::day_key;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::backup::backup_title;
use crate::models::{BackupDetail, CreateBackupRequest};
use crate::{AppState, AuthUser};

/// Snapshot every entry of the caller
///
/// The body is optional; without a title the backup is named after today.
pub async fn create_backup(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    payload: Option<Json<CreateBackupRequest>>,
) -> Result<Json<BackupDetail>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let title = backup_title(payload.title.as_deref(), &day_key(state.clock.today()))
        .map_err(AppError::InvalidInput)?;

    let db = state.db.clone();
    let detail = tokio::task::spawn_blocking(move || {
        db::backups::create_backup(&db, &username, title, Utc::now().timestamp_millis())
    })
    .await??;

    Ok(Json(detail))
}

/// Backups of the caller, oldest first
pub async fn list_backups(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<Vec<BackupDetail>>> {
    let db = state.db.clone();
    let details =
        tokio::task::spawn_blocking(move || db::backups::list_backups(&db, &username)).await??;
    Ok(Json(details))
}
