use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::constants::ERR_INVALID_MD5;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{FileStorage, UploadedFile};
use crate::{AppState, AuthUser};

/// Record an uploaded file's metadata, deduplicated by md5
pub async fn register_file(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Json(upload): Json<UploadedFile>,
) -> Result<Json<FileStorage>> {
    if !UploadedFile::validate_md5(&upload.md5) {
        return Err(AppError::InvalidInput(ERR_INVALID_MD5.to_string()));
    }
    if upload.filename.trim().is_empty() {
        return Err(AppError::InvalidInput("filename must not be empty".to_string()));
    }

    let db = state.db.clone();
    let stored = tokio::task::spawn_blocking(move || {
        db::files::register_file(&db, &username, upload, Utc::now().timestamp_millis())
    })
    .await??;

    Ok(Json(stored))
}

pub async fn get_file(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(md5): Path<String>,
) -> Result<Json<FileStorage>> {
    if !UploadedFile::validate_md5(&md5) {
        return Err(AppError::InvalidInput(ERR_INVALID_MD5.to_string()));
    }

    let db = state.db.clone();
    let stored = tokio::task::spawn_blocking(move || db::files::get_file(&db, &md5))
        .await??
        .ok_or(AppError::FileNotFound)?;

    Ok(Json(stored))
}
