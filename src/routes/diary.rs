use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::constants::MAX_DIARY_SIZE_BYTES;
use crate::dates::month_key;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{
    DiaryDetail, DiaryMonthResData, ExportRow, JsonExportForm, RespData, SuccessResponse,
    WriteDiaryRequest,
};
use crate::models::diary::build_export_rows;
use crate::routes::{day_param, month_param};
use crate::{AppState, AuthUser};

/// Entries of one month, `GET /api/month/:query_month`
pub async fn month_list(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(query_month): Path<String>,
) -> Result<Json<RespData<DiaryMonthResData>>> {
    let month = month_param(&query_month)?;

    let db = state.db.clone();
    let name = username.clone();
    let entries =
        tokio::task::spawn_blocking(move || db::diaries::list_month(&db, &name, month)).await??;

    tracing::debug!(
        "Listed {} entries of {} for {}",
        entries.len(),
        query_month,
        username
    );

    Ok(Json(RespData::ok(DiaryMonthResData {
        month: month_key(month),
        entries: entries
            .iter()
            .map(|(day, record)| record.list_item(*day))
            .collect(),
    })))
}

pub async fn get_diary(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(day): Path<String>,
) -> Result<Json<RespData<DiaryDetail>>> {
    let day = day_param(&day)?;

    let db = state.db.clone();
    let record = tokio::task::spawn_blocking(move || db::diaries::get_diary(&db, &username, day))
        .await??
        .ok_or(AppError::DiaryNotFound)?;

    Ok(Json(RespData::ok(record.detail(day))))
}

/// Create or overwrite the entry of a day
///
/// The cached word count is left alone until `refreshCount` is called.
pub async fn write_diary(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(day): Path<String>,
    Json(payload): Json<WriteDiaryRequest>,
) -> Result<Json<RespData<DiaryDetail>>> {
    let day = day_param(&day)?;

    let size = payload.content.len();
    if size > MAX_DIARY_SIZE_BYTES {
        tracing::warn!(
            "Diary too large from {}: {} bytes (max: {})",
            username,
            size,
            MAX_DIARY_SIZE_BYTES
        );
        return Err(AppError::PayloadTooLarge);
    }

    let db = state.db.clone();
    let name = username.clone();
    let record = tokio::task::spawn_blocking(move || {
        db::diaries::put_diary(&db, &name, day, payload.content, Utc::now().timestamp_millis())
    })
    .await??;

    tracing::info!("Diary {} written by {}: {} bytes", day, username, size);

    Ok(Json(RespData::ok(record.detail(day))))
}

pub async fn delete_diary(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(day): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let day = day_param(&day)?;

    let db = state.db.clone();
    let name = username.clone();
    let removed =
        tokio::task::spawn_blocking(move || db::diaries::delete_diary(&db, &name, day)).await??;
    if !removed {
        return Err(AppError::DiaryNotFound);
    }

    tracing::info!("Diary {} deleted by {}", day, username);
    Ok(Json(SuccessResponse::ok()))
}

/// Flattened rows for the JSON export, `POST /api/export/json`
pub async fn export_json(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Json(form): Json<JsonExportForm>,
) -> Result<Json<Vec<ExportRow>>> {
    let bounds = form.bounds().map_err(AppError::InvalidInput)?;

    let db = state.db.clone();
    let name = username.clone();
    let entries =
        tokio::task::spawn_blocking(move || db::diaries::list_range(&db, &name, bounds)).await??;

    let contents: Vec<_> = entries
        .into_iter()
        .map(|(day, record)| (day, record.content))
        .collect();
    let rows = build_export_rows(&contents, &form);

    tracing::info!("Exported {} entries for {}", rows.len(), username);
    Ok(Json(rows))
}

/// Recompute the cached word count, `POST /api/refreshCount`
pub async fn refresh_count(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<u64>> {
    let db = state.db.clone();
    let total =
        tokio::task::spawn_blocking(move || db::diaries::refresh_word_count(&db, &username))
            .await??;
    Ok(Json(total))
}
