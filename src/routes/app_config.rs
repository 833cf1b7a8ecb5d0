use axum::{extract::State, Json};

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{build_frontend_config, AppConfigForm, FrontendConfig, RespData, SuccessResponse};
use crate::{AppState, AuthUser};

/// Frontend config with a freshly drawn button color
///
/// Answers 302 with `{success: false}` while the app is uninitialized.
pub async fn get_app_config(
    State(state): State<AppState>,
) -> Result<Json<RespData<FrontendConfig>>> {
    let db = state.db.clone();
    let (config, user_count) = tokio::task::spawn_blocking(move || -> Result<_> {
        let config = db::app_config::get_app_config(&db)?;
        let user_count = db::users::count_users(&db)?;
        Ok((config, user_count))
    })
    .await??;

    let config = config.ok_or_else(|| {
        tracing::warn!("App config requested before initialization");
        AppError::ConfigMissing
    })?;

    let frontend = build_frontend_config(&config, user_count == 0, &mut rand::thread_rng());
    Ok(Json(RespData::ok(frontend)))
}

/// Replace the editable config fields; only the owner may do this
pub async fn update_app_config(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Json(form): Json<AppConfigForm>,
) -> Result<Json<SuccessResponse>> {
    form.validate().map_err(AppError::InvalidInput)?;

    let db = state.db.clone();
    let caller = username.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let current = db::app_config::get_app_config(&db)?.ok_or(AppError::ConfigMissing)?;
        if let Some(owner) = &current.user {
            if owner.username != caller {
                tracing::warn!("App config update refused for non-owner {}", caller);
                return Err(AppError::Unauthorized);
            }
        }
        db::app_config::update_app_config(&db, form)?;
        Ok(())
    })
    .await??;

    tracing::info!("App config updated by {}", username);
    Ok(Json(SuccessResponse::ok()))
}
