use axum::{extract::State, http::header, response::IntoResponse, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::USER_TOKEN_KEY;
use crate::dates::day_start_millis;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{
    AppConfigRecord, Credentials, RespData, SuccessResponse, User, UserProfile, UserRecord,
};
use crate::routes::validate_credentials;
use crate::security::{hash_password, issue_token};
use crate::{AppState, AuthUser};

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResData {
    pub username: String,
    pub token: String,
}

/// Create a user
///
/// The only `/api/*` route the auth gate lets through untouched. The first
/// account also initializes the app config from the server defaults and is
/// recorded as its owner.
///
/// Returns 409 Conflict if the username is taken.
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<SuccessResponse>> {
    validate_credentials(&payload)?;

    let seed = AppConfigRecord::seeded(&state.config, &payload.username);
    let db = state.db.clone();
    let username = payload.username.clone();
    let password = payload.password;
    let pepper = state.config.password_pepper.clone();

    // Argon2 hashing runs on the blocking pool with the write
    let seeded = tokio::task::spawn_blocking(move || -> Result<bool> {
        let record = UserRecord {
            password_hash: hash_password(&password, &pepper)?,
            total_count: 0,
            created_at: Utc::now().timestamp(),
        };
        db::users::create_user(&db, &username, &record, seed)
    })
    .await??;

    if seeded {
        tracing::info!("App config initialized by {}", payload.username);
    }
    tracing::info!("New user registered: {}", payload.username);

    Ok(Json(SuccessResponse::ok()))
}

/// Log in, returning a token and setting it as a cookie
///
/// Failed attempts are counted per user and day; past the limit every
/// attempt answers 429 until the date rolls over.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse> {
    if !User::validate_username(&payload.username) {
        return Err(AppError::InvalidCredentials);
    }

    let today = day_start_millis(state.clock.today());
    let db = state.db.clone();
    let username = payload.username.clone();
    let password = payload.password.clone();
    let pepper = state.config.password_pepper.clone();

    tokio::task::spawn_blocking(move || {
        db::users::attempt_login(&db, &username, &password, &pepper, today)
    })
    .await??;

    let ttl = state.config.token_ttl_secs;
    let token = issue_token(
        &payload.username,
        Utc::now().timestamp().saturating_add(ttl),
        &state.config.token_secret,
    );
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        USER_TOKEN_KEY, token, ttl
    );

    tracing::info!("User logged in: {}", payload.username);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(RespData::ok(LoginResData {
            username: payload.username,
            token,
        })),
    ))
}

/// Profile of the calling user with a live entry count
pub async fn user_statistic(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<RespData<UserProfile>>> {
    let db = state.db.clone();
    let name = username.clone();
    let (user, total_diary) = tokio::task::spawn_blocking(move || -> Result<_> {
        let user = db::users::get_user(&db, &name)?.ok_or(AppError::Unauthorized)?;
        let total_diary = db::diaries::count_diaries(&db, &name)?;
        Ok((user, total_diary))
    })
    .await??;

    Ok(Json(RespData::ok(UserProfile {
        username,
        total_count: user.total_count,
        total_diary: Some(total_diary),
    })))
}
