use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::auth::cookie_value;
use crate::constants::USER_TOKEN_KEY;
use crate::dates::{month_key, month_url_for, write_url_today};
use crate::db;
use crate::error::Result;
use crate::models::UserProfile;
use crate::routes::month_param;
use crate::views::month_page;
use crate::AppState;

const LOGIN_PATH: &str = "/login";

/// Send users with a session cookie to this month's page, everyone else to login
///
/// Only the cookie's presence is checked here; the month page verifies it.
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    match cookie_value(&headers, USER_TOKEN_KEY) {
        Some(_) => Redirect::to(&month_url_for(state.clock.today())),
        None => Redirect::to(LOGIN_PATH),
    }
}

/// Server-rendered month overview
pub async fn diary_month(
    State(state): State<AppState>,
    Path(query_month): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let month = month_param(&query_month)?;

    let username = match cookie_value(&headers, USER_TOKEN_KEY)
        .and_then(|token| state.verifier.verify(&token))
    {
        Some(username) => username,
        None => return Ok(Redirect::to(LOGIN_PATH).into_response()),
    };

    let db = state.db.clone();
    let name = username.clone();
    let (entries, user, total_diary, app_config) =
        tokio::task::spawn_blocking(move || -> Result<_> {
            let entries = db::diaries::list_month(&db, &name, month)?;
            let user = db::users::get_user(&db, &name)?;
            let total_diary = db::diaries::count_diaries(&db, &name)?;
            let app_config = db::app_config::get_app_config(&db)?;
            Ok((entries, user, total_diary, app_config))
        })
        .await??;

    // Token outlived its account
    let Some(user) = user else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let profile = UserProfile {
        username,
        total_count: user.total_count,
        total_diary: Some(total_diary),
    };
    let items: Vec<_> = entries
        .iter()
        .map(|(day, record)| record.list_item(*day))
        .collect();
    let app_name = app_config
        .map(|c| c.app_name)
        .unwrap_or_else(|| state.config.default_app_name.clone());

    Ok(Html(month_page(
        &app_name,
        &month_key(month),
        &items,
        &profile,
        &write_url_today(state.clock.as_ref()),
    ))
    .into_response())
}
