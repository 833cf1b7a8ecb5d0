pub mod app_config;
pub mod backup;
pub mod diary;
pub mod file;
pub mod health;
pub mod pages;
pub mod user;
pub mod validation;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::auth_gate;
use crate::error::AppError;
use crate::AppState;

pub use app_config::{get_app_config, update_app_config};
pub use backup::{create_backup, list_backups};
pub use diary::{delete_diary, export_json, get_diary, month_list, refresh_count, write_diary};
pub use file::{get_file, register_file};
pub use health::health_check;
pub use pages::{diary_month, home};
pub use user::{create_user, login, user_statistic};
pub use validation::{day_param, month_param, validate_credentials};

/// Every route of the server
///
/// Everything under `/api` is one nested router whose fallback sits inside
/// the auth gate, so unknown API paths are verified before they answer 404.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/user", post(create_user))
        .route("/user/statistic", get(user_statistic))
        .route("/appConfig", get(get_app_config).put(update_app_config))
        .route("/month/:query_month", get(month_list))
        .route(
            "/diary/:day",
            get(get_diary).put(write_diary).delete(delete_diary),
        )
        .route("/export/json", post(export_json))
        .route("/refreshCount", post(refresh_count))
        .route("/backup", get(list_backups).post(create_backup))
        .route("/file", post(register_file))
        .route("/file/:md5", get(get_file))
        .fallback(api_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate));

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(home))
        .route("/diary/:query_month", get(diary_month))
        .route("/auth/login", post(login))
        .nest("/api", api)
        .with_state(state)
}

async fn api_not_found() -> AppError {
    AppError::NotFound
}
