use std::env;

use crate::auth::GatePolicy;
use crate::constants::{
    DEFAULT_APP_NAME, DEFAULT_BUTTON_COLORS, DEFAULT_LOGIN_SUBTITLE, DEFAULT_PRIMARY_COLOR,
    DEFAULT_TOKEN_TTL_SECS,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    /// Secret used to sign session tokens
    pub token_secret: String,
    /// Server-side pepper mixed into stored password hashes
    pub password_pepper: String,
    pub token_ttl_secs: i64,
    pub gate_policy: GatePolicy,
    /// Values used to seed the app config when the first user is created
    pub default_app_name: String,
    pub default_login_subtitle: String,
    pub default_primary_color: String,
    pub default_button_colors: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/diary.db".to_string());

        let allowed_origins = split_list(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let token_secret =
            env::var("TOKEN_SECRET").map_err(|_| "TOKEN_SECRET must be set to sign tokens")?;

        let password_pepper = env::var("PASSWORD_PEPPER").unwrap_or_default();

        let token_ttl_secs = parse_token_ttl(
            &env::var("TOKEN_TTL_SECS").unwrap_or_else(|_| DEFAULT_TOKEN_TTL_SECS.to_string()),
        )?;

        let gate_policy = match env::var("ENFORCE_AUTH").as_deref() {
            Ok("true") | Ok("1") => GatePolicy::Reject,
            Ok("false") | Ok("0") | Err(_) => GatePolicy::PassThrough,
            Ok(_) => return Err("Invalid ENFORCE_AUTH".to_string()),
        };

        let default_app_name =
            env::var("APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string());
        let default_login_subtitle =
            env::var("LOGIN_SUBTITLE").unwrap_or_else(|_| DEFAULT_LOGIN_SUBTITLE.to_string());
        let default_primary_color =
            env::var("PRIMARY_COLOR").unwrap_or_else(|_| DEFAULT_PRIMARY_COLOR.to_string());
        let default_button_colors = match env::var("BUTTON_COLORS") {
            Ok(raw) => split_list(&raw),
            Err(_) => DEFAULT_BUTTON_COLORS.iter().map(|c| c.to_string()).collect(),
        };
        if default_button_colors.is_empty() {
            return Err("BUTTON_COLORS must name at least one color".to_string());
        }

        Ok(Config {
            server_host,
            server_port,
            database_path,
            allowed_origins,
            environment,
            token_secret,
            password_pepper,
            token_ttl_secs,
            gate_policy,
            default_app_name,
            default_login_subtitle,
            default_primary_color,
            default_button_colors,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Token lifetime in seconds, which must be positive
fn parse_token_ttl(raw: &str) -> Result<i64, String> {
    match raw.trim().parse::<i64>() {
        Ok(ttl) if ttl > 0 => Ok(ttl),
        _ => Err(format!("Invalid TOKEN_TTL_SECS: {:?}", raw)),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list(" #fff, #000 ,,"),
            vec!["#fff".to_string(), "#000".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_parse_token_ttl() {
        assert_eq!(parse_token_ttl("3600"), Ok(3600));
        assert_eq!(parse_token_ttl(&i64::MAX.to_string()), Ok(i64::MAX));
        assert!(parse_token_ttl("0").is_err());
        assert!(parse_token_ttl("-5").is_err());
        assert!(parse_token_ttl("99999999999999999999").is_err());
        assert!(parse_token_ttl("week").is_err());
    }
}
