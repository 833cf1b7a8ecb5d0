use serde::{Deserialize, Serialize};

/// User record stored in redb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Argon2id PHC string, keyed with the server pepper
    pub password_hash: String,
    /// Cached word count over all entries, refreshed on demand
    pub total_count: u64,
    /// When the user was created (Unix timestamp)
    pub created_at: i64,
}

/// Profile returned to the owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub total_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_diary: Option<u64>,
}

/// Credentials for user creation and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct User;

impl User {
    /// 1-32 characters of ASCII letters, digits, `_` or `-`
    ///
    /// Usernames prefix storage keys, so `/` and `.` must never appear.
    pub fn validate_username(name: &str) -> bool {
        (1..=32).contains(&name.len())
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    pub fn validate_password(password: &str) -> bool {
        (6..=128).contains(&password.chars().count())
    }
}
