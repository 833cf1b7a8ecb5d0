/// Header and cookie name carrying the session token
pub const USER_TOKEN_KEY: &str = "diary-token";

/// Route that creates users and skips the auth gate on POST
pub const USER_CREATE_PATH: &str = "/api/user";

/// Default token lifetime (30 days)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 30 * 24 * 3600;

/// Failed logins allowed per user per calendar day
pub const MAX_LOGIN_FAILURES_PER_DAY: u32 = 10;

/// Maximum diary entry size in bytes (1MB)
pub const MAX_DIARY_SIZE_BYTES: usize = 1_048_576;

/// Characters of content shown per entry in month listings
pub const SUMMARY_CHARS: usize = 80;

pub const MAX_BACKUP_TITLE_CHARS: usize = 100;

pub const MS_PER_DAY: i64 = 86_400_000;

// =============================================================================
// App Config Defaults
// =============================================================================

pub const DEFAULT_APP_NAME: &str = "Diary";

pub const DEFAULT_LOGIN_SUBTITLE: &str = "Write something for today";

pub const DEFAULT_PRIMARY_COLOR: &str = "#3b82f6";

pub const DEFAULT_BUTTON_COLORS: &[&str] = &[
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899",
];

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_INVALID_USERNAME: &str =
    "Username must be 1-32 characters of letters, digits, '_' or '-'";

pub const ERR_INVALID_PASSWORD: &str = "Password must be 6-128 characters";

pub const ERR_INVALID_MONTH: &str = "Month must be formatted as YYYYMM";

pub const ERR_INVALID_DAY: &str = "Date must be formatted as YYYY-MM-DD";

pub const ERR_INVALID_MD5: &str = "md5 must be 32 hex characters";
