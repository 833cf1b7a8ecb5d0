use redb::TableDefinition;

/// Users table: username -> UserRecord (serialized)
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Diaries table: "{username}/{YYYYMMDD}" -> DiaryRecord (serialized)
///
/// Keys sort by user then day, so a month is one contiguous range.
pub const DIARIES: TableDefinition<&str, &[u8]> = TableDefinition::new("diaries");

/// App config table: single "app" key -> AppConfigRecord (serialized)
pub const APP_CONFIG: TableDefinition<&str, &[u8]> = TableDefinition::new("app_config");

/// Login limits table: username -> LoginLimit (serialized)
pub const LOGIN_LIMITS: TableDefinition<&str, &[u8]> = TableDefinition::new("login_limits");

/// Backups table: "{username}/{created_ms:020}" -> BackupRecord (serialized)
pub const BACKUPS: TableDefinition<&str, &[u8]> = TableDefinition::new("backups");

/// Files table: md5 -> FileStorage (serialized)
pub const FILES: TableDefinition<&str, &[u8]> = TableDefinition::new("files");

/// Key of the only row in APP_CONFIG
pub const APP_CONFIG_KEY: &str = "app";
