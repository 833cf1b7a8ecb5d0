pub mod app_config;
pub mod backups;
pub mod diaries;
pub mod files;
pub mod tables;
pub mod users;

use redb::{Database, Error as RedbError};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

/// Database handle type (Arc-wrapped for sharing across handlers)
pub type Db = Arc<Database>;

const BINCODE_CONFIG: bincode::config::Configuration = bincode::config::standard();

/// Open or create the redb database at the given path
///
/// Creates all required tables on first run.
#[allow(clippy::result_large_err)]
pub fn open_database(path: impl AsRef<Path>) -> std::result::Result<Db, RedbError> {
    tracing::info!("Opening database at: {:?}", path.as_ref());

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!("Failed to create database directory: {}", e);
                RedbError::Io(e)
            })?;
        }
    }

    let db = Database::create(path)?;
    init_tables(&db)?;

    tracing::info!("Database initialized successfully");

    Ok(Arc::new(db))
}

/// Create every table so read transactions never see a missing one
#[allow(clippy::result_large_err)]
pub fn init_tables(db: &Database) -> std::result::Result<(), RedbError> {
    let write_txn = db.begin_write()?;
    {
        let _ = write_txn.open_table(tables::USERS)?;
        let _ = write_txn.open_table(tables::DIARIES)?;
        let _ = write_txn.open_table(tables::APP_CONFIG)?;
        let _ = write_txn.open_table(tables::LOGIN_LIMITS)?;
        let _ = write_txn.open_table(tables::BACKUPS)?;
        let _ = write_txn.open_table(tables::FILES)?;
    }
    write_txn.commit()?;
    Ok(())
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::serde::encode_to_vec(value, BINCODE_CONFIG)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (value, _) = bincode::serde::decode_from_slice(bytes, BINCODE_CONFIG)?;
    Ok(value)
}

/// Bounds covering every key that starts with `{username}/`
pub(crate) fn user_prefix_bounds(username: &str) -> (String, String) {
    // '0' is the byte right after '/'
    (format!("{}/", username), format!("{}0", username))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRecord;

    #[test]
    fn test_encode_decode_record() {
        let record = UserRecord {
            password_hash: "ab".repeat(32),
            total_count: 3,
            created_at: 1733788800,
        };
        let bytes = encode(&record).unwrap();
        let back: UserRecord = decode(&bytes).unwrap();
        assert_eq!(back.created_at, record.created_at);
        assert_eq!(back.total_count, 3);
    }

    #[test]
    fn test_user_prefix_bounds_exclude_similar_names() {
        let (lo, hi) = user_prefix_bounds("al");
        assert!("al/20240101" >= lo.as_str() && "al/20240101" < hi.as_str());
        assert!("al-x/20240101" < lo.as_str());
        assert!("alice/20240101" >= hi.as_str());
    }

    #[test]
    fn test_open_database_creates_parent_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("diary.db");
        assert!(open_database(&path).is_ok());
        assert!(path.exists());
    }
}
