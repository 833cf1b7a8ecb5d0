use serde::{Deserialize, Serialize};

use crate::constants::MAX_BACKUP_TITLE_CHARS;

/// Backup record stored in redb, keyed by `{username}/{date:020}`
///
/// Snapshot of every entry the user had when it was taken. Never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRecord {
    pub title: String,
    /// Creation time in milliseconds
    pub date: i64,
    pub entries: Vec<BackupEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupEntry {
    /// `YYYYMMDD`
    pub day: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupDetail {
    pub title: String,
    pub date: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBackupRequest {
    #[serde(default)]
    pub title: Option<String>,
}

impl BackupRecord {
    pub fn detail(&self) -> BackupDetail {
        BackupDetail {
            title: self.title.clone(),
            date: self.date,
        }
    }
}

/// Trimmed title, or a dated default when none is given
pub fn backup_title(requested: Option<&str>, fallback_day: &str) -> Result<String, String> {
    match requested.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) if title.chars().count() > MAX_BACKUP_TITLE_CHARS => Err(format!(
            "Backup title must be at most {} characters",
            MAX_BACKUP_TITLE_CHARS
        )),
        Some(title) => Ok(title.to_string()),
        None => Ok(format!("Backup {}", fallback_day)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_title() {
        assert_eq!(backup_title(Some("  mine "), "2024-01-01").unwrap(), "mine");
        assert_eq!(backup_title(None, "2024-01-01").unwrap(), "Backup 2024-01-01");
        assert_eq!(backup_title(Some("   "), "2024-01-01").unwrap(), "Backup 2024-01-01");
        let long = "t".repeat(MAX_BACKUP_TITLE_CHARS + 1);
        assert!(backup_title(Some(&long), "2024-01-01").is_err());
    }
}
