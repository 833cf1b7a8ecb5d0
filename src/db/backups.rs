use redb::{Database, ReadableTable};

use super::{decode, encode, tables, user_prefix_bounds};
use crate::error::Result;
use crate::models::{BackupDetail, BackupEntry, BackupRecord, DiaryRecord};

fn backup_key(username: &str, date: i64) -> String {
    format!("{}/{:020}", username, date)
}

/// Snapshot every entry of a user under a new backup
pub fn create_backup(db: &Database, username: &str, title: String, now: i64) -> Result<BackupDetail> {
    let (lo, hi) = user_prefix_bounds(username);
    let write_txn = db.begin_write()?;
    let detail = {
        let diaries = write_txn.open_table(tables::DIARIES)?;
        let mut entries = Vec::new();
        for item in diaries.range(lo.as_str()..hi.as_str())? {
            let (key, value) = item?;
            let record: DiaryRecord = decode(value.value())?;
            let day = key
                .value()
                .rsplit_once('/')
                .map(|(_, day)| day.to_string())
                .unwrap_or_default();
            entries.push(BackupEntry {
                day,
                content: record.content,
            });
        }
        drop(diaries);

        let mut backups = write_txn.open_table(tables::BACKUPS)?;
        // Backups are immutable, so a same-millisecond backup moves to the next free key
        let mut date = now;
        while backups.get(backup_key(username, date).as_str())?.is_some() {
            date += 1;
        }

        let record = BackupRecord {
            title,
            date,
            entries,
        };
        backups.insert(
            backup_key(username, date).as_str(),
            encode(&record)?.as_slice(),
        )?;

        tracing::info!(
            "Backup '{}' created for {} with {} entries",
            record.title,
            username,
            record.entries.len()
        );
        record.detail()
    };
    write_txn.commit()?;

    Ok(detail)
}

/// Backups of a user, oldest first
pub fn list_backups(db: &Database, username: &str) -> Result<Vec<BackupDetail>> {
    let (lo, hi) = user_prefix_bounds(username);
    let read_txn = db.begin_read()?;
    let backups = read_txn.open_table(tables::BACKUPS)?;

    let mut details = Vec::new();
    for item in backups.range(lo.as_str()..hi.as_str())? {
        let (_, value) = item?;
        let record: BackupRecord = decode(value.value())?;
        details.push(record.detail());
    }
    Ok(details)
}
