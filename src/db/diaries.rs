use chrono::NaiveDate;
use redb::{Database, ReadableTable};

use super::{decode, encode, tables, user_prefix_bounds};
use crate::dates::{compact_day_key, day_start_millis, month_key};
use crate::error::{AppError, Result};
use crate::models::diary::word_count;
use crate::models::{DiaryRecord, UserRecord};

pub type DatedDiary = (NaiveDate, DiaryRecord);

fn diary_key(username: &str, day: NaiveDate) -> String {
    format!("{}/{}", username, compact_day_key(day))
}

fn day_from_key(key: &str) -> Option<NaiveDate> {
    let (_, day) = key.rsplit_once('/')?;
    NaiveDate::parse_from_str(day, "%Y%m%d").ok()
}

/// Entries with keys in `[lo, hi)`, in day order
fn scan(db: &Database, lo: &str, hi: &str) -> Result<Vec<DatedDiary>> {
    let read_txn = db.begin_read()?;
    let diaries = read_txn.open_table(tables::DIARIES)?;

    let mut entries = Vec::new();
    for item in diaries.range(lo..hi)? {
        let (key, value) = item?;
        match day_from_key(key.value()) {
            Some(day) => entries.push((day, decode(value.value())?)),
            None => tracing::warn!("Skipping diary with malformed key: {}", key.value()),
        }
    }
    Ok(entries)
}

/// Every entry of the given month
pub fn list_month(db: &Database, username: &str, month: NaiveDate) -> Result<Vec<DatedDiary>> {
    let prefix = format!("{}/{}", username, month_key(month));
    scan(db, &format!("{}00", prefix), &format!("{}99", prefix))
}

/// Entries between two days inclusive, or all of them
pub fn list_range(
    db: &Database,
    username: &str,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<DatedDiary>> {
    match bounds {
        Some((start, end)) => {
            let lo = diary_key(username, start);
            // Upper bound is exclusive, so step past the end day
            let hi = match end.succ_opt() {
                Some(next) => diary_key(username, next),
                None => user_prefix_bounds(username).1,
            };
            scan(db, &lo, &hi)
        }
        None => {
            let (lo, hi) = user_prefix_bounds(username);
            scan(db, &lo, &hi)
        }
    }
}

pub fn get_diary(db: &Database, username: &str, day: NaiveDate) -> Result<Option<DiaryRecord>> {
    let read_txn = db.begin_read()?;
    let diaries = read_txn.open_table(tables::DIARIES)?;
    let record = diaries
        .get(diary_key(username, day).as_str())?
        .map(|bytes| decode(bytes.value()))
        .transpose()?;
    Ok(record)
}

/// Insert or replace the entry for a day, keeping its creation time
pub fn put_diary(
    db: &Database,
    username: &str,
    day: NaiveDate,
    content: String,
    now: i64,
) -> Result<DiaryRecord> {
    let key = diary_key(username, day);
    let write_txn = db.begin_write()?;
    let record = {
        let mut diaries = write_txn.open_table(tables::DIARIES)?;
        let created_at = diaries
            .get(key.as_str())?
            .and_then(|b| decode::<DiaryRecord>(b.value()).ok())
            .map(|r| r.created_at)
            .unwrap_or(now);

        let record = DiaryRecord {
            content,
            date: day_start_millis(day),
            created_at,
            updated_at: now,
        };
        diaries.insert(key.as_str(), encode(&record)?.as_slice())?;
        record
    };
    write_txn.commit()?;

    Ok(record)
}

/// Returns false when there was nothing to delete
pub fn delete_diary(db: &Database, username: &str, day: NaiveDate) -> Result<bool> {
    let write_txn = db.begin_write()?;
    let removed = {
        let mut diaries = write_txn.open_table(tables::DIARIES)?;
        let removed = diaries.remove(diary_key(username, day).as_str())?.is_some();
        removed
    };
    write_txn.commit()?;
    Ok(removed)
}

/// Number of entries a user has
pub fn count_diaries(db: &Database, username: &str) -> Result<u64> {
    let (lo, hi) = user_prefix_bounds(username);
    let read_txn = db.begin_read()?;
    let diaries = read_txn.open_table(tables::DIARIES)?;
    let mut count = 0;
    for item in diaries.range(lo.as_str()..hi.as_str())? {
        item?;
        count += 1;
    }
    Ok(count)
}

/// Recompute the cached word count from every entry and store it
///
/// Reads and writes in one transaction so the total matches a single snapshot.
pub fn refresh_word_count(db: &Database, username: &str) -> Result<u64> {
    let (lo, hi) = user_prefix_bounds(username);
    let write_txn = db.begin_write()?;
    let total = {
        let diaries = write_txn.open_table(tables::DIARIES)?;
        let mut total = 0u64;
        for item in diaries.range(lo.as_str()..hi.as_str())? {
            let (_, value) = item?;
            let record: DiaryRecord = decode(value.value())?;
            total += word_count(&record.content);
        }
        drop(diaries);

        let mut users = write_txn.open_table(tables::USERS)?;
        let mut user: UserRecord = users
            .get(username)?
            .map(|bytes| decode(bytes.value()))
            .transpose()?
            .ok_or(AppError::Unauthorized)?;
        user.total_count = total;
        users.insert(username, encode(&user)?.as_slice())?;
        total
    };
    write_txn.commit()?;

    tracing::info!("Word count refreshed for {}: {}", username, total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_tables;
    use tempfile::TempDir;

    fn test_db(dir: &TempDir) -> Database {
        let db = Database::create(dir.path().join("test.db")).unwrap();
        init_tables(&db).unwrap();
        db
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_from_key() {
        assert_eq!(day_from_key("alice/20240105"), Some(date(2024, 1, 5)));
        assert_eq!(day_from_key("alice/garbage"), None);
    }

    #[test]
    fn test_list_month_isolates_months_and_users() {
        let dir = TempDir::new().unwrap();
        let db = test_db(&dir);

        put_diary(&db, "alice", date(2024, 1, 31), "jan".into(), 1).unwrap();
        put_diary(&db, "alice", date(2024, 2, 1), "feb 1".into(), 1).unwrap();
        put_diary(&db, "alice", date(2024, 2, 29), "feb 29".into(), 1).unwrap();
        put_diary(&db, "bob", date(2024, 2, 2), "bob".into(), 1).unwrap();

        let feb = list_month(&db, "alice", date(2024, 2, 1)).unwrap();
        let days: Vec<NaiveDate> = feb.iter().map(|(d, _)| *d).collect();
        assert_eq!(days, vec![date(2024, 2, 1), date(2024, 2, 29)]);
    }

    #[test]
    fn test_put_diary_keeps_created_at() {
        let dir = TempDir::new().unwrap();
        let db = test_db(&dir);

        put_diary(&db, "alice", date(2024, 1, 1), "v1".into(), 100).unwrap();
        let updated = put_diary(&db, "alice", date(2024, 1, 1), "v2".into(), 200).unwrap();

        assert_eq!(updated.created_at, 100);
        assert_eq!(updated.updated_at, 200);
        let stored = get_diary(&db, "alice", date(2024, 1, 1)).unwrap().unwrap();
        assert_eq!(stored.content, "v2");
        assert_eq!(stored.date, day_start_millis(date(2024, 1, 1)));
    }

    #[test]
    fn test_list_range_inclusive() {
        let dir = TempDir::new().unwrap();
        let db = test_db(&dir);
        for d in 1..=5 {
            put_diary(&db, "alice", date(2024, 3, d), format!("day {}", d), 1).unwrap();
        }

        let some = list_range(&db, "alice", Some((date(2024, 3, 2), date(2024, 3, 4)))).unwrap();
        assert_eq!(some.len(), 3);
        assert_eq!(some[0].0, date(2024, 3, 2));
        assert_eq!(some[2].0, date(2024, 3, 4));

        assert_eq!(list_range(&db, "alice", None).unwrap().len(), 5);
    }

    #[test]
    fn test_delete_and_count() {
        let dir = TempDir::new().unwrap();
        let db = test_db(&dir);
        put_diary(&db, "alice", date(2024, 1, 1), "a".into(), 1).unwrap();
        put_diary(&db, "alice", date(2024, 1, 2), "b".into(), 1).unwrap();

        assert_eq!(count_diaries(&db, "alice").unwrap(), 2);
        assert!(delete_diary(&db, "alice", date(2024, 1, 1)).unwrap());
        assert!(!delete_diary(&db, "alice", date(2024, 1, 1)).unwrap());
        assert_eq!(count_diaries(&db, "alice").unwrap(), 1);
    }
}
