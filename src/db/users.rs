use redb::{Database, ReadableTable, ReadableTableMetadata};

use super::{decode, encode, tables};
use crate::error::{AppError, Result};
use crate::models::{AppConfigRecord, LoginLimit, UserRecord};
use crate::security::verify_password;

/// Insert a new user, seeding the app config if none exists yet
///
/// Returns true when this call initialized the app config.
pub fn create_user(
    db: &Database,
    username: &str,
    record: &UserRecord,
    seed: AppConfigRecord,
) -> Result<bool> {
    let write_txn = db.begin_write()?;
    let seeded = {
        let mut users = write_txn.open_table(tables::USERS)?;
        if users.get(username)?.is_some() {
            tracing::info!("User already exists: {}", username);
            return Err(AppError::UserAlreadyExists);
        }
        users.insert(username, encode(record)?.as_slice())?;

        let mut app_config = write_txn.open_table(tables::APP_CONFIG)?;
        if app_config.get(tables::APP_CONFIG_KEY)?.is_none() {
            app_config.insert(tables::APP_CONFIG_KEY, encode(&seed)?.as_slice())?;
            true
        } else {
            false
        }
    };
    write_txn.commit()?;

    Ok(seeded)
}

pub fn get_user(db: &Database, username: &str) -> Result<Option<UserRecord>> {
    let read_txn = db.begin_read()?;
    let users = read_txn.open_table(tables::USERS)?;
    let user = users
        .get(username)?
        .map(|bytes| decode(bytes.value()))
        .transpose()?;
    Ok(user)
}

pub fn count_users(db: &Database) -> Result<u64> {
    let read_txn = db.begin_read()?;
    let users = read_txn.open_table(tables::USERS)?;
    let count = users.len()?;
    Ok(count)
}

/// Check credentials under the daily failed-login limit
///
/// Failures against an existing account are counted even though the call
/// returns an error, so the counter update is committed first.
pub fn attempt_login(
    db: &Database,
    username: &str,
    password: &str,
    pepper: &str,
    today: i64,
) -> Result<()> {
    let write_txn = db.begin_write()?;
    let outcome = {
        let users = write_txn.open_table(tables::USERS)?;
        let user: Option<UserRecord> = users
            .get(username)?
            .map(|bytes| decode(bytes.value()))
            .transpose()?;
        drop(users);

        match user {
            // Unknown usernames get no limit record
            None => Err(AppError::InvalidCredentials),
            Some(user) => {
                let mut limits = write_txn.open_table(tables::LOGIN_LIMITS)?;
                let mut limit: LoginLimit = match limits.get(username)? {
                    Some(bytes) => decode(bytes.value())?,
                    None => LoginLimit::new(today),
                };

                limit.check(today)?;

                if verify_password(password, pepper, &user.password_hash) {
                    limits.remove(username)?;
                    Ok(())
                } else {
                    limit.record_failure(today);
                    tracing::warn!(
                        "Failed login for {} ({} today)",
                        username,
                        limit.count
                    );
                    limits.insert(username, encode(&limit)?.as_slice())?;
                    Err(AppError::InvalidCredentials)
                }
            }
        }
    };
    write_txn.commit()?;

    outcome
}

pub fn set_total_count(db: &Database, username: &str, total_count: u64) -> Result<()> {
    let write_txn = db.begin_write()?;
    {
        let mut users = write_txn.open_table(tables::USERS)?;
        let mut user: UserRecord = users
            .get(username)?
            .map(|bytes| decode(bytes.value()))
            .transpose()?
            .ok_or(AppError::Unauthorized)?;
        user.total_count = total_count;
        users.insert(username, encode(&user)?.as_slice())?;
    }
    write_txn.commit()?;
    Ok(())
}
