use redb::{Database, ReadableTable};

use super::{decode, encode, tables};
use crate::error::{AppError, Result};
use crate::models::{AppConfigForm, AppConfigRecord};

/// The stored app config, `None` until the first user initializes it
pub fn get_app_config(db: &Database) -> Result<Option<AppConfigRecord>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(tables::APP_CONFIG)?;
    let record = table
        .get(tables::APP_CONFIG_KEY)?
        .map(|bytes| decode(bytes.value()))
        .transpose()?;
    Ok(record)
}

/// Replace the editable fields of an existing config
pub fn update_app_config(db: &Database, form: AppConfigForm) -> Result<AppConfigRecord> {
    let write_txn = db.begin_write()?;
    let record = {
        let mut table = write_txn.open_table(tables::APP_CONFIG)?;
        let mut record: AppConfigRecord = table
            .get(tables::APP_CONFIG_KEY)?
            .map(|bytes| decode(bytes.value()))
            .transpose()?
            .ok_or(AppError::ConfigMissing)?;
        record.apply(form);
        table.insert(tables::APP_CONFIG_KEY, encode(&record)?.as_slice())?;
        record
    };
    write_txn.commit()?;
    Ok(record)
}
