use redb::{Database, ReadableTable, ReadableTableMetadata};

use super::{decode, encode, tables};
use crate::error::Result;
use crate::models::{FileStorage, UploadedFile};

/// Record an upload, returning the existing record when the md5 is known
pub fn register_file(
    db: &Database,
    username: &str,
    upload: UploadedFile,
    now: i64,
) -> Result<FileStorage> {
    let md5 = upload.md5.to_ascii_lowercase();
    let write_txn = db.begin_write()?;
    let stored = {
        let mut files = write_txn.open_table(tables::FILES)?;
        let existing: Option<FileStorage> = files
            .get(md5.as_str())?
            .map(|bytes| decode(bytes.value()))
            .transpose()?;

        match existing {
            Some(existing) => {
                tracing::debug!("File {} already stored as #{}", md5, existing.id);
                existing
            }
            None => {
                let id = files.len()? + 1;
                let stored = upload.into_storage(id, username.to_string(), now);
                files.insert(md5.as_str(), encode(&stored)?.as_slice())?;
                tracing::info!("File {} recorded as #{} by {}", md5, id, username);
                stored
            }
        }
    };
    write_txn.commit()?;

    Ok(stored)
}

pub fn get_file(db: &Database, md5: &str) -> Result<Option<FileStorage>> {
    let read_txn = db.begin_read()?;
    let files = read_txn.open_table(tables::FILES)?;
    let stored = files
        .get(md5.to_ascii_lowercase().as_str())?
        .map(|bytes| decode(bytes.value()))
        .transpose()?;
    Ok(stored)
}
