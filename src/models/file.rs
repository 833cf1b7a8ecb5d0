use serde::{Deserialize, Serialize};

/// Upload descriptor sent by the client before the file is recorded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub filename: String,
    pub md5: String,
    pub size: u64,
    pub mime_type: String,
}

/// Persisted file record, keyed by md5
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileStorage {
    pub id: u64,
    pub filename: String,
    pub md5: String,
    pub size: u64,
    pub mime_type: String,
    pub create_user_id: String,
    pub create_time: i64,
}

impl UploadedFile {
    /// md5 must be 32 hex characters
    pub fn validate_md5(md5: &str) -> bool {
        md5.len() == 32 && md5.chars().all(|c| c.is_ascii_hexdigit())
    }

    pub fn into_storage(self, id: u64, create_user_id: String, create_time: i64) -> FileStorage {
        FileStorage {
            id,
            filename: self.filename,
            md5: self.md5.to_ascii_lowercase(),
            size: self.size,
            mime_type: self.mime_type,
            create_user_id,
            create_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_md5() {
        assert!(UploadedFile::validate_md5("d41d8cd98f00b204e9800998ecf8427e"));
        assert!(UploadedFile::validate_md5(&"A".repeat(32)));
        assert!(!UploadedFile::validate_md5("abc"));
        assert!(!UploadedFile::validate_md5(&"g".repeat(32)));
    }

    #[test]
    fn test_into_storage_normalizes_md5() {
        let upload = UploadedFile {
            filename: "a.png".to_string(),
            md5: "D41D8CD98F00B204E9800998ECF8427E".to_string(),
            size: 0,
            mime_type: "image/png".to_string(),
        };
        let stored = upload.into_storage(1, "alice".to_string(), 42);
        assert_eq!(stored.md5, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(stored.create_user_id, "alice");
        assert_eq!(stored.create_time, 42);
    }
}
