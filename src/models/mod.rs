pub mod app_config;
pub mod backup;
pub mod diary;
pub mod file;
pub mod login_limit;
pub mod user;

use serde::{Deserialize, Serialize};

pub use app_config::{
    build_frontend_config, AppConfigForm, AppConfigRecord, ConfigOwner, FrontendConfig,
};
pub use backup::{BackupDetail, BackupEntry, BackupRecord, CreateBackupRequest};
pub use diary::{
    DiaryDetail, DiaryListItem, DiaryMonthResData, DiaryRecord, ExportRow, JsonExportForm,
    WriteDiaryRequest,
};
pub use file::{FileStorage, UploadedFile};
pub use login_limit::LoginLimit;
pub use user::{Credentials, User, UserProfile, UserRecord};

/// Envelope shared by the JSON endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RespData<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> RespData<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

/// Success flag without a payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resp_data_ok_shape() {
        let json = serde_json::to_value(RespData::ok(7)).unwrap();
        assert_eq!(json, json!({ "success": true, "data": 7 }));
    }

    #[test]
    fn test_resp_data_failure_envelope() {
        let parsed: RespData<u64> =
            serde_json::from_value(json!({ "success": false, "error": "Login required" })).unwrap();
        assert!(!parsed.success);
        assert!(parsed.data.is_none());
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json!({ "success": false }));
    }
}
