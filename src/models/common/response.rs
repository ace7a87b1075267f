use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{LangCenterError, Result};

// Cấu trúc phản hồi API thống nhất của backend
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    /// Mã 0 nghĩa là backend xử lý thành công
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Lấy phần dữ liệu, chuyển mã lỗi của backend thành lỗi nội bộ
    pub fn into_data(self) -> Result<T> {
        if !self.is_success() {
            return Err(LangCenterError::api_request(self.message));
        }
        self.data.ok_or_else(|| {
            LangCenterError::serialization("API response thiếu trường data".to_string())
        })
    }
}
