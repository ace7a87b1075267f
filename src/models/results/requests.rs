use serde::{Deserialize, Serialize};
use ts_rs::TS;

// Yêu cầu tạo phiếu điểm rỗng cho một học viên
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct CreateResultRequest {
    pub exam_skill_id: i64,
    pub student_id: i64,
}
