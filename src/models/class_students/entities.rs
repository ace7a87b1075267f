use serde::{Deserialize, Serialize};
use ts_rs::TS;

// Học viên thuộc một lớp học
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_student.ts")]
pub struct ClassStudent {
    // ID dòng ghi danh
    pub id: i64,
    // ID lớp học
    pub class_id: i64,
    // ID học viên
    pub student_id: i64,
    // Họ tên học viên
    pub full_name: String,
    // Đã xóa mềm chưa
    pub is_deleted: bool,
    // Thời điểm ghi danh
    pub created_at: chrono::DateTime<chrono::Utc>,
    // Thời điểm cập nhật
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
