use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use super::entities::{Exam, ExamStatus, ExamType};

// Yêu cầu tạo bài thi mới
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct CreateExamRequest {
    pub class_id: i64,
    pub name: String,
    pub exam_type: ExamType,
    pub exam_date: Option<chrono::NaiveDate>,
    pub description: Option<String>,
    // Tổng điểm tối đa, tính từ danh sách kỹ năng gửi kèm
    #[serde(default)]
    pub total_max_score: f64,
}

// Yêu cầu cập nhật bài thi, chỉ gửi các trường có giá trị.
//
// exam_date và description là cột cho phép null nên bọc hai lớp Option:
// vắng mặt = giữ nguyên, Some(None) = gửi null để xóa giá trị. Phát lại
// ảnh chụp cần phân biệt này khi bản đã lưu chưa đặt ngày thi hay mô tả.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct UpdateExamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_type: Option<ExamType>,
    #[serde(
        default,
        deserialize_with = "nullable_field",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(type = "string | null")]
    pub exam_date: Option<Option<chrono::NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "nullable_field",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(type = "string | null")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ExamStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_max_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
}

/// Giữ phân biệt "không gửi" với "gửi null" khi giải mã trường hai lớp Option
fn nullable_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

impl UpdateExamRequest {
    /// Yêu cầu chỉ đổi trạng thái
    pub fn status_only(status: ExamStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Yêu cầu xóa mềm
    pub fn soft_delete() -> Self {
        Self {
            is_deleted: Some(true),
            ..Self::default()
        }
    }
}

impl From<&Exam> for UpdateExamRequest {
    /// Dùng khi phát lại ảnh chụp: đưa bài thi về đúng các giá trị đã lưu,
    /// kể cả những trường bản đã lưu để trống
    fn from(exam: &Exam) -> Self {
        Self {
            name: Some(exam.name.clone()),
            exam_type: Some(exam.exam_type),
            exam_date: Some(exam.exam_date),
            description: Some(exam.description.clone()),
            status: Some(exam.status),
            total_max_score: Some(exam.total_max_score),
            is_deleted: Some(exam.is_deleted),
        }
    }
}
