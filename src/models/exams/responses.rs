use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Exam;
use crate::models::skills::entities::ExamSkill;
use crate::models::skills::responses::SkillSyncReport;

// Bài thi kèm các kỹ năng đang hoạt động
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamWithSkills {
    pub exam: Exam,
    pub skills: Vec<ExamSkill>,
}

// Kết quả một thao tác tạo hoặc cập nhật bài thi
//
// Thao tác gồm nhiều bước ghi, nên lỗi lẻ tẻ được gom lại đây
// thay vì ném ra giữa chừng.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamMutationOutcome {
    // Bài thi sau thao tác, None nếu bước tạo/cập nhật chính thất bại
    pub exam: Option<Exam>,
    pub success: bool,
    // Thông báo lỗi tổng hợp cho người dùng
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub skills: SkillSyncReport,
}

impl ExamMutationOutcome {
    /// Thao tác thất bại trước khi ghi được gì
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            exam: None,
            success: false,
            error: Some(message.into()),
            skills: SkillSyncReport::default(),
        }
    }

    /// Gộp kết quả đồng bộ kỹ năng vào kết quả chung
    pub fn from_sync(exam: Exam, skills: SkillSyncReport) -> Self {
        let success = skills.is_ok();
        let error = if success {
            None
        } else {
            Some(format!(
                "Một số kỹ năng không được lưu: {}",
                skills.errors.join("; ")
            ))
        };
        Self {
            exam: Some(exam),
            success,
            error,
            skills,
        }
    }
}
