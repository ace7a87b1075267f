use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{ExamSkill, SkillType};

// Trạng thái mong muốn của một kỹ năng, do form chỉnh sửa gửi lên
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/skill.ts")]
pub struct SkillUpdateData {
    // ID dòng hiện có, None nếu là kỹ năng mới
    pub id: Option<i64>,
    pub skill_type: SkillType,
    pub max_score: f64,
    pub weight: f64,
    pub order_index: i32,
}

impl From<&ExamSkill> for SkillUpdateData {
    fn from(row: &ExamSkill) -> Self {
        Self {
            id: Some(row.id),
            skill_type: row.skill_type,
            max_score: row.max_score,
            weight: row.weight,
            order_index: row.order_index,
        }
    }
}

// Yêu cầu tạo kỹ năng mới
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/skill.ts")]
pub struct CreateSkillRequest {
    pub exam_id: i64,
    pub skill_type: SkillType,
    pub max_score: f64,
    pub weight: f64,
    pub order_index: i32,
}

impl CreateSkillRequest {
    pub fn from_update_data(exam_id: i64, data: &SkillUpdateData) -> Self {
        Self {
            exam_id,
            skill_type: data.skill_type,
            max_score: data.max_score,
            weight: data.weight,
            order_index: data.order_index,
        }
    }
}

// Yêu cầu cập nhật kỹ năng, chỉ gửi các trường có giá trị
//
// exam_id và skill_type của một dòng là bất biến, không nằm trong yêu cầu này.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/skill.ts")]
pub struct UpdateSkillRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
}

impl UpdateSkillRequest {
    /// Đánh dấu xóa mềm
    pub fn soft_delete() -> Self {
        Self {
            is_deleted: Some(true),
            ..Self::default()
        }
    }

    /// Kích hoạt lại dòng đã xóa mềm kèm số liệu mới
    pub fn reactivate(data: &SkillUpdateData) -> Self {
        Self {
            max_score: Some(data.max_score),
            weight: Some(data.weight),
            order_index: Some(data.order_index),
            is_deleted: Some(false),
        }
    }

    /// Cập nhật số liệu của dòng đang hoạt động
    pub fn apply(data: &SkillUpdateData) -> Self {
        Self {
            max_score: Some(data.max_score),
            weight: Some(data.weight),
            order_index: Some(data.order_index),
            is_deleted: None,
        }
    }
}
