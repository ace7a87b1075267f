use serde::{Deserialize, Serialize};
use ts_rs::TS;

// Loại kỹ năng của bài thi
//
// Mỗi bài thi chỉ có tối đa một kỹ năng đang hoạt động cho mỗi loại.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/skill.ts")]
pub enum SkillType {
    Listening,     // nghe
    Speaking,      // nói
    Reading,       // đọc
    Writing,       // viết
    Comprehensive, // tổng hợp
}

impl SkillType {
    pub const LISTENING: &'static str = "listening";
    pub const SPEAKING: &'static str = "speaking";
    pub const READING: &'static str = "reading";
    pub const WRITING: &'static str = "writing";
    pub const COMPREHENSIVE: &'static str = "comprehensive";

    /// Tên hiển thị cho người dùng
    pub fn label(&self) -> &'static str {
        match self {
            SkillType::Listening => "Nghe",
            SkillType::Speaking => "Nói",
            SkillType::Reading => "Đọc",
            SkillType::Writing => "Viết",
            SkillType::Comprehensive => "Tổng hợp",
        }
    }
}

impl<'de> Deserialize<'de> for SkillType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            SkillType::LISTENING => Ok(SkillType::Listening),
            SkillType::SPEAKING => Ok(SkillType::Speaking),
            SkillType::READING => Ok(SkillType::Reading),
            SkillType::WRITING => Ok(SkillType::Writing),
            SkillType::COMPREHENSIVE => Ok(SkillType::Comprehensive),
            _ => Err(serde::de::Error::custom(format!(
                "Kỹ năng không hợp lệ: '{s}'. Các kỹ năng hỗ trợ: listening, speaking, reading, writing, comprehensive"
            ))),
        }
    }
}

impl std::fmt::Display for SkillType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillType::Listening => write!(f, "{}", SkillType::LISTENING),
            SkillType::Speaking => write!(f, "{}", SkillType::SPEAKING),
            SkillType::Reading => write!(f, "{}", SkillType::READING),
            SkillType::Writing => write!(f, "{}", SkillType::WRITING),
            SkillType::Comprehensive => write!(f, "{}", SkillType::COMPREHENSIVE),
        }
    }
}

impl std::str::FromStr for SkillType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listening" => Ok(SkillType::Listening),
            "speaking" => Ok(SkillType::Speaking),
            "reading" => Ok(SkillType::Reading),
            "writing" => Ok(SkillType::Writing),
            "comprehensive" => Ok(SkillType::Comprehensive),
            _ => Err(format!("Invalid skill type: {s}")),
        }
    }
}

// Thực thể kỹ năng của bài thi
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/skill.ts")]
pub struct ExamSkill {
    // ID kỹ năng
    pub id: i64,
    // ID bài thi
    pub exam_id: i64,
    // Loại kỹ năng
    pub skill_type: SkillType,
    // Điểm tối đa
    pub max_score: f64,
    // Trọng số khi tính điểm trung bình
    pub weight: f64,
    // Thứ tự hiển thị
    pub order_index: i32,
    // Đã xóa mềm chưa
    pub is_deleted: bool,
    // Thời điểm tạo
    pub created_at: chrono::DateTime<chrono::Utc>,
    // Thời điểm cập nhật
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Trạng thái một dòng kỹ năng trên máy chủ
///
/// Máy chủ chỉ xóa mềm, nên một dòng đã xóa vẫn giữ nguyên ID
/// và có thể được kích hoạt lại thay vì tạo dòng mới. Kiểu này
/// buộc nơi xử lý phải phân biệt rõ hai trạng thái đó.
#[derive(Debug, Clone)]
pub enum SkillRowState {
    /// Kỹ năng đang hoạt động
    Active(ExamSkill),
    /// Dòng đã xóa mềm, giữ lại ID để có thể kích hoạt lại
    Tombstoned { id: i64, last_known: ExamSkill },
}

impl From<ExamSkill> for SkillRowState {
    fn from(row: ExamSkill) -> Self {
        if row.is_deleted {
            SkillRowState::Tombstoned {
                id: row.id,
                last_known: row,
            }
        } else {
            SkillRowState::Active(row)
        }
    }
}

impl SkillRowState {
    pub fn id(&self) -> i64 {
        match self {
            SkillRowState::Active(row) => row.id,
            SkillRowState::Tombstoned { id, .. } => *id,
        }
    }

    pub fn skill_type(&self) -> SkillType {
        match self {
            SkillRowState::Active(row) => row.skill_type,
            SkillRowState::Tombstoned { last_known, .. } => last_known.skill_type,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SkillRowState::Active(_))
    }
}
