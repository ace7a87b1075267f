use serde::{Deserialize, Serialize};
use ts_rs::TS;

// Bậc năng lực theo khung CEFR
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl<'de> Deserialize<'de> for CefrLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            _ => Err(serde::de::Error::custom(format!(
                "Bậc CEFR không hợp lệ: '{s}'. Các bậc hỗ trợ: A1, A2, B1, B2, C1, C2"
            ))),
        }
    }
}

impl std::fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CefrLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            _ => Err(format!("Invalid CEFR level: {s}")),
        }
    }
}

// Phiếu điểm của một học viên cho một kỹ năng
//
// Được tạo sẵn (rỗng) ngay khi kỹ năng được thêm vào bài thi,
// giáo viên điền điểm sau.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ExamResult {
    // ID phiếu điểm
    pub id: i64,
    // ID kỹ năng của bài thi
    pub exam_skill_id: i64,
    // ID học viên
    pub student_id: i64,
    // Điểm số
    pub score: Option<f64>,
    // Bậc CEFR
    pub level: Option<CefrLevel>,
    // Nhận xét của giáo viên
    pub teacher_comment: Option<String>,
    // Đạt hay không
    pub is_passed: Option<bool>,
    // Điểm quy đổi
    pub grade_point: Option<f64>,
    // Đã xóa mềm chưa
    pub is_deleted: bool,
    // Thời điểm tạo
    pub created_at: chrono::DateTime<chrono::Utc>,
    // Thời điểm cập nhật
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ExamResult {
    /// Phiếu đã có điểm thật sự chưa
    ///
    /// Phiếu tạo sẵn nhưng chưa chấm thì vẫn được phép xóa kỹ năng.
    pub fn has_recorded_score(&self) -> bool {
        self.score.is_some() || self.level.is_some() || self.grade_point.is_some()
    }
}
