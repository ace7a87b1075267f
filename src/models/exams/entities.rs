use serde::{Deserialize, Serialize};
use ts_rs::TS;

// Loại bài thi
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub enum ExamType {
    Periodic,    // kiểm tra định kỳ
    Midterm,     // thi giữa khóa
    Final,       // thi cuối khóa
    Level,       // kiểm tra trình độ
    Certificate, // thi chứng chỉ
}

impl ExamType {
    pub const PERIODIC: &'static str = "periodic";
    pub const MIDTERM: &'static str = "midterm";
    pub const FINAL: &'static str = "final";
    pub const LEVEL: &'static str = "level";
    pub const CERTIFICATE: &'static str = "certificate";

    /// Tên hiển thị cho người dùng
    pub fn label(&self) -> &'static str {
        match self {
            ExamType::Periodic => "Kiểm tra định kỳ",
            ExamType::Midterm => "Thi giữa khóa",
            ExamType::Final => "Thi cuối khóa",
            ExamType::Level => "Kiểm tra trình độ",
            ExamType::Certificate => "Thi chứng chỉ",
        }
    }
}

impl<'de> Deserialize<'de> for ExamType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            ExamType::PERIODIC => Ok(ExamType::Periodic),
            ExamType::MIDTERM => Ok(ExamType::Midterm),
            ExamType::FINAL => Ok(ExamType::Final),
            ExamType::LEVEL => Ok(ExamType::Level),
            ExamType::CERTIFICATE => Ok(ExamType::Certificate),
            _ => Err(serde::de::Error::custom(format!(
                "Loại bài thi không hợp lệ: '{s}'. Các loại hỗ trợ: periodic, midterm, final, level, certificate"
            ))),
        }
    }
}

impl std::fmt::Display for ExamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExamType::Periodic => write!(f, "{}", ExamType::PERIODIC),
            ExamType::Midterm => write!(f, "{}", ExamType::MIDTERM),
            ExamType::Final => write!(f, "{}", ExamType::FINAL),
            ExamType::Level => write!(f, "{}", ExamType::LEVEL),
            ExamType::Certificate => write!(f, "{}", ExamType::CERTIFICATE),
        }
    }
}

impl std::str::FromStr for ExamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "periodic" => Ok(ExamType::Periodic),
            "midterm" => Ok(ExamType::Midterm),
            "final" => Ok(ExamType::Final),
            "level" => Ok(ExamType::Level),
            "certificate" => Ok(ExamType::Certificate),
            _ => Err(format!("Invalid exam type: {s}")),
        }
    }
}

// Trạng thái bài thi
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub enum ExamStatus {
    Draft,      // bản nháp
    InProgress, // đang diễn ra
    Review,     // chờ duyệt điểm
    Completed,  // đã hoàn thành
    Cancelled,  // đã hủy
}

impl ExamStatus {
    pub const DRAFT: &'static str = "draft";
    pub const IN_PROGRESS: &'static str = "in_progress";
    pub const REVIEW: &'static str = "review";
    pub const COMPLETED: &'static str = "completed";
    pub const CANCELLED: &'static str = "cancelled";

    /// Các trạng thái có thể chuyển sang từ trạng thái hiện tại
    pub fn allowed_targets(&self) -> &'static [ExamStatus] {
        match self {
            ExamStatus::Draft => &[ExamStatus::InProgress],
            ExamStatus::InProgress => &[
                ExamStatus::Review,
                ExamStatus::Completed,
                ExamStatus::Cancelled,
            ],
            ExamStatus::Review => &[ExamStatus::Completed, ExamStatus::Cancelled],
            ExamStatus::Completed => &[],
            ExamStatus::Cancelled => &[],
        }
    }

    /// Kiểm tra bước chuyển trạng thái có hợp lệ không
    pub fn can_transition(&self, target: ExamStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Trạng thái kết thúc, không cho chỉnh sửa bài thi nữa
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExamStatus::Completed | ExamStatus::Cancelled)
    }

    /// Tên hiển thị cho người dùng
    pub fn label(&self) -> &'static str {
        match self {
            ExamStatus::Draft => "Bản nháp",
            ExamStatus::InProgress => "Đang diễn ra",
            ExamStatus::Review => "Chờ duyệt điểm",
            ExamStatus::Completed => "Đã hoàn thành",
            ExamStatus::Cancelled => "Đã hủy",
        }
    }
}

impl<'de> Deserialize<'de> for ExamStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            ExamStatus::DRAFT => Ok(ExamStatus::Draft),
            ExamStatus::IN_PROGRESS => Ok(ExamStatus::InProgress),
            ExamStatus::REVIEW => Ok(ExamStatus::Review),
            ExamStatus::COMPLETED => Ok(ExamStatus::Completed),
            ExamStatus::CANCELLED => Ok(ExamStatus::Cancelled),
            _ => Err(serde::de::Error::custom(format!(
                "Trạng thái bài thi không hợp lệ: '{s}'. Các trạng thái hỗ trợ: draft, in_progress, review, completed, cancelled"
            ))),
        }
    }
}

impl std::fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExamStatus::Draft => write!(f, "{}", ExamStatus::DRAFT),
            ExamStatus::InProgress => write!(f, "{}", ExamStatus::IN_PROGRESS),
            ExamStatus::Review => write!(f, "{}", ExamStatus::REVIEW),
            ExamStatus::Completed => write!(f, "{}", ExamStatus::COMPLETED),
            ExamStatus::Cancelled => write!(f, "{}", ExamStatus::CANCELLED),
        }
    }
}

impl std::str::FromStr for ExamStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ExamStatus::Draft),
            "in_progress" => Ok(ExamStatus::InProgress),
            "review" => Ok(ExamStatus::Review),
            "completed" => Ok(ExamStatus::Completed),
            "cancelled" => Ok(ExamStatus::Cancelled),
            _ => Err(format!("Invalid exam status: {s}")),
        }
    }
}

// Thực thể bài thi
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct Exam {
    // ID bài thi
    pub id: i64,
    // ID lớp học
    pub class_id: i64,
    // Tên bài thi
    pub name: String,
    // Loại bài thi
    pub exam_type: ExamType,
    // Ngày thi
    pub exam_date: Option<chrono::NaiveDate>,
    // Mô tả
    pub description: Option<String>,
    // Tổng điểm tối đa, bằng tổng max_score của các kỹ năng đang hoạt động
    pub total_max_score: f64,
    // Trạng thái
    pub status: ExamStatus,
    // Đã xóa mềm chưa
    pub is_deleted: bool,
    // Thời điểm tạo
    pub created_at: chrono::DateTime<chrono::Utc>,
    // Thời điểm cập nhật
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
