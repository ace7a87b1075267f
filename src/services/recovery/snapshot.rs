use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::debug;

use crate::config::SnapshotConfig;
use crate::models::exams::requests::{CreateExamRequest, UpdateExamRequest};
use crate::models::exams::responses::ExamWithSkills;
use crate::models::skills::requests::SkillUpdateData;

/// Một thao tác ghi kèm dữ liệu đã gửi đi
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum ExamOperation {
    CreateExam {
        request: CreateExamRequest,
        skills: Vec<SkillUpdateData>,
    },
    UpdateExam {
        exam_id: i64,
        request: UpdateExamRequest,
        skills: Vec<SkillUpdateData>,
    },
    DeleteExam {
        exam_id: i64,
    },
}

impl ExamOperation {
    /// Tên thao tác dùng trong log
    pub fn name(&self) -> &'static str {
        match self {
            ExamOperation::CreateExam { .. } => "create_exam",
            ExamOperation::UpdateExam { .. } => "update_exam",
            ExamOperation::DeleteExam { .. } => "delete_exam",
        }
    }

    /// Tên thao tác hiển thị cho người dùng
    pub fn label(&self) -> &'static str {
        match self {
            ExamOperation::CreateExam { .. } => "tạo bài thi",
            ExamOperation::UpdateExam { .. } => "cập nhật bài thi",
            ExamOperation::DeleteExam { .. } => "xóa bài thi",
        }
    }
}

/// Ảnh chụp một thao tác ghi
///
/// `rollback` giữ trạng thái bài thi ngay trước thao tác. Chỉ thao tác
/// cập nhật mới chụp được trạng thái trước đó nên mới khôi phục được;
/// các thao tác khác lưu lại để chẩn đoán là chính.
#[derive(Debug, Clone, Serialize)]
pub struct OperationSnapshot {
    pub id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub operation: ExamOperation,
    pub rollback: Option<ExamWithSkills>,
}

impl OperationSnapshot {
    /// Ảnh chụp này có đủ dữ liệu để khôi phục không
    pub fn can_rollback(&self) -> bool {
        matches!(self.operation, ExamOperation::UpdateExam { .. }) && self.rollback.is_some()
    }
}

/// Kho ảnh chụp thao tác, giới hạn số lượng
///
/// Ảnh mới đẩy vào đầu danh sách, ảnh cũ nhất bị dồn ra ngoài lặng lẽ.
/// Chỉ sống trong bộ nhớ tiến trình, không ghi ra đĩa.
pub struct SnapshotStore {
    entries: Mutex<VecDeque<OperationSnapshot>>,
    max_entries: usize,
}

impl SnapshotStore {
    pub fn new(config: &SnapshotConfig) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            max_entries: config.max_entries.max(1),
        }
    }

    /// Ghi lại một thao tác, trả về ID ảnh chụp
    pub fn record(
        &self,
        operation: ExamOperation,
        rollback: Option<ExamWithSkills>,
    ) -> String {
        let snapshot = OperationSnapshot {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now(),
            operation,
            rollback,
        };
        let id = snapshot.id.clone();
        debug!("Recording snapshot {} for {}", id, snapshot.operation.name());

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(snapshot);
        entries.truncate(self.max_entries);
        id
    }

    /// Tìm ảnh chụp theo ID, None nếu chưa từng có hoặc đã bị dồn ra
    pub fn get(&self, id: &str) -> Option<OperationSnapshot> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().find(|s| s.id == id).cloned()
    }

    /// Ảnh chụp gần nhất
    pub fn latest(&self) -> Option<OperationSnapshot> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.front().cloned()
    }

    /// Toàn bộ ảnh chụp, mới nhất trước
    pub fn list(&self) -> Vec<OperationSnapshot> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
