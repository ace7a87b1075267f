use serde::{Deserialize, Serialize};
use ts_rs::TS;

// Kết quả một lượt đồng bộ kỹ năng
//
// Mỗi nhóm ghi lại ID các dòng đã xử lý xong; lỗi của từng dòng được
// gom vào `errors` thay vì dừng cả lượt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/skill.ts")]
pub struct SkillSyncReport {
    pub deleted: Vec<i64>,
    pub reactivated: Vec<i64>,
    pub updated: Vec<i64>,
    pub added: Vec<i64>,
    pub kept: Vec<i64>,
    // Số phiếu điểm đã tạo sẵn cho học viên
    pub results_seeded: usize,
    // Thông báo lỗi của từng dòng, rỗng nghĩa là trọn vẹn
    pub errors: Vec<String>,
}

impl SkillSyncReport {
    /// Lượt đồng bộ không gặp lỗi nào
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Tổng số dòng đã ghi lên máy chủ
    pub fn total_written(&self) -> usize {
        self.deleted.len() + self.reactivated.len() + self.updated.len() + self.added.len()
    }

    /// Tóm tắt một dòng để ghi log
    pub fn summary(&self) -> String {
        format!(
            "deleted={} reactivated={} updated={} added={} kept={} seeded={} errors={}",
            self.deleted.len(),
            self.reactivated.len(),
            self.updated.len(),
            self.added.len(),
            self.kept.len(),
            self.results_seeded,
            self.errors.len()
        )
    }
}
