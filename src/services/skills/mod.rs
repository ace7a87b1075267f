pub mod analyzer;
pub mod executor;

pub use analyzer::{SkillChangeSet, SkillWrite, analyze_skill_changes};

use std::sync::Arc;

use crate::api::ExamApi;
use crate::config::SyncConfig;
use crate::errors::Result;
use crate::models::skills::entities::SkillRowState;
use crate::models::skills::requests::SkillUpdateData;
use crate::models::skills::responses::SkillSyncReport;

/// Dịch vụ đồng bộ kỹ năng của bài thi
///
/// Tách riêng hai pha: phân loại thuần túy (analyzer) và thi hành tuần
/// tự các lệnh ghi (executor), để pha phân loại kiểm thử được mà không
/// cần máy chủ.
pub struct SkillService {
    api: Arc<dyn ExamApi>,
    result_batch_size: usize,
}

impl SkillService {
    pub fn new(api: Arc<dyn ExamApi>, sync: &SyncConfig) -> Self {
        Self {
            api,
            result_batch_size: sync.result_batch_size.max(1),
        }
    }

    pub(crate) fn api(&self) -> &dyn ExamApi {
        self.api.as_ref()
    }

    pub(crate) fn result_batch_size(&self) -> usize {
        self.result_batch_size
    }

    // Phân loại thay đổi giữa trạng thái máy chủ và trạng thái mong muốn
    pub fn analyze(
        &self,
        current: &[SkillRowState],
        desired: &[SkillUpdateData],
    ) -> SkillChangeSet {
        analyzer::analyze_skill_changes(current, desired)
    }

    // Thi hành tập thay đổi đã phân loại, trả về báo cáo gộp lỗi lẻ
    pub async fn execute(
        &self,
        exam_id: i64,
        class_id: i64,
        changes: SkillChangeSet,
    ) -> SkillSyncReport {
        executor::execute_skill_changes(self, exam_id, class_id, changes).await
    }

    // Tải trạng thái hiện có, phân loại rồi thi hành trong một lượt
    pub async fn sync_skills(
        &self,
        exam_id: i64,
        class_id: i64,
        desired: &[SkillUpdateData],
    ) -> Result<SkillSyncReport> {
        let rows = self.api.list_exam_skills(exam_id).await?;
        let current: Vec<SkillRowState> = rows.into_iter().map(Into::into).collect();
        let changes = self.analyze(&current, desired);
        Ok(self.execute(exam_id, class_id, changes).await)
    }
}
