pub mod rollback;
pub mod snapshot;

pub use snapshot::{ExamOperation, OperationSnapshot, SnapshotStore};

use std::sync::Arc;

use crate::errors::Result;
use crate::models::exams::responses::ExamMutationOutcome;
use crate::services::exams::ExamService;

/// Dịch vụ khôi phục thao tác
///
/// Đọc kho ảnh chụp và phát lại trạng thái trước đó qua đường cập nhật
/// thường. Khôi phục là nỗ lực tốt nhất, không phải giao dịch.
pub struct RecoveryService {
    exams: Arc<ExamService>,
    snapshots: Arc<SnapshotStore>,
}

impl RecoveryService {
    pub fn new(exams: Arc<ExamService>, snapshots: Arc<SnapshotStore>) -> Self {
        Self { exams, snapshots }
    }

    pub(crate) fn exams(&self) -> &ExamService {
        self.exams.as_ref()
    }

    pub(crate) fn snapshots(&self) -> &SnapshotStore {
        self.snapshots.as_ref()
    }

    // Khôi phục thao tác gần nhất
    pub async fn rollback_last_operation(&self) -> Result<ExamMutationOutcome> {
        rollback::rollback_last_operation(self).await
    }

    // Khôi phục theo ID ảnh chụp
    pub async fn rollback_to_snapshot(&self, snapshot_id: &str) -> Result<ExamMutationOutcome> {
        rollback::rollback_to_snapshot(self, snapshot_id).await
    }

    // Danh sách ảnh chụp hiện có, mới nhất trước
    pub fn list_snapshots(&self) -> Vec<OperationSnapshot> {
        self.snapshots.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ExamApi;
    use crate::api::memory::MemoryApi;
    use crate::cache::versioned::VersionedClassCache;
    use crate::config::{CacheConfig, SnapshotConfig, SyncConfig};
    use crate::errors::LangCenterError;
    use crate::models::exams::entities::ExamType;
    use crate::models::exams::requests::{CreateExamRequest, UpdateExamRequest};
    use crate::models::skills::entities::SkillType;
    use crate::models::skills::requests::SkillUpdateData;

    fn wired(api: Arc<MemoryApi>) -> RecoveryService {
        let snapshots = Arc::new(SnapshotStore::new(&SnapshotConfig::default()));
        let exams = Arc::new(ExamService::new(
            api,
            Arc::new(VersionedClassCache::new(&CacheConfig::default())),
            snapshots.clone(),
            &SyncConfig::default(),
        ));
        RecoveryService::new(exams, snapshots)
    }

    fn create_request(name: &str) -> CreateExamRequest {
        CreateExamRequest {
            class_id: 7,
            name: name.to_string(),
            exam_type: ExamType::Final,
            exam_date: Some(chrono::NaiveDate::from_ymd_opt(2026, 6, 20).unwrap()),
            description: None,
            total_max_score: 0.0,
        }
    }

    fn desired(skill_type: SkillType, max_score: f64, order_index: i32) -> SkillUpdateData {
        SkillUpdateData {
            id: None,
            skill_type,
            max_score,
            weight: 1.0,
            order_index,
        }
    }

    fn rename(name: &str) -> UpdateExamRequest {
        UpdateExamRequest {
            name: Some(name.to_string()),
            ..UpdateExamRequest::default()
        }
    }

    #[tokio::test]
    async fn test_rollback_restores_exam_and_skill_rows() {
        let api = Arc::new(MemoryApi::new());
        let recovery = wired(api.clone());

        let exam_id = recovery
            .exams()
            .create_exam_with_skills(
                create_request("Phiên bản đầu"),
                vec![
                    desired(SkillType::Listening, 40.0, 0),
                    desired(SkillType::Reading, 60.0, 1),
                ],
            )
            .await
            .exam
            .unwrap()
            .id;
        let reading_id = api
            .list_exam_skills(exam_id)
            .await
            .unwrap()
            .iter()
            .find(|s| s.skill_type == SkillType::Reading)
            .unwrap()
            .id;

        // Sửa tên và bỏ kỹ năng đọc
        let updated = recovery
            .exams()
            .update_exam_with_skills(
                exam_id,
                rename("Phiên bản sửa"),
                vec![desired(SkillType::Listening, 50.0, 0)],
            )
            .await;
        assert!(updated.success, "error: {:?}", updated.error);

        let outcome = recovery.rollback_last_operation().await.unwrap();
        assert!(outcome.success, "error: {:?}", outcome.error);

        let detail = recovery
            .exams()
            .get_exam_with_skills(exam_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.exam.name, "Phiên bản đầu");
        assert_eq!(detail.exam.total_max_score, 100.0);
        assert_eq!(detail.skills.len(), 2);
        assert_eq!(detail.skills[0].max_score, 40.0);
        // Dòng đọc được kích hoạt lại, không tạo dòng mới
        assert_eq!(detail.skills[1].id, reading_id);
        assert_eq!(detail.skills[1].max_score, 60.0);

        // Lần phát lại cũng được ghi thành một ảnh chụp mới
        assert_eq!(recovery.list_snapshots().len(), 3);
    }

    #[tokio::test]
    async fn test_rollback_clears_fields_set_after_the_snapshot() {
        let api = Arc::new(MemoryApi::new());
        let recovery = wired(api.clone());

        // Bài thi chưa chốt ngày thi, chưa có mô tả
        let mut bare = create_request("Thi chưa chốt lịch");
        bare.exam_date = None;
        let exam_id = recovery
            .exams()
            .create_exam_with_skills(bare, vec![])
            .await
            .exam
            .unwrap()
            .id;

        // Lần sửa đặt cả hai trường
        let updated = recovery
            .exams()
            .update_exam_with_skills(
                exam_id,
                UpdateExamRequest {
                    exam_date: Some(Some(chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())),
                    description: Some(Some("Ca sáng".to_string())),
                    ..UpdateExamRequest::default()
                },
                vec![],
            )
            .await;
        assert!(updated.success, "error: {:?}", updated.error);

        // Phát lại phải trả hai trường về trống, không được giữ giá trị mới
        let outcome = recovery.rollback_last_operation().await.unwrap();
        assert!(outcome.success, "error: {:?}", outcome.error);

        let exam = api.get_exam(exam_id).await.unwrap().unwrap();
        assert_eq!(exam.exam_date, None);
        assert_eq!(exam.description, None);
    }

    #[tokio::test]
    async fn test_rollback_targets_a_specific_snapshot() {
        let api = Arc::new(MemoryApi::new());
        let recovery = wired(api);

        let exam_id = recovery
            .exams()
            .create_exam_with_skills(create_request("Tên gốc"), vec![])
            .await
            .exam
            .unwrap()
            .id;
        recovery
            .exams()
            .update_exam_with_skills(exam_id, rename("Tên thứ hai"), vec![])
            .await;
        let first_update_id = recovery.list_snapshots()[0].id.clone();
        recovery
            .exams()
            .update_exam_with_skills(exam_id, rename("Tên thứ ba"), vec![])
            .await;

        // Ảnh chụp của lần sửa đầu giữ trạng thái ngay sau khi tạo
        let outcome = recovery
            .rollback_to_snapshot(&first_update_id)
            .await
            .unwrap();
        assert!(outcome.success, "error: {:?}", outcome.error);
        assert_eq!(outcome.exam.unwrap().name, "Tên gốc");
    }

    #[tokio::test]
    async fn test_unsupported_operations_are_reported_honestly() {
        let api = Arc::new(MemoryApi::new());
        let recovery = wired(api);

        let exam_id = recovery
            .exams()
            .create_exam_with_skills(create_request("Thi thử"), vec![])
            .await
            .exam
            .unwrap()
            .id;

        let err = recovery.rollback_last_operation().await.unwrap_err();
        assert!(matches!(err, LangCenterError::RollbackUnsupported(_)));
        assert!(err.message().contains("tạo bài thi"));

        recovery.exams().delete_exam(exam_id).await.unwrap();
        let err = recovery.rollback_last_operation().await.unwrap_err();
        assert!(matches!(err, LangCenterError::RollbackUnsupported(_)));
        assert!(err.message().contains("xóa bài thi"));
    }

    #[tokio::test]
    async fn test_missing_snapshots_are_reported() {
        let api = Arc::new(MemoryApi::new());
        let recovery = wired(api);

        let err = recovery.rollback_last_operation().await.unwrap_err();
        assert!(matches!(err, LangCenterError::SnapshotNotFound(_)));
        assert!(err.message().contains("Chưa có thao tác"));

        let err = recovery
            .rollback_to_snapshot("khong-ton-tai")
            .await
            .unwrap_err();
        assert!(matches!(err, LangCenterError::SnapshotNotFound(_)));
        assert!(err.message().contains("Không tìm thấy ảnh chụp"));
    }
}
