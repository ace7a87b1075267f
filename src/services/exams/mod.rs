pub mod create;
pub mod delete;
pub mod list;
pub mod status;
pub mod update;

use std::sync::Arc;

use crate::api::ExamApi;
use crate::cache::{CacheStats, ClassDataCache};
use crate::config::SyncConfig;
use crate::errors::Result;
use crate::models::class_students::entities::ClassStudent;
use crate::models::exams::entities::{Exam, ExamStatus};
use crate::models::exams::requests::{CreateExamRequest, UpdateExamRequest};
use crate::models::exams::responses::{ExamMutationOutcome, ExamWithSkills};
use crate::models::skills::requests::SkillUpdateData;
use crate::services::recovery::SnapshotStore;
use crate::services::skills::SkillService;

/// Dịch vụ quản lý bài thi
///
/// Mặt tiền cho mọi thao tác trên bài thi và kỹ năng của nó: ghi theo
/// hai pha (bài thi trước, kỹ năng sau), đọc qua cache, và chụp lại
/// trạng thái trước mỗi lần ghi để còn khôi phục.
pub struct ExamService {
    api: Arc<dyn ExamApi>,
    cache: Arc<dyn ClassDataCache>,
    snapshots: Arc<SnapshotStore>,
    skills: SkillService,
}

impl ExamService {
    pub fn new(
        api: Arc<dyn ExamApi>,
        cache: Arc<dyn ClassDataCache>,
        snapshots: Arc<SnapshotStore>,
        sync: &SyncConfig,
    ) -> Self {
        let skills = SkillService::new(api.clone(), sync);
        Self {
            api,
            cache,
            snapshots,
            skills,
        }
    }

    pub(crate) fn api(&self) -> &dyn ExamApi {
        self.api.as_ref()
    }

    pub(crate) fn cache(&self) -> &dyn ClassDataCache {
        self.cache.as_ref()
    }

    pub(crate) fn snapshots(&self) -> &SnapshotStore {
        self.snapshots.as_ref()
    }

    pub(crate) fn skills(&self) -> &SkillService {
        &self.skills
    }

    // Tạo bài thi mới kèm danh sách kỹ năng
    pub async fn create_exam_with_skills(
        &self,
        exam_data: CreateExamRequest,
        skills_data: Vec<SkillUpdateData>,
    ) -> ExamMutationOutcome {
        create::create_exam_with_skills(self, exam_data, skills_data).await
    }

    // Cập nhật bài thi và đồng bộ kỹ năng theo trạng thái mong muốn
    pub async fn update_exam_with_skills(
        &self,
        exam_id: i64,
        exam_data: UpdateExamRequest,
        skills_data: Vec<SkillUpdateData>,
    ) -> ExamMutationOutcome {
        update::update_exam_with_skills(self, exam_id, exam_data, skills_data).await
    }

    // Danh sách bài thi của lớp, đọc qua cache
    pub async fn list_class_exams(&self, class_id: i64) -> Result<Vec<Exam>> {
        list::list_class_exams(self, class_id).await
    }

    // Danh sách học viên của lớp, đọc qua cache
    pub async fn list_class_students(&self, class_id: i64) -> Result<Vec<ClassStudent>> {
        list::list_class_students(self, class_id).await
    }

    // Bài thi kèm các kỹ năng đang hoạt động
    pub async fn get_exam_with_skills(&self, exam_id: i64) -> Result<Option<ExamWithSkills>> {
        list::get_exam_with_skills(self, exam_id).await
    }

    // Chuyển trạng thái bài thi theo luồng cho phép
    pub async fn change_status(&self, exam_id: i64, target: ExamStatus) -> Result<Exam> {
        status::change_status(self, exam_id, target).await
    }

    // Mở khóa bài thi đã hoàn thành để duyệt lại điểm
    pub async fn unlock_exam(&self, exam_id: i64) -> Result<Exam> {
        status::unlock_exam(self, exam_id).await
    }

    // Xóa mềm bài thi
    pub async fn delete_exam(&self, exam_id: i64) -> Result<bool> {
        delete::delete_exam(self, exam_id).await
    }

    // Số liệu cache phục vụ chẩn đoán
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}
