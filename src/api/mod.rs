use std::sync::Arc;

use crate::models::{
    class_students::entities::ClassStudent,
    exams::{
        entities::Exam,
        requests::{CreateExamRequest, UpdateExamRequest},
    },
    results::{entities::ExamResult, requests::CreateResultRequest},
    skills::{
        entities::{ExamSkill, SkillType},
        requests::{CreateSkillRequest, UpdateSkillRequest},
    },
};

use crate::config::ApiConfig;
use crate::errors::Result;
use crate::utils::token::AuthTokenProvider;

pub mod memory;
pub mod rest;

#[async_trait::async_trait]
pub trait ExamApi: Send + Sync {
    /// Bài thi
    // Tạo bài thi
    async fn create_exam(&self, exam: CreateExamRequest) -> Result<Exam>;
    // Lấy bài thi theo ID, bỏ qua bài đã xóa mềm
    async fn get_exam(&self, exam_id: i64) -> Result<Option<Exam>>;
    // Liệt kê bài thi chưa xóa của một lớp
    async fn list_class_exams(&self, class_id: i64) -> Result<Vec<Exam>>;
    // Cập nhật bài thi
    async fn update_exam(&self, exam_id: i64, update: UpdateExamRequest) -> Result<Option<Exam>>;

    /// Kỹ năng của bài thi
    // Tạo kỹ năng; lỗi Conflict nếu loại này đang hoạt động trong bài thi
    async fn create_skill(&self, skill: CreateSkillRequest) -> Result<ExamSkill>;
    // Liệt kê mọi dòng kỹ năng của bài thi, kể cả dòng đã xóa mềm
    async fn list_exam_skills(&self, exam_id: i64) -> Result<Vec<ExamSkill>>;
    // Tìm kỹ năng đang hoạt động theo loại
    async fn find_active_skill(
        &self,
        exam_id: i64,
        skill_type: SkillType,
    ) -> Result<Option<ExamSkill>>;
    // Cập nhật kỹ năng, bao gồm xóa mềm và kích hoạt lại
    async fn update_skill(
        &self,
        skill_id: i64,
        update: UpdateSkillRequest,
    ) -> Result<Option<ExamSkill>>;

    /// Phiếu điểm
    // Tạo phiếu điểm rỗng cho một học viên
    async fn create_result(&self, result: CreateResultRequest) -> Result<ExamResult>;
    // Liệt kê phiếu điểm của một kỹ năng
    async fn list_skill_results(&self, exam_skill_id: i64) -> Result<Vec<ExamResult>>;

    /// Học viên trong lớp
    // Liệt kê học viên đang ghi danh
    async fn list_class_students(&self, class_id: i64) -> Result<Vec<ClassStudent>>;
}

/// Khởi tạo backend API theo cấu hình
pub fn create_api(
    config: &ApiConfig,
    tokens: Arc<dyn AuthTokenProvider>,
) -> Result<Arc<dyn ExamApi>> {
    match config.api_type.as_str() {
        "rest" => Ok(Arc::new(rest::RestApiClient::new(config, tokens)?)),
        "memory" => Ok(Arc::new(memory::MemoryApi::new())),
        other => {
            tracing::warn!("Unknown API backend '{other}', falling back to memory backend");
            Ok(Arc::new(memory::MemoryApi::new()))
        }
    }
}
