use tracing::info;

use super::ExamService;
use crate::errors::Result;
use crate::models::exams::requests::UpdateExamRequest;
use crate::services::recovery::ExamOperation;

/// Xóa mềm bài thi
///
/// Trả về false nếu bài thi không tồn tại hoặc đã xóa từ trước.
/// Phiếu điểm và kỹ năng giữ nguyên dưới dòng bài thi đã ẩn.
pub async fn delete_exam(service: &ExamService, exam_id: i64) -> Result<bool> {
    let Some(exam) = service.api().get_exam(exam_id).await? else {
        return Ok(false);
    };

    let deleted = service
        .api()
        .update_exam(exam_id, UpdateExamRequest::soft_delete())
        .await?
        .is_some();

    if deleted {
        service.cache().invalidate_class(exam.class_id).await;
        service
            .snapshots()
            .record(ExamOperation::DeleteExam { exam_id }, None);
        info!("Exam {} '{}' soft-deleted", exam_id, exam.name);
    }
    Ok(deleted)
}
