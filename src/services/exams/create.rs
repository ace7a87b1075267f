use tracing::{error, info};

use super::ExamService;
use crate::models::exams::requests::CreateExamRequest;
use crate::models::exams::responses::ExamMutationOutcome;
use crate::models::skills::requests::SkillUpdateData;
use crate::services::recovery::ExamOperation;
use crate::services::skills::SkillChangeSet;
use crate::utils::validate::validate_exam_payload;

/// Tạo bài thi kèm kỹ năng theo hai pha
///
/// Pha một tạo dòng bài thi; thất bại thì dừng luôn, chưa ghi gì khác.
/// Pha hai thêm từng kỹ năng và tạo sẵn phiếu điểm; lỗi lẻ tẻ được gom
/// vào kết quả thay vì hủy bài thi vừa tạo.
pub async fn create_exam_with_skills(
    service: &ExamService,
    exam_data: CreateExamRequest,
    skills_data: Vec<SkillUpdateData>,
) -> ExamMutationOutcome {
    let check = validate_exam_payload(&exam_data.name, &skills_data);
    if !check.is_valid {
        return ExamMutationOutcome::failed(check.error_message());
    }

    // Tổng điểm tối đa suy ra từ danh sách kỹ năng
    let mut exam_data = exam_data;
    exam_data.total_max_score = skills_data.iter().map(|s| s.max_score).sum();

    let exam = match service.api().create_exam(exam_data.clone()).await {
        Ok(exam) => exam,
        Err(e) => {
            error!("Exam creation failed: {e}");
            return ExamMutationOutcome::failed(format!(
                "Không tạo được bài thi: {}",
                e.message()
            ));
        }
    };
    info!("Exam {} '{}' created for class {}", exam.id, exam.name, exam.class_id);

    // Bài thi mới chưa có kỹ năng nào nên không cần phân loại
    let changes = SkillChangeSet::additions(&skills_data);
    let report = service
        .skills()
        .execute(exam.id, exam.class_id, changes)
        .await;

    service.cache().invalidate_class(exam.class_id).await;
    service.snapshots().record(
        ExamOperation::CreateExam {
            request: exam_data,
            skills: skills_data,
        },
        None,
    );

    ExamMutationOutcome::from_sync(exam, report)
}
