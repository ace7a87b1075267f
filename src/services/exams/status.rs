use tracing::{info, warn};

use super::ExamService;
use crate::errors::{LangCenterError, Result};
use crate::models::exams::entities::{Exam, ExamStatus};
use crate::models::exams::requests::UpdateExamRequest;

/// Kiểm tra một bước chuyển trạng thái, trả về danh sách lý do từ chối
///
/// `active_skills` là số kỹ năng đang hoạt động, chỉ dùng cho chốt
/// chặn khi bắt đầu bài thi.
pub fn validate_transition(exam: &Exam, target: ExamStatus, active_skills: usize) -> Vec<String> {
    let mut errors = Vec::new();

    if !exam.status.can_transition(target) {
        errors.push(format!(
            "Không thể chuyển bài thi từ '{}' sang '{}'",
            exam.status.label(),
            target.label()
        ));
        return errors;
    }

    // Chốt chặn trước khi bắt đầu: bài thi phải đủ thông tin
    if exam.status == ExamStatus::Draft && target == ExamStatus::InProgress {
        if exam.name.trim().is_empty() {
            errors.push("Tên bài thi không được để trống".to_string());
        }
        if exam.exam_date.is_none() {
            errors.push("Chưa chọn ngày thi".to_string());
        }
        if active_skills == 0 {
            errors.push("Bài thi phải có ít nhất một kỹ năng".to_string());
        }
        if exam.total_max_score <= 0.0 {
            errors.push("Tổng điểm tối đa phải lớn hơn 0".to_string());
        }
    }

    errors
}

/// Chuyển trạng thái bài thi theo luồng cho phép
pub async fn change_status(
    service: &ExamService,
    exam_id: i64,
    target: ExamStatus,
) -> Result<Exam> {
    let exam = service
        .api()
        .get_exam(exam_id)
        .await?
        .ok_or_else(|| LangCenterError::not_found("Không tìm thấy bài thi"))?;

    // Chỉ bước bắt đầu mới cần đếm kỹ năng
    let active_skills = if exam.status == ExamStatus::Draft && target == ExamStatus::InProgress {
        service
            .api()
            .list_exam_skills(exam_id)
            .await?
            .iter()
            .filter(|s| !s.is_deleted)
            .count()
    } else {
        0
    };

    let errors = validate_transition(&exam, target, active_skills);
    if !errors.is_empty() {
        warn!(
            "Status change {} -> {} rejected for exam {}: {}",
            exam.status,
            target,
            exam_id,
            errors.join("; ")
        );
        return Err(LangCenterError::status_transition(errors.join("; ")));
    }

    let updated = service
        .api()
        .update_exam(exam_id, UpdateExamRequest::status_only(target))
        .await?
        .ok_or_else(|| LangCenterError::not_found("Bài thi đã bị xóa trong lúc đổi trạng thái"))?;

    service.cache().invalidate_class(updated.class_id).await;
    info!("Exam {} moved {} -> {}", exam_id, exam.status, target);
    Ok(updated)
}

/// Mở khóa bài thi đã hoàn thành
///
/// Thao tác quản trị nằm ngoài luồng thường: ép bài thi từ hoàn thành
/// về chờ duyệt điểm để sửa lại kết quả.
pub async fn unlock_exam(service: &ExamService, exam_id: i64) -> Result<Exam> {
    let exam = service
        .api()
        .get_exam(exam_id)
        .await?
        .ok_or_else(|| LangCenterError::not_found("Không tìm thấy bài thi"))?;

    if exam.status != ExamStatus::Completed {
        return Err(LangCenterError::business_rule(format!(
            "Chỉ bài thi đã hoàn thành mới mở khóa được, bài thi này đang ở trạng thái '{}'",
            exam.status.label()
        )));
    }

    let updated = service
        .api()
        .update_exam(exam_id, UpdateExamRequest::status_only(ExamStatus::Review))
        .await?
        .ok_or_else(|| LangCenterError::not_found("Bài thi đã bị xóa trong lúc mở khóa"))?;

    service.cache().invalidate_class(updated.class_id).await;
    warn!("Exam {} unlocked: completed -> review", exam_id);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exams::entities::ExamType;

    fn exam(status: ExamStatus) -> Exam {
        Exam {
            id: 1,
            class_id: 7,
            name: "Thi cuối khóa A2".to_string(),
            exam_type: ExamType::Final,
            exam_date: Some(chrono::NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()),
            description: None,
            total_max_score: 100.0,
            status,
            is_deleted: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_backward_transition_is_rejected() {
        let errors = validate_transition(&exam(ExamStatus::Completed), ExamStatus::InProgress, 3);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Đã hoàn thành"));
        assert!(errors[0].contains("Đang diễn ra"));
    }

    #[test]
    fn test_start_requires_complete_exam_data() {
        let mut draft = exam(ExamStatus::Draft);
        draft.name = "   ".to_string();
        draft.exam_date = None;
        draft.total_max_score = 0.0;

        let errors = validate_transition(&draft, ExamStatus::InProgress, 0);
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("Tên bài thi")));
        assert!(errors.iter().any(|e| e.contains("ngày thi")));
        assert!(errors.iter().any(|e| e.contains("ít nhất một kỹ năng")));
        assert!(errors.iter().any(|e| e.contains("Tổng điểm")));
    }

    #[test]
    fn test_valid_start_passes_guards() {
        let errors = validate_transition(&exam(ExamStatus::Draft), ExamStatus::InProgress, 2);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_guards_only_apply_to_start() {
        // Bài thi đang diễn ra đổi sang chờ duyệt không cần đếm kỹ năng
        let errors = validate_transition(&exam(ExamStatus::InProgress), ExamStatus::Review, 0);
        assert!(errors.is_empty());
    }
}
