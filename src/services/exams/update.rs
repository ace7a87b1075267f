use tracing::{debug, error, info};

use super::ExamService;
use crate::models::exams::requests::UpdateExamRequest;
use crate::models::exams::responses::{ExamMutationOutcome, ExamWithSkills};
use crate::models::skills::entities::{ExamSkill, SkillRowState};
use crate::models::skills::requests::SkillUpdateData;
use crate::services::recovery::ExamOperation;
use crate::services::skills::SkillChangeSet;
use crate::utils::validate::validate_exam_payload;

/// Cập nhật bài thi và đồng bộ kỹ năng theo hai pha
///
/// Mọi chốt chặn chạy trước khi ghi bất cứ gì: bài thi phải còn tồn tại
/// và chưa kết thúc, dữ liệu hợp lệ, và không bỏ kỹ năng đã có điểm.
/// Qua được chốt thì trạng thái hiện tại được chụp lại, sau đó ghi dòng
/// bài thi rồi đồng bộ kỹ năng. Cache của lớp luôn được làm mới một khi
/// đã bắt đầu ghi, kể cả lúc chỉ một phần thao tác thành công.
pub async fn update_exam_with_skills(
    service: &ExamService,
    exam_id: i64,
    exam_data: UpdateExamRequest,
    skills_data: Vec<SkillUpdateData>,
) -> ExamMutationOutcome {
    let current = match service.api().get_exam(exam_id).await {
        Ok(Some(exam)) => exam,
        Ok(None) => return ExamMutationOutcome::failed("Không tìm thấy bài thi cần cập nhật"),
        Err(e) => {
            return ExamMutationOutcome::failed(format!(
                "Không tải được bài thi: {}",
                e.message()
            ));
        }
    };
    if current.status.is_terminal() {
        return ExamMutationOutcome::failed(format!(
            "Bài thi đã ở trạng thái '{}', không thể chỉnh sửa",
            current.status.label()
        ));
    }

    let effective_name = exam_data.name.as_deref().unwrap_or(&current.name);
    let check = validate_exam_payload(effective_name, &skills_data);
    if !check.is_valid {
        return ExamMutationOutcome::failed(check.error_message());
    }

    let rows = match service.api().list_exam_skills(exam_id).await {
        Ok(rows) => rows,
        Err(e) => {
            return ExamMutationOutcome::failed(format!(
                "Không tải được danh sách kỹ năng hiện có: {}",
                e.message()
            ));
        }
    };
    let current_rows: Vec<SkillRowState> = rows.into_iter().map(Into::into).collect();
    let changes = service.skills().analyze(&current_rows, &skills_data);

    if let Some(message) = check_removed_skills(service, &changes.to_delete).await {
        return ExamMutationOutcome::failed(message);
    }

    // Chụp trạng thái trước khi ghi để còn đường khôi phục
    let prior_skills: Vec<ExamSkill> = current_rows
        .iter()
        .filter_map(|row| match row {
            SkillRowState::Active(skill) => Some(skill.clone()),
            SkillRowState::Tombstoned { .. } => None,
        })
        .collect();
    let mut exam_data = exam_data;
    exam_data.total_max_score = Some(skills_data.iter().map(|s| s.max_score).sum());
    let snapshot_id = service.snapshots().record(
        ExamOperation::UpdateExam {
            exam_id,
            request: exam_data.clone(),
            skills: skills_data.clone(),
        },
        Some(ExamWithSkills {
            exam: current.clone(),
            skills: prior_skills,
        }),
    );
    debug!("Snapshot {snapshot_id} captured before updating exam {exam_id}");

    // Từ đây đã đụng đến máy chủ: cache của lớp luôn được làm mới
    // bất kể các pha ghi kết thúc thế nào
    let class_id = current.class_id;
    let outcome = run_update_phases(service, exam_id, class_id, exam_data, changes).await;
    service.cache().invalidate_class(class_id).await;
    outcome
}

async fn run_update_phases(
    service: &ExamService,
    exam_id: i64,
    class_id: i64,
    exam_data: UpdateExamRequest,
    changes: SkillChangeSet,
) -> ExamMutationOutcome {
    // Pha một: dòng bài thi
    let exam = match service.api().update_exam(exam_id, exam_data).await {
        Ok(Some(exam)) => exam,
        Ok(None) => {
            return ExamMutationOutcome::failed("Bài thi đã bị xóa trong lúc cập nhật");
        }
        Err(e) => {
            error!("Exam {exam_id} update failed: {e}");
            return ExamMutationOutcome::failed(format!(
                "Không cập nhật được bài thi: {}",
                e.message()
            ));
        }
    };

    // Pha hai: đồng bộ kỹ năng
    let report = service.skills().execute(exam_id, class_id, changes).await;
    info!("Exam {exam_id} updated: {}", report.summary());
    ExamMutationOutcome::from_sync(exam, report)
}

// Chốt chặn nghiệp vụ: kỹ năng đã có điểm của học viên thì không được
// bỏ chọn, vì xóa mềm dòng kỹ năng sẽ giấu luôn các phiếu điểm đó.
async fn check_removed_skills(
    service: &ExamService,
    to_delete: &[ExamSkill],
) -> Option<String> {
    for skill in to_delete {
        let label = skill.skill_type.label();
        let results = match service.api().list_skill_results(skill.id).await {
            Ok(rows) => rows,
            Err(e) => {
                return Some(format!(
                    "Không kiểm tra được điểm của kỹ năng {}: {}",
                    label,
                    e.message()
                ));
            }
        };
        if results.iter().any(|r| r.has_recorded_score()) {
            return Some(format!(
                "Kỹ năng {label} đã có điểm của học viên, không thể bỏ chọn"
            ));
        }
    }
    None
}
