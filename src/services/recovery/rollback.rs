use tracing::warn;

use super::RecoveryService;
use super::snapshot::{ExamOperation, OperationSnapshot};
use crate::errors::{LangCenterError, Result};
use crate::models::exams::requests::UpdateExamRequest;
use crate::models::exams::responses::ExamMutationOutcome;
use crate::models::skills::requests::SkillUpdateData;

/// Khôi phục theo ảnh chụp gần nhất
pub async fn rollback_last_operation(service: &RecoveryService) -> Result<ExamMutationOutcome> {
    let snapshot = service
        .snapshots()
        .latest()
        .ok_or_else(|| LangCenterError::snapshot_not_found("Chưa có thao tác nào được ghi lại"))?;
    replay(service, snapshot).await
}

/// Khôi phục theo ID ảnh chụp
pub async fn rollback_to_snapshot(
    service: &RecoveryService,
    snapshot_id: &str,
) -> Result<ExamMutationOutcome> {
    let snapshot = service.snapshots().get(snapshot_id).ok_or_else(|| {
        LangCenterError::snapshot_not_found(format!(
            "Không tìm thấy ảnh chụp '{snapshot_id}', có thể đã bị dồn ra khỏi danh sách"
        ))
    })?;
    replay(service, snapshot).await
}

// Gửi lại trạng thái trước thao tác qua đúng đường cập nhật thường
//
// Khôi phục không có tính giao dịch: nếu lần gửi lại cũng thất bại thì
// những phần đã ghi xong vẫn nằm nguyên trên máy chủ, kết quả trả về
// phản ánh trung thực điều đó.
async fn replay(
    service: &RecoveryService,
    snapshot: OperationSnapshot,
) -> Result<ExamMutationOutcome> {
    match snapshot.operation {
        ExamOperation::UpdateExam { exam_id, .. } => {
            let prior = snapshot.rollback.ok_or_else(|| {
                LangCenterError::rollback_unsupported(
                    "Ảnh chụp không kèm trạng thái trước thao tác",
                )
            })?;

            warn!(
                "Rolling back exam {} to snapshot {} taken at {}",
                exam_id, snapshot.id, snapshot.created_at
            );
            let request = UpdateExamRequest::from(&prior.exam);
            let skills: Vec<SkillUpdateData> =
                prior.skills.iter().map(SkillUpdateData::from).collect();
            Ok(service
                .exams()
                .update_exam_with_skills(exam_id, request, skills)
                .await)
        }
        // Chưa có thao tác ngược cho tạo và xóa, báo thẳng thay vì
        // giả vờ khôi phục thành công
        ExamOperation::CreateExam { .. } | ExamOperation::DeleteExam { .. } => {
            Err(LangCenterError::rollback_unsupported(format!(
                "Thao tác '{}' chưa hỗ trợ khôi phục",
                snapshot.operation.label()
            )))
        }
    }
}
