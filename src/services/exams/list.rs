use tracing::debug;

use super::ExamService;
use crate::errors::Result;
use crate::models::class_students::entities::ClassStudent;
use crate::models::exams::entities::Exam;
use crate::models::exams::responses::ExamWithSkills;

/// Danh sách bài thi của lớp, đọc qua cache
pub async fn list_class_exams(service: &ExamService, class_id: i64) -> Result<Vec<Exam>> {
    if let Some(exams) = service.cache().get_exams(class_id).await {
        debug!("Exam list for class {class_id} served from cache");
        return Ok(exams);
    }

    let exams = service.api().list_class_exams(class_id).await?;
    service.cache().put_exams(class_id, &exams).await;
    Ok(exams)
}

/// Danh sách học viên của lớp, đọc qua cache
pub async fn list_class_students(
    service: &ExamService,
    class_id: i64,
) -> Result<Vec<ClassStudent>> {
    if let Some(students) = service.cache().get_students(class_id).await {
        debug!("Student list for class {class_id} served from cache");
        return Ok(students);
    }

    let students = service.api().list_class_students(class_id).await?;
    service.cache().put_students(class_id, &students).await;
    Ok(students)
}

/// Bài thi kèm các kỹ năng đang hoạt động, không qua cache
pub async fn get_exam_with_skills(
    service: &ExamService,
    exam_id: i64,
) -> Result<Option<ExamWithSkills>> {
    let Some(exam) = service.api().get_exam(exam_id).await? else {
        return Ok(None);
    };

    let mut skills: Vec<_> = service
        .api()
        .list_exam_skills(exam_id)
        .await?
        .into_iter()
        .filter(|s| !s.is_deleted)
        .collect();
    skills.sort_by_key(|s| s.order_index);

    Ok(Some(ExamWithSkills { exam, skills }))
}
