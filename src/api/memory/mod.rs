use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::errors::{LangCenterError, Result};
use crate::models::{
    class_students::entities::ClassStudent,
    exams::{
        entities::{Exam, ExamStatus},
        requests::{CreateExamRequest, UpdateExamRequest},
    },
    results::{entities::ExamResult, requests::CreateResultRequest},
    skills::{
        entities::{ExamSkill, SkillType},
        requests::{CreateSkillRequest, UpdateSkillRequest},
    },
};

/// Backend trong bộ nhớ
///
/// Dành cho kiểm thử và chạy demo không cần máy chủ. Mô phỏng đúng
/// hành vi của backend thật: chỉ xóa mềm, và mỗi bài thi chỉ có một
/// kỹ năng đang hoạt động cho mỗi loại.
#[derive(Default)]
pub struct MemoryApi {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    exams: HashMap<i64, Exam>,
    skills: HashMap<i64, ExamSkill>,
    results: HashMap<i64, ExamResult>,
    students: HashMap<i64, ClassStudent>,
    next_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ghi danh một học viên vào lớp (dữ liệu mồi cho kiểm thử và demo)
    pub async fn add_student(&self, class_id: i64, full_name: &str) -> ClassStudent {
        let mut state = self.state.write().await;
        let id = state.next_id();
        let now = Utc::now();
        let student = ClassStudent {
            id,
            class_id,
            student_id: id,
            full_name: full_name.to_string(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        state.students.insert(id, student.clone());
        student
    }

    /// Tổng số phiếu điểm hiện có, kể cả phiếu đã xóa mềm
    pub async fn count_results(&self) -> usize {
        self.state.read().await.results.len()
    }

    /// Ghi điểm vào một phiếu (dữ liệu mồi cho kiểm thử và demo)
    pub async fn record_score(&self, result_id: i64, score: f64) -> bool {
        let mut state = self.state.write().await;
        match state.results.get_mut(&result_id) {
            Some(row) => {
                row.score = Some(score);
                row.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

#[async_trait::async_trait]
impl super::ExamApi for MemoryApi {
    async fn create_exam(&self, exam: CreateExamRequest) -> Result<Exam> {
        let mut state = self.state.write().await;
        let id = state.next_id();
        let now = Utc::now();
        let row = Exam {
            id,
            class_id: exam.class_id,
            name: exam.name,
            exam_type: exam.exam_type,
            exam_date: exam.exam_date,
            description: exam.description,
            total_max_score: exam.total_max_score,
            status: ExamStatus::Draft,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        state.exams.insert(id, row.clone());
        Ok(row)
    }

    async fn get_exam(&self, exam_id: i64) -> Result<Option<Exam>> {
        let state = self.state.read().await;
        Ok(state
            .exams
            .get(&exam_id)
            .filter(|exam| !exam.is_deleted)
            .cloned())
    }

    async fn list_class_exams(&self, class_id: i64) -> Result<Vec<Exam>> {
        let state = self.state.read().await;
        let mut exams: Vec<Exam> = state
            .exams
            .values()
            .filter(|exam| exam.class_id == class_id && !exam.is_deleted)
            .cloned()
            .collect();
        exams.sort_by_key(|exam| exam.id);
        Ok(exams)
    }

    async fn update_exam(&self, exam_id: i64, update: UpdateExamRequest) -> Result<Option<Exam>> {
        let mut state = self.state.write().await;
        let Some(row) = state.exams.get_mut(&exam_id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            row.name = name;
        }
        if let Some(exam_type) = update.exam_type {
            row.exam_type = exam_type;
        }
        // Hai lớp Option: Some(None) nghĩa là xóa giá trị, không phải giữ nguyên
        if let Some(exam_date) = update.exam_date {
            row.exam_date = exam_date;
        }
        if let Some(description) = update.description {
            row.description = description;
        }
        if let Some(status) = update.status {
            row.status = status;
        }
        if let Some(total_max_score) = update.total_max_score {
            row.total_max_score = total_max_score;
        }
        if let Some(is_deleted) = update.is_deleted {
            row.is_deleted = is_deleted;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn create_skill(&self, skill: CreateSkillRequest) -> Result<ExamSkill> {
        let mut state = self.state.write().await;
        // Ràng buộc duy nhất (exam_id, skill_type) trên các dòng đang hoạt động
        let duplicate = state.skills.values().any(|row| {
            row.exam_id == skill.exam_id && row.skill_type == skill.skill_type && !row.is_deleted
        });
        if duplicate {
            return Err(LangCenterError::conflict(format!(
                "Kỹ năng {} đã tồn tại trong bài thi",
                skill.skill_type.label()
            )));
        }
        let id = state.next_id();
        let now = Utc::now();
        let row = ExamSkill {
            id,
            exam_id: skill.exam_id,
            skill_type: skill.skill_type,
            max_score: skill.max_score,
            weight: skill.weight,
            order_index: skill.order_index,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        state.skills.insert(id, row.clone());
        Ok(row)
    }

    async fn list_exam_skills(&self, exam_id: i64) -> Result<Vec<ExamSkill>> {
        let state = self.state.read().await;
        let mut skills: Vec<ExamSkill> = state
            .skills
            .values()
            .filter(|row| row.exam_id == exam_id)
            .cloned()
            .collect();
        skills.sort_by_key(|row| row.id);
        Ok(skills)
    }

    async fn find_active_skill(
        &self,
        exam_id: i64,
        skill_type: SkillType,
    ) -> Result<Option<ExamSkill>> {
        let state = self.state.read().await;
        Ok(state
            .skills
            .values()
            .find(|row| row.exam_id == exam_id && row.skill_type == skill_type && !row.is_deleted)
            .cloned())
    }

    async fn update_skill(
        &self,
        skill_id: i64,
        update: UpdateSkillRequest,
    ) -> Result<Option<ExamSkill>> {
        let mut state = self.state.write().await;
        let Some(current) = state.skills.get(&skill_id).cloned() else {
            return Ok(None);
        };
        // Kích hoạt lại cũng phải tôn trọng ràng buộc duy nhất
        if update.is_deleted == Some(false) && current.is_deleted {
            let duplicate = state.skills.values().any(|row| {
                row.id != skill_id
                    && row.exam_id == current.exam_id
                    && row.skill_type == current.skill_type
                    && !row.is_deleted
            });
            if duplicate {
                return Err(LangCenterError::conflict(format!(
                    "Kỹ năng {} đã tồn tại trong bài thi",
                    current.skill_type.label()
                )));
            }
        }
        let Some(row) = state.skills.get_mut(&skill_id) else {
            return Ok(None);
        };
        if let Some(max_score) = update.max_score {
            row.max_score = max_score;
        }
        if let Some(weight) = update.weight {
            row.weight = weight;
        }
        if let Some(order_index) = update.order_index {
            row.order_index = order_index;
        }
        if let Some(is_deleted) = update.is_deleted {
            row.is_deleted = is_deleted;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn create_result(&self, result: CreateResultRequest) -> Result<ExamResult> {
        let mut state = self.state.write().await;
        let duplicate = state.results.values().any(|row| {
            row.exam_skill_id == result.exam_skill_id
                && row.student_id == result.student_id
                && !row.is_deleted
        });
        if duplicate {
            return Err(LangCenterError::conflict(
                "Phiếu điểm của học viên này đã tồn tại",
            ));
        }
        let id = state.next_id();
        let now = Utc::now();
        let row = ExamResult {
            id,
            exam_skill_id: result.exam_skill_id,
            student_id: result.student_id,
            score: None,
            level: None,
            teacher_comment: None,
            is_passed: None,
            grade_point: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        state.results.insert(id, row.clone());
        Ok(row)
    }

    async fn list_skill_results(&self, exam_skill_id: i64) -> Result<Vec<ExamResult>> {
        let state = self.state.read().await;
        let mut results: Vec<ExamResult> = state
            .results
            .values()
            .filter(|row| row.exam_skill_id == exam_skill_id && !row.is_deleted)
            .cloned()
            .collect();
        results.sort_by_key(|row| row.id);
        Ok(results)
    }

    async fn list_class_students(&self, class_id: i64) -> Result<Vec<ClassStudent>> {
        let state = self.state.read().await;
        let mut students: Vec<ClassStudent> = state
            .students
            .values()
            .filter(|row| row.class_id == class_id && !row.is_deleted)
            .cloned()
            .collect();
        students.sort_by_key(|row| row.id);
        Ok(students)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ExamApi;
    use crate::models::exams::entities::ExamType;

    fn create_request(class_id: i64) -> CreateExamRequest {
        CreateExamRequest {
            class_id,
            name: "Thi thử".to_string(),
            exam_type: ExamType::Periodic,
            exam_date: None,
            description: None,
            total_max_score: 0.0,
        }
    }

    fn skill_request(exam_id: i64, skill_type: SkillType) -> CreateSkillRequest {
        CreateSkillRequest {
            exam_id,
            skill_type,
            max_score: 10.0,
            weight: 1.0,
            order_index: 0,
        }
    }

    #[tokio::test]
    async fn test_active_uniqueness_is_enforced() {
        let api = MemoryApi::new();
        let exam = api.create_exam(create_request(1)).await.unwrap();
        api.create_skill(skill_request(exam.id, SkillType::Listening))
            .await
            .unwrap();

        let err = api
            .create_skill(skill_request(exam.id, SkillType::Listening))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[tokio::test]
    async fn test_soft_deleted_row_frees_the_type_slot() {
        let api = MemoryApi::new();
        let exam = api.create_exam(create_request(1)).await.unwrap();
        let skill = api
            .create_skill(skill_request(exam.id, SkillType::Reading))
            .await
            .unwrap();

        api.update_skill(skill.id, UpdateSkillRequest::soft_delete())
            .await
            .unwrap();
        // Sau khi xóa mềm, loại này lại được phép tạo mới
        api.create_skill(skill_request(exam.id, SkillType::Reading))
            .await
            .unwrap();

        // Nhưng kích hoạt lại dòng cũ bây giờ phải bị chặn
        let err = api
            .update_skill(
                skill.id,
                UpdateSkillRequest {
                    is_deleted: Some(false),
                    ..UpdateSkillRequest::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[tokio::test]
    async fn test_list_exam_skills_includes_tombstones() {
        let api = MemoryApi::new();
        let exam = api.create_exam(create_request(1)).await.unwrap();
        let skill = api
            .create_skill(skill_request(exam.id, SkillType::Writing))
            .await
            .unwrap();
        api.update_skill(skill.id, UpdateSkillRequest::soft_delete())
            .await
            .unwrap();

        let rows = api.list_exam_skills(exam.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_deleted);

        // Nhưng tìm kỹ năng hoạt động thì không thấy
        let active = api
            .find_active_skill(exam.id, SkillType::Writing)
            .await
            .unwrap();
        assert!(active.is_none());
    }
}
