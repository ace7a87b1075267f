use super::RestApiClient;
use crate::errors::Result;
use crate::models::ConditionSet;
use crate::models::exams::{
    entities::Exam,
    requests::{CreateExamRequest, UpdateExamRequest},
};

const EXAMS_PATH: &str = "/api/exams";

impl RestApiClient {
    pub async fn create_exam_impl(&self, exam: CreateExamRequest) -> Result<Exam> {
        self.post_one(EXAMS_PATH, &exam).await
    }

    pub async fn get_exam_impl(&self, exam_id: i64) -> Result<Option<Exam>> {
        let conditions = ConditionSet::new()
            .eq("id", exam_id)?
            .eq("is_deleted", false)?;
        self.get_first(EXAMS_PATH, &conditions).await
    }

    pub async fn list_class_exams_impl(&self, class_id: i64) -> Result<Vec<Exam>> {
        let conditions = ConditionSet::new()
            .eq("class_id", class_id)?
            .eq("is_deleted", false)?;
        self.get_list(EXAMS_PATH, &conditions).await
    }

    pub async fn update_exam_impl(
        &self,
        exam_id: i64,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>> {
        self.put_one(EXAMS_PATH, exam_id, &update).await
    }
}
