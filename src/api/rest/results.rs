use super::RestApiClient;
use crate::errors::Result;
use crate::models::ConditionSet;
use crate::models::results::{entities::ExamResult, requests::CreateResultRequest};

const RESULTS_PATH: &str = "/api/exam_results";

impl RestApiClient {
    pub async fn create_result_impl(&self, result: CreateResultRequest) -> Result<ExamResult> {
        self.post_one(RESULTS_PATH, &result).await
    }

    pub async fn list_skill_results_impl(&self, exam_skill_id: i64) -> Result<Vec<ExamResult>> {
        let conditions = ConditionSet::new()
            .eq("exam_skill_id", exam_skill_id)?
            .eq("is_deleted", false)?;
        self.get_list(RESULTS_PATH, &conditions).await
    }
}
