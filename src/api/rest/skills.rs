use super::RestApiClient;
use crate::errors::Result;
use crate::models::ConditionSet;
use crate::models::skills::{
    entities::{ExamSkill, SkillType},
    requests::{CreateSkillRequest, UpdateSkillRequest},
};

const SKILLS_PATH: &str = "/api/exam_skills";

impl RestApiClient {
    pub async fn create_skill_impl(&self, skill: CreateSkillRequest) -> Result<ExamSkill> {
        self.post_one(SKILLS_PATH, &skill).await
    }

    /// Lấy mọi dòng của bài thi, không lọc is_deleted
    ///
    /// Dòng đã xóa mềm vẫn cần cho bước phân tích thay đổi,
    /// vì chúng có thể được kích hoạt lại thay vì tạo dòng mới.
    pub async fn list_exam_skills_impl(&self, exam_id: i64) -> Result<Vec<ExamSkill>> {
        let conditions = ConditionSet::new().eq("exam_id", exam_id)?;
        self.get_list(SKILLS_PATH, &conditions).await
    }

    pub async fn find_active_skill_impl(
        &self,
        exam_id: i64,
        skill_type: SkillType,
    ) -> Result<Option<ExamSkill>> {
        let conditions = ConditionSet::new()
            .eq("exam_id", exam_id)?
            .eq("skill_type", skill_type.to_string())?
            .eq("is_deleted", false)?;
        self.get_first(SKILLS_PATH, &conditions).await
    }

    pub async fn update_skill_impl(
        &self,
        skill_id: i64,
        update: UpdateSkillRequest,
    ) -> Result<Option<ExamSkill>> {
        self.put_one(SKILLS_PATH, skill_id, &update).await
    }
}
