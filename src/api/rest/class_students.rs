use super::RestApiClient;
use crate::errors::Result;
use crate::models::ConditionSet;
use crate::models::class_students::entities::ClassStudent;

const CLASS_STUDENTS_PATH: &str = "/api/class_students";

impl RestApiClient {
    pub async fn list_class_students_impl(&self, class_id: i64) -> Result<Vec<ClassStudent>> {
        let conditions = ConditionSet::new()
            .eq("class_id", class_id)?
            .eq("is_deleted", false)?;
        self.get_list(CLASS_STUDENTS_PATH, &conditions).await
    }
}
