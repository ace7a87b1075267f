use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::errors::{LangCenterError, Result};
use crate::models::{ApiResponse, ConditionSet};
use crate::utils::retry::{RetryPolicy, retry_operation};
use crate::utils::token::AuthTokenProvider;

mod class_students;
mod exams;
mod results;
mod skills;

/// Client REST cho backend bảng tổng quát
///
/// Mọi tài nguyên đều theo cùng một khuôn: GET danh sách qua tham số
/// `condition`, POST tạo mới, PUT cập nhật theo ID. Các thao tác đọc
/// được thử lại khi gặp lỗi tạm thời; thao tác ghi chạy đúng một lần.
pub struct RestApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn AuthTokenProvider>,
    retry: RetryPolicy,
}

impl RestApiClient {
    pub fn new(config: &ApiConfig, tokens: Arc<dyn AuthTokenProvider>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
            retry: RetryPolicy::new(&config.retry),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Gắn bearer token nếu đang đăng nhập
    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Chuyển mã HTTP lỗi thành thông báo tiếng Việt cho người dùng
    fn classify_status(status: StatusCode) -> LangCenterError {
        let message = match status.as_u16() {
            400 => "Dữ liệu gửi lên không hợp lệ".to_string(),
            401 => "Phiên đăng nhập đã hết hạn, vui lòng đăng nhập lại".to_string(),
            403 => "Bạn không có quyền thực hiện thao tác này".to_string(),
            404 => "Không tìm thấy dữ liệu yêu cầu".to_string(),
            409 => "Dữ liệu đã tồn tại, không thể tạo trùng".to_string(),
            500 => "Lỗi hệ thống, vui lòng thử lại sau".to_string(),
            other => format!("Lỗi không xác định từ máy chủ (HTTP {other})"),
        };
        match status.as_u16() {
            404 => LangCenterError::not_found(message),
            409 => LangCenterError::conflict(message),
            500..=599 => LangCenterError::api_server(message),
            _ => LangCenterError::api_request(message),
        }
    }

    /// Đọc phản hồi: kiểm tra mã HTTP rồi mở phong bì ApiResponse
    async fn parse_response<T>(response: reqwest::Response) -> Result<T>
    where
        T: DeserializeOwned + ts_rs::TS,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify_status(status));
        }
        let envelope: ApiResponse<T> = response.json().await?;
        envelope.into_data()
    }

    /// GET danh sách theo điều kiện
    pub(crate) async fn get_list<T>(&self, path: &str, conditions: &ConditionSet) -> Result<Vec<T>>
    where
        T: DeserializeOwned + ts_rs::TS,
    {
        let condition = conditions.to_query_value()?;
        let url = self.url(path);
        retry_operation(&self.retry, path, || async {
            debug!("GET {url} condition={condition}");
            let response = self
                .authed(
                    self.http
                        .get(&url)
                        .query(&[("condition", condition.as_str())]),
                )
                .send()
                .await?;
            Self::parse_response(response).await
        })
        .await
    }

    /// GET bản ghi đầu tiên khớp điều kiện
    pub(crate) async fn get_first<T>(
        &self,
        path: &str,
        conditions: &ConditionSet,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned + ts_rs::TS,
    {
        let mut rows = self.get_list(path, conditions).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    /// POST tạo bản ghi mới
    pub(crate) async fn post_one<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + ts_rs::TS,
    {
        let url = self.url(path);
        debug!("POST {url}");
        let response = self.authed(self.http.post(&url).json(body)).send().await?;
        Self::parse_response(response).await
    }

    /// PUT cập nhật theo ID, trả None nếu bản ghi không tồn tại
    pub(crate) async fn put_one<B, T>(&self, path: &str, id: i64, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + ts_rs::TS,
    {
        let url = format!("{}/{id}", self.url(path));
        debug!("PUT {url}");
        let response = self.authed(self.http.put(&url).json(body)).send().await?;
        match Self::parse_response(response).await {
            Ok(value) => Ok(Some(value)),
            Err(LangCenterError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

// Triển khai trait ExamApi, ủy quyền cho các phương thức *_impl theo tài nguyên
use crate::models::{
    class_students::entities::ClassStudent,
    exams::{
        entities::Exam,
        requests::{CreateExamRequest, UpdateExamRequest},
    },
    results::{entities::ExamResult, requests::CreateResultRequest},
    skills::{
        entities::{ExamSkill, SkillType},
        requests::{CreateSkillRequest, UpdateSkillRequest},
    },
};

#[async_trait::async_trait]
impl super::ExamApi for RestApiClient {
    async fn create_exam(&self, exam: CreateExamRequest) -> Result<Exam> {
        self.create_exam_impl(exam).await
    }

    async fn get_exam(&self, exam_id: i64) -> Result<Option<Exam>> {
        self.get_exam_impl(exam_id).await
    }

    async fn list_class_exams(&self, class_id: i64) -> Result<Vec<Exam>> {
        self.list_class_exams_impl(class_id).await
    }

    async fn update_exam(&self, exam_id: i64, update: UpdateExamRequest) -> Result<Option<Exam>> {
        self.update_exam_impl(exam_id, update).await
    }

    async fn create_skill(&self, skill: CreateSkillRequest) -> Result<ExamSkill> {
        self.create_skill_impl(skill).await
    }

    async fn list_exam_skills(&self, exam_id: i64) -> Result<Vec<ExamSkill>> {
        self.list_exam_skills_impl(exam_id).await
    }

    async fn find_active_skill(
        &self,
        exam_id: i64,
        skill_type: SkillType,
    ) -> Result<Option<ExamSkill>> {
        self.find_active_skill_impl(exam_id, skill_type).await
    }

    async fn update_skill(
        &self,
        skill_id: i64,
        update: UpdateSkillRequest,
    ) -> Result<Option<ExamSkill>> {
        self.update_skill_impl(skill_id, update).await
    }

    async fn create_result(&self, result: CreateResultRequest) -> Result<ExamResult> {
        self.create_result_impl(result).await
    }

    async fn list_skill_results(&self, exam_skill_id: i64) -> Result<Vec<ExamResult>> {
        self.list_skill_results_impl(exam_skill_id).await
    }

    async fn list_class_students(&self, class_id: i64) -> Result<Vec<ClassStudent>> {
        self.list_class_students_impl(class_id).await
    }
}
