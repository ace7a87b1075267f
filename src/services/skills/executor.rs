use futures_util::future::join_all;
use tracing::{debug, info, warn};

use super::SkillService;
use super::analyzer::SkillChangeSet;
use crate::errors::LangCenterError;
use crate::models::class_students::entities::ClassStudent;
use crate::models::results::requests::CreateResultRequest;
use crate::models::skills::requests::{CreateSkillRequest, SkillUpdateData, UpdateSkillRequest};
use crate::models::skills::responses::SkillSyncReport;

/// Thi hành tập thay đổi kỹ năng theo thứ tự xóa → kích hoạt lại → cập nhật → thêm
///
/// Máy chủ chỉ cho phép một dòng hoạt động cho mỗi (exam_id, skill_type),
/// nên các bước phải chạy tuần tự: xóa trước để nhường chỗ, kích hoạt lại
/// trước khi thêm mới. Lỗi của từng dòng được gom vào báo cáo, các bước
/// còn lại vẫn tiếp tục chạy.
pub async fn execute_skill_changes(
    service: &SkillService,
    exam_id: i64,
    class_id: i64,
    changes: SkillChangeSet,
) -> SkillSyncReport {
    info!(
        "Syncing skills for exam {}: {}",
        exam_id,
        changes.summary()
    );
    let mut report = SkillSyncReport::default();
    let api = service.api();

    // Bước 1: xóa mềm các kỹ năng không còn được yêu cầu
    for skill in &changes.to_delete {
        let label = skill.skill_type.label();
        match api.update_skill(skill.id, UpdateSkillRequest::soft_delete()).await {
            Ok(Some(_)) => report.deleted.push(skill.id),
            Ok(None) => report
                .errors
                .push(format!("Không tìm thấy kỹ năng {label} để xóa")),
            Err(e) => report
                .errors
                .push(format!("Không xóa được kỹ năng {}: {}", label, e.message())),
        }
    }

    // Bước 2: kích hoạt lại các dòng đã xóa mềm, giữ nguyên ID cũ
    for write in &changes.to_reactivate {
        let label = write.data.skill_type.label();
        match api
            .update_skill(write.row_id, UpdateSkillRequest::reactivate(&write.data))
            .await
        {
            Ok(Some(_)) => report.reactivated.push(write.row_id),
            Ok(None) => report
                .errors
                .push(format!("Không tìm thấy kỹ năng {label} để kích hoạt lại")),
            Err(e) => report.errors.push(format!(
                "Không kích hoạt lại được kỹ năng {}: {}",
                label,
                e.message()
            )),
        }
    }

    // Bước 3: cập nhật số liệu các dòng đang hoạt động
    for write in &changes.to_update {
        let label = write.data.skill_type.label();
        match api
            .update_skill(write.row_id, UpdateSkillRequest::apply(&write.data))
            .await
        {
            Ok(Some(_)) => report.updated.push(write.row_id),
            Ok(None) => report
                .errors
                .push(format!("Không tìm thấy kỹ năng {label} để cập nhật")),
            Err(e) => report.errors.push(format!(
                "Không cập nhật được kỹ năng {}: {}",
                label,
                e.message()
            )),
        }
    }

    // Bước 4: thêm kỹ năng mới, kèm tạo sẵn phiếu điểm cho học viên
    let students = if changes.to_add.is_empty() {
        Vec::new()
    } else {
        match api.list_class_students(class_id).await {
            Ok(rows) => rows,
            Err(e) => {
                report.errors.push(format!(
                    "Không tải được danh sách học viên của lớp: {}",
                    e.message()
                ));
                Vec::new()
            }
        }
    };

    for data in &changes.to_add {
        add_one_skill(service, exam_id, data, &students, &mut report).await;
    }

    // Bước 5: các dòng giữ nguyên không cần gọi gì
    report.kept = changes.to_keep.iter().map(|s| s.id).collect();

    if report.is_ok() {
        info!("Skill sync for exam {} finished: {}", exam_id, report.summary());
    } else {
        warn!(
            "Skill sync for exam {} finished with errors: {} [{}]",
            exam_id,
            report.summary(),
            report.errors.join("; ")
        );
    }
    report
}

// Thêm một kỹ năng, có kiểm tra lại ngay trước khi ghi
//
// Kết quả phân loại có thể đã cũ so với máy chủ, nên trước khi thêm phải
// hỏi lại: nếu loại này đã có dòng hoạt động thì cập nhật dòng đó thay vì
// tạo mới. Tạo mới mà bị báo trùng cũng xử lý theo cùng cách.
async fn add_one_skill(
    service: &SkillService,
    exam_id: i64,
    data: &SkillUpdateData,
    students: &[ClassStudent],
    report: &mut SkillSyncReport,
) {
    let api = service.api();
    let label = data.skill_type.label();

    let existing = match api.find_active_skill(exam_id, data.skill_type).await {
        Ok(existing) => existing,
        Err(e) => {
            report.errors.push(format!(
                "Không kiểm tra được kỹ năng {} trước khi thêm: {}",
                label,
                e.message()
            ));
            return;
        }
    };

    if let Some(row) = existing {
        debug!(
            "Skill {} already active on exam {}, updating row {} instead of inserting",
            data.skill_type, exam_id, row.id
        );
        match api.update_skill(row.id, UpdateSkillRequest::apply(data)).await {
            Ok(Some(_)) => report.updated.push(row.id),
            Ok(None) => report
                .errors
                .push(format!("Không tìm thấy kỹ năng {label} để cập nhật")),
            Err(e) => report.errors.push(format!(
                "Không cập nhật được kỹ năng {}: {}",
                label,
                e.message()
            )),
        }
        return;
    }

    match api
        .create_skill(CreateSkillRequest::from_update_data(exam_id, data))
        .await
    {
        Ok(skill) => {
            report.added.push(skill.id);
            seed_results(service, skill.id, label, students, report).await;
        }
        Err(LangCenterError::Conflict(_)) => {
            // Dòng vừa được tạo ở nơi khác, coi như đã tồn tại và cập nhật
            match api.find_active_skill(exam_id, data.skill_type).await {
                Ok(Some(row)) => {
                    match api.update_skill(row.id, UpdateSkillRequest::apply(data)).await {
                        Ok(Some(_)) => report.updated.push(row.id),
                        Ok(None) => report
                            .errors
                            .push(format!("Không tìm thấy kỹ năng {label} để cập nhật")),
                        Err(e) => report.errors.push(format!(
                            "Không cập nhật được kỹ năng {}: {}",
                            label,
                            e.message()
                        )),
                    }
                }
                Ok(None) => report.errors.push(format!(
                    "Kỹ năng {label} báo trùng nhưng không tìm thấy dòng hiện có"
                )),
                Err(e) => report.errors.push(format!(
                    "Không tra cứu được kỹ năng {} sau khi báo trùng: {}",
                    label,
                    e.message()
                )),
            }
        }
        Err(e) => report
            .errors
            .push(format!("Không thêm được kỹ năng {}: {}", label, e.message())),
    }
}

// Tạo sẵn một phiếu điểm rỗng cho mỗi học viên của lớp
//
// Chia theo lô để không dồn quá nhiều yêu cầu cùng lúc: các lô chạy
// tuần tự, trong một lô các yêu cầu chạy song song. Phiếu báo trùng
// nghĩa là đã có từ trước, bỏ qua không tính là lỗi.
async fn seed_results(
    service: &SkillService,
    exam_skill_id: i64,
    label: &str,
    students: &[ClassStudent],
    report: &mut SkillSyncReport,
) {
    let api = service.api();
    for batch in students.chunks(service.result_batch_size()) {
        let creates = batch.iter().map(|student| {
            api.create_result(CreateResultRequest {
                exam_skill_id,
                student_id: student.student_id,
            })
        });
        for outcome in join_all(creates).await {
            match outcome {
                Ok(_) => report.results_seeded += 1,
                Err(LangCenterError::Conflict(_)) => {
                    debug!("Result row already exists for skill {exam_skill_id}, skipping");
                }
                Err(e) => report.errors.push(format!(
                    "Không tạo được phiếu điểm cho kỹ năng {}: {}",
                    label,
                    e.message()
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryApi;
    use crate::api::{self, ExamApi};
    use crate::config::SyncConfig;
    use crate::models::exams::requests::CreateExamRequest;
    use crate::models::exams::entities::ExamType;
    use crate::models::skills::entities::{SkillRowState, SkillType};
    use crate::services::skills::analyzer::analyze_skill_changes;
    use std::sync::Arc;

    fn desired(skill_type: SkillType, max_score: f64) -> SkillUpdateData {
        SkillUpdateData {
            id: None,
            skill_type,
            max_score,
            weight: 1.0,
            order_index: 0,
        }
    }

    async fn seeded_exam(api: &Arc<MemoryApi>) -> i64 {
        let exam = api
            .create_exam(CreateExamRequest {
                class_id: 7,
                name: "Thi giữa khóa B1".to_string(),
                exam_type: ExamType::Midterm,
                exam_date: None,
                description: None,
                total_max_score: 0.0,
            })
            .await
            .unwrap();
        exam.id
    }

    fn service(api: Arc<MemoryApi>) -> SkillService {
        SkillService::new(api, &SyncConfig::default())
    }

    #[tokio::test]
    async fn test_add_creates_rows_and_seeds_results_per_student() {
        let api = Arc::new(MemoryApi::new());
        let exam_id = seeded_exam(&api).await;
        for i in 0..7 {
            api.add_student(7, &format!("Học viên {i}")).await;
        }
        let service = service(api.clone());

        let changes = SkillChangeSet::additions(&[
            desired(SkillType::Listening, 25.0),
            desired(SkillType::Reading, 25.0),
        ]);
        let report = execute_skill_changes(&service, exam_id, 7, changes).await;

        assert!(report.is_ok(), "errors: {:?}", report.errors);
        assert_eq!(report.added.len(), 2);
        // 7 học viên x 2 kỹ năng
        assert_eq!(report.results_seeded, 14);
        assert_eq!(api.count_results().await, 14);
    }

    #[tokio::test]
    async fn test_buckets_apply_in_order_against_live_state() {
        let api = Arc::new(MemoryApi::new());
        let exam_id = seeded_exam(&api).await;
        let service = service(api.clone());

        // Lượt đầu: nghe + nói
        let first = execute_skill_changes(
            &service,
            exam_id,
            7,
            SkillChangeSet::additions(&[
                desired(SkillType::Listening, 20.0),
                desired(SkillType::Speaking, 20.0),
            ]),
        )
        .await;
        assert!(first.is_ok());

        // Lượt hai: bỏ nói, sửa nghe, thêm đọc
        let rows: Vec<SkillRowState> = api
            .list_exam_skills(exam_id)
            .await
            .unwrap()
            .into_iter()
            .map(Into::into)
            .collect();
        let changes = analyze_skill_changes(
            &rows,
            &[
                desired(SkillType::Listening, 50.0),
                desired(SkillType::Reading, 30.0),
            ],
        );
        let report = execute_skill_changes(&service, exam_id, 7, changes).await;

        assert!(report.is_ok(), "errors: {:?}", report.errors);
        assert_eq!(report.deleted.len(), 1);
        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.added.len(), 1);

        let active: Vec<_> = api
            .list_exam_skills(exam_id)
            .await
            .unwrap()
            .into_iter()
            .filter(|s| !s.is_deleted)
            .collect();
        assert_eq!(active.len(), 2);

        // Lượt ba: yêu cầu lại nói, phải kích hoạt lại đúng dòng cũ
        let speaking_id = report.deleted[0];
        let rows: Vec<SkillRowState> = api
            .list_exam_skills(exam_id)
            .await
            .unwrap()
            .into_iter()
            .map(Into::into)
            .collect();
        let changes = analyze_skill_changes(
            &rows,
            &[
                desired(SkillType::Listening, 50.0),
                desired(SkillType::Reading, 30.0),
                desired(SkillType::Speaking, 20.0),
            ],
        );
        let report = execute_skill_changes(&service, exam_id, 7, changes).await;
        assert!(report.is_ok(), "errors: {:?}", report.errors);
        assert_eq!(report.reactivated, vec![speaking_id]);
        assert_eq!(report.kept.len(), 2);
    }

    #[tokio::test]
    async fn test_stale_add_is_recovered_as_update() {
        let api = Arc::new(MemoryApi::new());
        let exam_id = seeded_exam(&api).await;
        let service = service(api.clone());

        execute_skill_changes(
            &service,
            exam_id,
            7,
            SkillChangeSet::additions(&[desired(SkillType::Writing, 20.0)]),
        )
        .await;

        // Phân loại cũ tưởng viết là kỹ năng mới, bước kiểm tra lại phải
        // chuyển sang cập nhật thay vì tạo trùng
        let report = execute_skill_changes(
            &service,
            exam_id,
            7,
            SkillChangeSet::additions(&[desired(SkillType::Writing, 45.0)]),
        )
        .await;

        assert!(report.is_ok(), "errors: {:?}", report.errors);
        assert!(report.added.is_empty());
        assert_eq!(report.updated.len(), 1);

        let rows = api.list_exam_skills(exam_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].max_score, 45.0);
    }

    #[tokio::test]
    async fn test_one_failed_row_does_not_stop_the_rest() {
        let api = Arc::new(MemoryApi::new());
        let exam_id = seeded_exam(&api).await;
        let service = service(api.clone());

        // ID 999 không tồn tại nên bước xóa ghi lỗi, bước thêm vẫn chạy
        let mut changes = SkillChangeSet::additions(&[desired(SkillType::Reading, 30.0)]);
        changes.to_delete.push(crate::models::skills::entities::ExamSkill {
            id: 999,
            exam_id,
            skill_type: SkillType::Listening,
            max_score: 10.0,
            weight: 1.0,
            order_index: 0,
            is_deleted: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        });

        let report = execute_skill_changes(&service, exam_id, 7, changes).await;

        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Nghe"));
        assert_eq!(report.added.len(), 1);
        assert_eq!(report.total_written(), 1);
    }

    #[tokio::test]
    async fn test_create_conflict_is_benign() {
        // Bọc API để giả lập phân tích cũ: kiểm tra trước khi thêm nói
        // "chưa có" nhưng máy chủ vẫn báo trùng khi tạo
        struct StaleCheckApi {
            inner: Arc<MemoryApi>,
            calls: std::sync::atomic::AtomicUsize,
        }

        #[async_trait::async_trait]
        impl ExamApi for StaleCheckApi {
            async fn create_exam(
                &self,
                exam: CreateExamRequest,
            ) -> crate::errors::Result<crate::models::exams::entities::Exam> {
                self.inner.create_exam(exam).await
            }
            async fn get_exam(
                &self,
                exam_id: i64,
            ) -> crate::errors::Result<Option<crate::models::exams::entities::Exam>> {
                self.inner.get_exam(exam_id).await
            }
            async fn list_class_exams(
                &self,
                class_id: i64,
            ) -> crate::errors::Result<Vec<crate::models::exams::entities::Exam>> {
                self.inner.list_class_exams(class_id).await
            }
            async fn update_exam(
                &self,
                exam_id: i64,
                update: crate::models::exams::requests::UpdateExamRequest,
            ) -> crate::errors::Result<Option<crate::models::exams::entities::Exam>> {
                self.inner.update_exam(exam_id, update).await
            }
            async fn create_skill(
                &self,
                skill: CreateSkillRequest,
            ) -> crate::errors::Result<crate::models::skills::entities::ExamSkill> {
                self.inner.create_skill(skill).await
            }
            async fn list_exam_skills(
                &self,
                exam_id: i64,
            ) -> crate::errors::Result<Vec<crate::models::skills::entities::ExamSkill>> {
                self.inner.list_exam_skills(exam_id).await
            }
            async fn find_active_skill(
                &self,
                exam_id: i64,
                skill_type: SkillType,
            ) -> crate::errors::Result<Option<crate::models::skills::entities::ExamSkill>> {
                // Lần gọi đầu (trước khi tạo) nói dối là chưa có
                let calls = self
                    .calls
                    .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                if calls == 0 {
                    return Ok(None);
                }
                self.inner.find_active_skill(exam_id, skill_type).await
            }
            async fn update_skill(
                &self,
                skill_id: i64,
                update: UpdateSkillRequest,
            ) -> crate::errors::Result<Option<crate::models::skills::entities::ExamSkill>> {
                self.inner.update_skill(skill_id, update).await
            }
            async fn create_result(
                &self,
                result: CreateResultRequest,
            ) -> crate::errors::Result<crate::models::results::entities::ExamResult> {
                self.inner.create_result(result).await
            }
            async fn list_skill_results(
                &self,
                exam_skill_id: i64,
            ) -> crate::errors::Result<Vec<crate::models::results::entities::ExamResult>>
            {
                self.inner.list_skill_results(exam_skill_id).await
            }
            async fn list_class_students(
                &self,
                class_id: i64,
            ) -> crate::errors::Result<Vec<ClassStudent>> {
                self.inner.list_class_students(class_id).await
            }
        }

        let inner = Arc::new(MemoryApi::new());
        let exam_id = seeded_exam(&inner).await;
        inner
            .create_skill(CreateSkillRequest {
                exam_id,
                skill_type: SkillType::Reading,
                max_score: 20.0,
                weight: 1.0,
                order_index: 0,
            })
            .await
            .unwrap();

        let api: Arc<dyn ExamApi> = Arc::new(StaleCheckApi {
            inner: inner.clone(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        });
        let service = SkillService::new(api, &SyncConfig::default());

        let report = execute_skill_changes(
            &service,
            exam_id,
            7,
            SkillChangeSet::additions(&[desired(SkillType::Reading, 35.0)]),
        )
        .await;

        assert!(report.is_ok(), "errors: {:?}", report.errors);
        assert!(report.added.is_empty());
        assert_eq!(report.updated.len(), 1);
        let rows = inner.list_exam_skills(exam_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].max_score, 35.0);
    }

    // Đảm bảo api::create_api với backend bộ nhớ dùng được cho executor
    #[tokio::test]
    async fn test_executor_works_behind_factory_built_api() {
        let config = crate::config::ApiConfig {
            api_type: "memory".to_string(),
            ..Default::default()
        };
        let api = api::create_api(&config, Arc::new(crate::utils::token::NoAuthProvider)).unwrap();
        let exam = api
            .create_exam(CreateExamRequest {
                class_id: 1,
                name: "Thi thử".to_string(),
                exam_type: ExamType::Periodic,
                exam_date: None,
                description: None,
                total_max_score: 0.0,
            })
            .await
            .unwrap();
        let service = SkillService::new(api, &SyncConfig::default());

        let report = execute_skill_changes(
            &service,
            exam.id,
            1,
            SkillChangeSet::additions(&[desired(SkillType::Comprehensive, 100.0)]),
        )
        .await;
        assert!(report.is_ok());
        assert_eq!(report.added.len(), 1);
    }
}
