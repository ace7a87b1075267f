use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::{CacheStats, ClassDataCache};
use crate::config::CacheConfig;
use crate::models::class_students::entities::ClassStudent;
use crate::models::exams::entities::Exam;

/// Bộ nhớ đệm dựa trên moka
///
/// Moka tự quản lý TTL và loại bỏ mục khi đầy nên không cần tác vụ
/// quét nền riêng. Giữ hai cache tách biệt cho danh sách bài thi và
/// danh sách học viên của mỗi lớp.
pub struct MokaClassCache {
    exams: Cache<i64, Vec<Exam>>,
    students: Cache<i64, Vec<ClassStudent>>,
    version: AtomicU64,
}

impl MokaClassCache {
    pub fn new(config: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(config.default_ttl);
        let capacity = config.max_entries.max(1) as u64;
        Self {
            exams: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            students: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            version: AtomicU64::new(0),
        }
    }

    fn bump_version(&self) {
        self.version.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl ClassDataCache for MokaClassCache {
    async fn get_exams(&self, class_id: i64) -> Option<Vec<Exam>> {
        self.exams.get(&class_id).await
    }

    async fn put_exams(&self, class_id: i64, exams: &[Exam]) {
        self.exams.insert(class_id, exams.to_vec()).await;
        self.bump_version();
    }

    async fn get_students(&self, class_id: i64) -> Option<Vec<ClassStudent>> {
        self.students.get(&class_id).await
    }

    async fn put_students(&self, class_id: i64, students: &[ClassStudent]) {
        self.students.insert(class_id, students.to_vec()).await;
        self.bump_version();
    }

    async fn invalidate_class(&self, class_id: i64) {
        self.exams.invalidate(&class_id).await;
        self.students.invalidate(&class_id).await;
    }

    async fn clear(&self) {
        self.exams.invalidate_all();
        self.students.invalidate_all();
    }

    async fn stats(&self) -> CacheStats {
        self.exams.run_pending_tasks().await;
        self.students.run_pending_tasks().await;
        CacheStats {
            entries: (self.exams.entry_count() + self.students.entry_count()) as usize,
            // moka không cho biết kích thước từng mục
            approx_bytes: 0,
            version: self.version.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CacheConfig {
        CacheConfig {
            cache_type: "moka".to_string(),
            default_ttl: 300,
            max_entries: 50,
        }
    }

    #[tokio::test]
    async fn test_put_get_and_invalidate() {
        let cache = MokaClassCache::new(&config());
        cache.put_students(
            7,
            &[ClassStudent {
                id: 1,
                class_id: 7,
                student_id: 101,
                full_name: "Nguyễn Văn An".to_string(),
                is_deleted: false,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            }],
        )
        .await;

        let rows = cache.get_students(7).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].full_name, "Nguyễn Văn An");

        cache.invalidate_class(7).await;
        assert!(cache.get_students(7).await.is_none());
    }

    #[tokio::test]
    async fn test_stats_count_entries_across_kinds() {
        let cache = MokaClassCache::new(&config());
        cache.put_exams(1, &[]).await;
        cache.put_students(1, &[]).await;
        cache.put_exams(2, &[]).await;

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.version, 3);
    }
}
