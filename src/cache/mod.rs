use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_rs::TS;

use crate::config::CacheConfig;
use crate::models::class_students::entities::ClassStudent;
use crate::models::exams::entities::Exam;

pub mod moka;
pub mod versioned;

pub use moka::MokaClassCache;
pub use versioned::VersionedClassCache;

/// Thống kê bộ nhớ đệm, phục vụ màn hình chẩn đoán
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/cache.ts")]
pub struct CacheStats {
    pub entries: usize,
    pub approx_bytes: usize,
    pub version: u64,
}

/// Bộ nhớ đệm dữ liệu theo lớp học
///
/// Cache hai danh sách được đọc nhiều nhất: bài thi của lớp và
/// học viên của lớp. Giá trị trả ra luôn là bản sao độc lập.
#[async_trait]
pub trait ClassDataCache: Send + Sync {
    async fn get_exams(&self, class_id: i64) -> Option<Vec<Exam>>;
    async fn put_exams(&self, class_id: i64, exams: &[Exam]);
    async fn get_students(&self, class_id: i64) -> Option<Vec<ClassStudent>>;
    async fn put_students(&self, class_id: i64, students: &[ClassStudent]);
    // Xóa cả hai mục của một lớp sau khi ghi dữ liệu
    async fn invalidate_class(&self, class_id: i64);
    // Xóa toàn bộ
    async fn clear(&self);
    async fn stats(&self) -> CacheStats;
}

/// Khởi tạo cache theo cấu hình
///
/// Loại không nhận ra thì lùi về cache versioned mặc định.
/// Phải gọi bên trong tokio runtime vì cache versioned có tác vụ quét nền.
pub fn create_cache(config: &CacheConfig) -> Arc<dyn ClassDataCache> {
    match config.cache_type.as_str() {
        "versioned" => VersionedClassCache::with_sweeper(config),
        "moka" => Arc::new(MokaClassCache::new(config)),
        other => {
            tracing::warn!("Unknown cache type '{other}', falling back to versioned cache");
            VersionedClassCache::with_sweeper(config)
        }
    }
}
