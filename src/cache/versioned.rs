use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use super::{CacheStats, ClassDataCache};
use crate::config::CacheConfig;
use crate::models::class_students::entities::ClassStudent;
use crate::models::exams::entities::Exam;

// Hai loại danh sách được cache cho mỗi lớp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CacheKind {
    Exams,
    Students,
}

#[derive(Debug, Clone)]
enum CachedPayload {
    Exams(Vec<Exam>),
    Students(Vec<ClassStudent>),
}

impl CachedPayload {
    /// Ước lượng kích thước bằng độ dài chuỗi JSON
    fn approx_bytes(&self) -> usize {
        let bytes = match self {
            CachedPayload::Exams(rows) => serde_json::to_vec(rows),
            CachedPayload::Students(rows) => serde_json::to_vec(rows),
        };
        bytes.map(|b| b.len()).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: CachedPayload,
    created_at: DateTime<Utc>,
    // Số phiên bản tại thời điểm ghi, phục vụ chẩn đoán
    version: u64,
    approx_bytes: usize,
}

/// Bộ nhớ đệm TTL có đánh số phiên bản
///
/// - mỗi mục sống tối đa `default_ttl` giây, hết hạn thì coi như không có
/// - đầy thì loại 25% mục cũ nhất để dồn chỗ
/// - mỗi lần ghi tăng bộ đếm phiên bản toàn cục
/// - tác vụ nền quét mục hết hạn mỗi ttl/2
pub struct VersionedClassCache {
    entries: DashMap<(CacheKind, i64), CacheEntry>,
    version: AtomicU64,
    ttl: Duration,
    max_entries: usize,
}

impl VersionedClassCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            version: AtomicU64::new(0),
            ttl: Duration::from_secs(config.default_ttl),
            max_entries: config.max_entries.max(1),
        }
    }

    /// Tạo cache kèm tác vụ quét nền
    ///
    /// Tác vụ chỉ giữ Weak nên tự dừng khi cache bị thả, không cần
    /// hủy thủ công khi tắt ứng dụng.
    pub fn with_sweeper(config: &CacheConfig) -> Arc<Self> {
        let cache = Arc::new(Self::new(config));
        let weak = Arc::downgrade(&cache);
        let period = (cache.ttl / 2).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // tick đầu tiên trả về ngay lập tức
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(cache) = weak.upgrade() else {
                    break;
                };
                let removed = cache.sweep();
                if removed > 0 {
                    debug!("Cache sweeper removed {removed} expired entries");
                }
            }
        });
        cache
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        let age = Utc::now().signed_duration_since(entry.created_at);
        age.to_std().map(|age| age > self.ttl).unwrap_or(true)
    }

    /// Xóa các mục đã hết hạn, trả về số mục đã xóa
    pub fn sweep(&self) -> usize {
        let candidates: Vec<(CacheKind, i64)> = self
            .entries
            .iter()
            .filter(|item| self.is_expired(item.value()))
            .map(|item| *item.key())
            .collect();
        let mut removed = 0;
        for key in candidates {
            if self
                .entries
                .remove_if(&key, |_, entry| self.is_expired(entry))
                .is_some()
            {
                removed += 1;
            }
        }
        removed
    }

    /// Loại 25% mục cũ nhất khi cache đầy
    fn evict_oldest_quarter(&self) {
        let mut keys: Vec<((CacheKind, i64), DateTime<Utc>)> = self
            .entries
            .iter()
            .map(|item| (*item.key(), item.value().created_at))
            .collect();
        keys.sort_by_key(|(_, created_at)| *created_at);
        let quarter = (self.max_entries / 4).max(1);
        for (key, _) in keys.into_iter().take(quarter) {
            self.entries.remove(&key);
        }
        debug!("Cache evicted {quarter} oldest entries to make room");
    }

    fn get_payload(&self, kind: CacheKind, class_id: i64) -> Option<CachedPayload> {
        let key = (kind, class_id);
        let (payload, expired) = match self.entries.get(&key) {
            Some(entry) => {
                if self.is_expired(&entry) {
                    (None, true)
                } else {
                    (Some(entry.payload.clone()), false)
                }
            }
            None => (None, false),
        };
        // Guard của DashMap đã được thả trước khi xóa mục hết hạn
        if expired {
            self.entries.remove_if(&key, |_, entry| self.is_expired(entry));
        }
        payload
    }

    fn put_payload(&self, kind: CacheKind, class_id: i64, payload: CachedPayload) {
        let key = (kind, class_id);
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.evict_oldest_quarter();
        }
        let version = self.version.fetch_add(1, Ordering::Relaxed) + 1;
        let approx_bytes = payload.approx_bytes();
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                created_at: Utc::now(),
                version,
                approx_bytes,
            },
        );
    }

    /// Giá trị hiện tại của bộ đếm phiên bản
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ClassDataCache for VersionedClassCache {
    async fn get_exams(&self, class_id: i64) -> Option<Vec<Exam>> {
        match self.get_payload(CacheKind::Exams, class_id) {
            Some(CachedPayload::Exams(rows)) => Some(rows),
            _ => None,
        }
    }

    async fn put_exams(&self, class_id: i64, exams: &[Exam]) {
        self.put_payload(CacheKind::Exams, class_id, CachedPayload::Exams(exams.to_vec()));
    }

    async fn get_students(&self, class_id: i64) -> Option<Vec<ClassStudent>> {
        match self.get_payload(CacheKind::Students, class_id) {
            Some(CachedPayload::Students(rows)) => Some(rows),
            _ => None,
        }
    }

    async fn put_students(&self, class_id: i64, students: &[ClassStudent]) {
        self.put_payload(
            CacheKind::Students,
            class_id,
            CachedPayload::Students(students.to_vec()),
        );
    }

    async fn invalidate_class(&self, class_id: i64) {
        self.entries.remove(&(CacheKind::Exams, class_id));
        self.entries.remove(&(CacheKind::Students, class_id));
        debug!("Cache invalidated for class {class_id}");
    }

    async fn clear(&self) {
        self.entries.clear();
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            approx_bytes: self
                .entries
                .iter()
                .map(|item| item.value().approx_bytes)
                .sum(),
            version: self.version(),
        }
    }
}
