use serde::{Deserialize, Serialize};

/// Cấu trúc cấu hình ứng dụng
///
/// Mọi trường đều có giá trị mặc định, nên thư viện chạy được
/// ngay cả khi không có tệp cấu hình.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub snapshot: SnapshotConfig,
    pub sync: SyncConfig,
}

/// Thiết lập ứng dụng
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            system_name: "LangCenter Exam Core".to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Cấu hình API phía sau
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Loại backend: "rest" hoặc "memory"
    #[serde(rename = "type")]
    pub api_type: String,
    pub base_url: String,
    pub timeout: u64, // thời gian chờ yêu cầu (giây)
    pub retry: RetryConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_type: "rest".to_string(),
            base_url: "http://localhost:3000".to_string(),
            timeout: 30,
            retry: RetryConfig::default(),
        }
    }
}

/// Cấu hình thử lại cho các yêu cầu đọc
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 5000,
        }
    }
}

/// Cấu hình bộ nhớ đệm
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Loại cache: "versioned" hoặc "moka"
    #[serde(rename = "type")]
    pub cache_type: String,
    pub default_ttl: u64, // thời gian sống của mỗi mục (giây)
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: "versioned".to_string(),
            default_ttl: 300,
            max_entries: 50,
        }
    }
}

/// Cấu hình lưu ảnh chụp thao tác
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub max_entries: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self { max_entries: 10 }
    }
}

/// Cấu hình đồng bộ kỹ năng
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Số phiếu điểm tạo đồng thời trong một lô
    pub result_batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            result_batch_size: 5,
        }
    }
}
