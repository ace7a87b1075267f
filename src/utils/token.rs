use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Nguồn token xác thực cho API client
///
/// Trước đây mỗi nơi tự đọc token theo một tên khóa khác nhau
/// (`access_token`, `accessToken`), chỗ gửi được chỗ không.
/// Trait này gom việc đọc token về một mối, client chỉ hỏi một chỗ.
pub trait AuthTokenProvider: Send + Sync {
    /// Token hiện tại, None nghĩa là chưa đăng nhập
    fn access_token(&self) -> Option<String>;
}

/// Token cố định, dùng cho kiểm thử hoặc công cụ chạy tay
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AuthTokenProvider for StaticTokenProvider {
    fn access_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// Không gửi token, dùng khi backend không yêu cầu xác thực
pub struct NoAuthProvider;

impl AuthTokenProvider for NoAuthProvider {
    fn access_token(&self) -> Option<String> {
        None
    }
}

/// Đọc token từ biến môi trường
///
/// Khóa chính là `LANGCENTER_ACCESS_TOKEN`; khóa cũ `ACCESS_TOKEN`
/// vẫn được chấp nhận nhưng sẽ ghi cảnh báo một lần để nhắc chuyển đổi.
pub struct EnvTokenProvider {
    primary_key: String,
    legacy_key: String,
    warned_legacy: AtomicBool,
}

impl EnvTokenProvider {
    pub fn new() -> Self {
        Self::with_keys("LANGCENTER_ACCESS_TOKEN", "ACCESS_TOKEN")
    }

    /// Tùy biến tên khóa, chủ yếu phục vụ kiểm thử
    pub fn with_keys(primary: impl Into<String>, legacy: impl Into<String>) -> Self {
        Self {
            primary_key: primary.into(),
            legacy_key: legacy.into(),
            warned_legacy: AtomicBool::new(false),
        }
    }
}

impl Default for EnvTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthTokenProvider for EnvTokenProvider {
    fn access_token(&self) -> Option<String> {
        if let Ok(token) = std::env::var(&self.primary_key) {
            if !token.is_empty() {
                return Some(token);
            }
        }
        match std::env::var(&self.legacy_key) {
            Ok(token) if !token.is_empty() => {
                if !self.warned_legacy.swap(true, Ordering::Relaxed) {
                    warn!(
                        "Access token read from legacy key '{}', please migrate to '{}'",
                        self.legacy_key, self.primary_key
                    );
                }
                Some(token)
            }
            _ => None,
        }
    }
}
