use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::config::RetryConfig;
use crate::errors::Result;

/// Chính sách thử lại cho các yêu cầu đọc
///
/// Chỉ áp dụng cho thao tác đọc. Các thao tác ghi phải chạy đúng một lần
/// theo thứ tự, không được tự ý lặp lại.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Chạy đúng một lần, không thử lại
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Thời gian chờ trước lần thử lại thứ `attempt`
    ///
    /// Lũy thừa theo số lần thử, chặn trên bởi max_delay, cộng jitter
    /// ngẫu nhiên để các client không dồn về máy chủ cùng lúc.
    fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        let capped = exp.min(self.max_delay);
        let half = capped.as_millis() as u64 / 2;
        if half == 0 {
            return capped;
        }
        let jitter = rand::rng().random_range(0..=half);
        Duration::from_millis(half + jitter)
    }
}

/// Chạy một thao tác với thử lại có giới hạn
///
/// Chỉ thử lại lỗi tạm thời (mất kết nối, máy chủ 5xx);
/// các lỗi khác được trả về ngay.
pub async fn retry_operation<T, F, Fut>(
    policy: &RetryPolicy,
    op_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "{op_name} failed (attempt {}/{}), retrying in {:?}: {err}",
                    attempt + 1,
                    policy.max_attempts,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LangCenterError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(&RetryConfig {
            max_attempts,
            base_delay_ms: 100,
            max_delay_ms: 1000,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = retry_operation(&policy(3), "list_exams", || {
            let calls = calls.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(LangCenterError::api_connection("connection refused"))
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<()> = retry_operation(&policy(3), "create_exam", || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LangCenterError::conflict("duplicate"))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<()> = retry_operation(&policy(4), "list_exams", || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LangCenterError::api_server("HTTP 500"))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_delay_is_capped() {
        let p = policy(5);
        for attempt in 0..20 {
            assert!(p.delay_for(attempt) <= Duration::from_millis(1000));
        }
    }

    #[test]
    fn test_none_policy_runs_once() {
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }
}
