//! Khởi tạo hệ thống ghi log
//!
//! Dùng tracing và tracing-subscriber, mức log lấy từ cấu hình ứng dụng.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Khởi tạo log cho ứng dụng
///
/// Môi trường phát triển in kèm tên tệp và số dòng,
/// môi trường sản xuất xuất log dạng JSON.
///
/// Trả về guard của writer không chặn; cần giữ guard này
/// cho đến khi chương trình kết thúc để không mất log.
pub fn init(config: &AppConfig) -> WorkerGuard {
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(stdout_log);
    let filter = EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    guard
}

/// Khởi tạo log cho môi trường kiểm thử
///
/// Dùng try_init để các bài test gọi lặp lại không bị lỗi.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
