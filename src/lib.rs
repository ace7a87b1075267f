//! LangCenter Exam Core - lõi quản lý bài thi cho trung tâm ngoại ngữ
//!
//! Thư viện phía client bao trọn việc đồng bộ bài thi và kỹ năng với
//! backend REST: phân loại thay đổi, ghi tuần tự theo ràng buộc duy
//! nhất, cache có TTL và khôi phục theo ảnh chụp thao tác.
//!
//! # Kiến trúc
//! - `api`: lớp gọi backend (REST hoặc bộ nhớ)
//! - `cache`: cache danh sách theo lớp, có TTL và đánh số phiên bản
//! - `config`: quản lý cấu hình
//! - `errors`: xử lý lỗi thống nhất
//! - `logging`: khởi tạo tracing
//! - `models`: định nghĩa mô hình dữ liệu
//! - `runtime`: nối dây dịch vụ khi khởi động
//! - `services`: lớp nghiệp vụ (bài thi, kỹ năng, khôi phục)
//! - `utils`: hàm tiện ích

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod runtime;
pub mod services;
pub mod utils;
