//! Mô-đun xử lý lỗi thống nhất
//!
//! Dùng macro để tự động sinh kiểu lỗi, kèm mã lỗi và tên loại lỗi.

use std::fmt;

/// Macro định nghĩa các loại lỗi
///
/// Tự động sinh:
/// - định nghĩa enum
/// - phương thức code() - trả về mã lỗi
/// - phương thức error_type() - trả về tên loại lỗi
/// - phương thức message() - trả về chi tiết lỗi
/// - các hàm khởi tạo tiện dụng
macro_rules! define_langcenter_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LangCenterError {
            $($variant(String),)*
        }

        impl LangCenterError {
            /// Lấy mã lỗi
            pub fn code(&self) -> &'static str {
                match self {
                    $(LangCenterError::$variant(_) => $code,)*
                }
            }

            /// Lấy tên loại lỗi
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LangCenterError::$variant(_) => $type_name,)*
                }
            }

            /// Lấy chi tiết lỗi
            pub fn message(&self) -> &str {
                match self {
                    $(LangCenterError::$variant(msg) => msg,)*
                }
            }
        }

        // Sinh các hàm khởi tạo tiện dụng
        paste::paste! {
            impl LangCenterError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LangCenterError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_langcenter_errors! {
    Validation("E001", "Validation Error"),
    ApiConnection("E002", "API Connection Error"),
    ApiServer("E003", "API Server Error"),
    ApiRequest("E004", "API Request Rejected"),
    NotFound("E005", "Resource Not Found"),
    Conflict("E006", "Duplicate Resource"),
    BusinessRule("E007", "Business Rule Violation"),
    StatusTransition("E008", "Invalid Status Transition"),
    SnapshotNotFound("E009", "Snapshot Not Found"),
    RollbackUnsupported("E010", "Rollback Not Supported"),
    Serialization("E011", "Serialization Error"),
    Config("E012", "Configuration Error"),
}

impl LangCenterError {
    /// Định dạng có màu (dùng cho môi trường phát triển)
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// Định dạng gọn
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// Lỗi tạm thời, có thể thử lại (mất kết nối hoặc máy chủ 5xx)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LangCenterError::ApiConnection(_) | LangCenterError::ApiServer(_)
        )
    }
}

impl fmt::Display for LangCenterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LangCenterError {}

// Triển khai From cho các loại lỗi thường gặp
impl From<reqwest::Error> for LangCenterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LangCenterError::Serialization(err.to_string())
        } else {
            LangCenterError::ApiConnection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LangCenterError {
    fn from(err: serde_json::Error) -> Self {
        LangCenterError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for LangCenterError {
    fn from(err: config::ConfigError) -> Self {
        LangCenterError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LangCenterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LangCenterError::validation("test").code(), "E001");
        assert_eq!(LangCenterError::api_connection("test").code(), "E002");
        assert_eq!(LangCenterError::conflict("test").code(), "E006");
        assert_eq!(LangCenterError::rollback_unsupported("test").code(), "E010");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LangCenterError::api_connection("test").error_type(),
            "API Connection Error"
        );
        assert_eq!(
            LangCenterError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = LangCenterError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = LangCenterError::status_transition("draft -> completed");
        let formatted = err.format_simple();
        assert!(formatted.contains("Invalid Status Transition"));
        assert!(formatted.contains("draft -> completed"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(LangCenterError::api_connection("timeout").is_transient());
        assert!(LangCenterError::api_server("500").is_transient());
        assert!(!LangCenterError::conflict("duplicate").is_transient());
        assert!(!LangCenterError::validation("bad input").is_transient());
    }
}
