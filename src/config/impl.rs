use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// Nạp cấu hình
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // Nạp tệp cấu hình mặc định trước
            .add_source(File::with_name("config").required(false))
            // Sau đó nạp tệp cấu hình theo môi trường
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Cuối cùng cho biến môi trường ghi đè
            .add_source(
                Environment::with_prefix("LANGCENTER")
                    .separator("_")
                    .try_parsing(true),
            );

        // Hỗ trợ các biến môi trường thông dụng
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("api.base_url", std::env::var("API_BASE_URL").ok())?
            .set_override_option("api.type", std::env::var("API_BACKEND").ok())?;

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Lấy thể hiện cấu hình toàn cục
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// Khởi tạo cấu hình (gọi khi ứng dụng khởi động)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// Kiểm tra có phải môi trường sản xuất không
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// Kiểm tra có phải môi trường phát triển không
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }
}
