use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{self, ExamApi};
use crate::cache::{self, ClassDataCache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::exams::ExamService;
use crate::services::recovery::{RecoveryService, SnapshotStore};
use crate::utils::token::{AuthTokenProvider, EnvTokenProvider};

/// Bộ dịch vụ lõi đã nối dây xong
///
/// Các tay cầm đều chia sẻ được; ứng dụng giữ một CoreContext và phát
/// các Arc bên trong cho nơi nào cần.
pub struct CoreContext {
    pub api: Arc<dyn ExamApi>,
    pub cache: Arc<dyn ClassDataCache>,
    pub snapshots: Arc<SnapshotStore>,
    pub exams: Arc<ExamService>,
    pub recovery: Arc<RecoveryService>,
}

/// Nối dây toàn bộ dịch vụ theo cấu hình
///
/// Gọi bên trong tokio runtime, vì cache có thể tạo tác vụ quét nền.
pub fn prepare_core(
    config: &AppConfig,
    tokens: Arc<dyn AuthTokenProvider>,
) -> Result<CoreContext> {
    let api = api::create_api(&config.api, tokens)?;
    warn!(
        "API backend '{}' initialized, base url {}",
        config.api.api_type, config.api.base_url
    );

    let cache = cache::create_cache(&config.cache);
    let snapshots = Arc::new(SnapshotStore::new(&config.snapshot));

    let exams = Arc::new(ExamService::new(
        api.clone(),
        cache.clone(),
        snapshots.clone(),
        &config.sync,
    ));
    let recovery = Arc::new(RecoveryService::new(exams.clone(), snapshots.clone()));

    info!("{} core services ready", config.app.system_name);
    Ok(CoreContext {
        api,
        cache,
        snapshots,
        exams,
        recovery,
    })
}

/// Nối dây theo cấu hình toàn cục, token đọc từ biến môi trường
pub fn prepare_core_from_env() -> Result<CoreContext> {
    prepare_core(AppConfig::get(), Arc::new(EnvTokenProvider::new()))
}
