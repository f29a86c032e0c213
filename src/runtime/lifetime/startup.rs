use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::AppState;
use crate::config::StaticConfig;
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub state: AppState,
}

/// 准备服务器启动的上下文
///
/// 打开存储（连接 + 迁移），再把同一个存储句柄注入各个服务。
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to open storage")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_name().to_uppercase()
    );

    let state = AppState::new(storage.clone(), config);

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { storage, state })
}
