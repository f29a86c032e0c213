//! Server mode
//!
//! Opens storage, wires the services into actix-web and runs until the
//! server stops or Ctrl+C arrives.

use std::time::Duration;

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
};
use anyhow::{Context, Result};
use tracing::{error, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .inspect_err(|e| error!("Server startup failed: {:#}", e))?;

    let state = startup.state.clone();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    if config.server.trusted_proxies.is_empty() {
        warn!(
            "No trusted proxies configured: connections from private IPs will use X-Forwarded-For"
        );
    } else {
        warn!(
            "Explicit trusted proxies configured: {:?}",
            config.server.trusted_proxies
        );
    }

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .wrap(RequestIdMiddleware)
            .configure(|cfg| state.configure(cfg))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    warn!("Starting server at http://{}", bind_address);
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res.context("HTTP server error")?;
        }
        _ = lifetime::shutdown::wait_for_signal() => {
            // 停止接收新连接，等待进行中的请求完成
            handle.stop(true).await;
        }
    }

    lifetime::shutdown::close_storage(&startup.storage).await;
    warn!("Graceful shutdown complete");
    Ok(())
}
