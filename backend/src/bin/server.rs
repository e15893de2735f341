//! Coverage HTTP server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin tro-server
//! PORT=9000 TRO_PRIORITY=traffic cargo run --bin tro-server
//! ```
//!
//! # Environment Variables
//!
//! - `TRO_CONFIG`: path to a `tro.toml` file
//! - `HOST`, `PORT`: bind address (default: 0.0.0.0:8080)
//! - `TRO_PRIORITY`, `TRO_THRESHOLDS`, `TRO_MAX_UPLOAD_MB`, `TRO_EXPORT_FILENAME`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tro_rust::config::AppConfig;
use tro_rust::db::LocalRepository;
use tro_rust::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting coverage HTTP server");

    let config = AppConfig::load()?;
    info!(
        "Default priority: {}, thresholds: {:?}",
        config.coverage.priority,
        config.coverage.thresholds.as_slice()
    );

    let addr: SocketAddr = config.server.bind_address().parse()?;
    let state = AppState::new(Arc::new(LocalRepository::new()), config);
    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
