//! Signal cycle HTTP server binary.
//!
//! Loads configuration, restores the peak window registry from its store,
//! and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! # In-memory registry (default)
//! cargo run --bin cycle-server
//!
//! # Registry persisted to a JSON-lines file
//! PEAK_WINDOWS_PATH=data/peak_windows.jsonl cargo run --bin cycle-server
//! ```
//!
//! # Environment Variables
//!
//! - `CYCLE_CONFIG`: path to a TOML config file (default: search for `cycle.toml`)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`, `PEAK_WINDOWS_PATH`, `EMPTY_ON_LOAD_FAILURE`, `PEAK_MULTIPLIER`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use signal_cycle::config::AppConfig;
use signal_cycle::db::RepositoryFactory;
use signal_cycle::http::{create_router, AppState};
use signal_cycle::services::{CycleService, PeakWindowRegistry, SystemClock};

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

    info!("Starting signal cycle server");

    let config = AppConfig::load()?;
    let store = RepositoryFactory::from_settings(&config.repository)?;
    info!("Using {} peak window store", store.backend_name());

    let registry = PeakWindowRegistry::load(store, config.registry_options()).await?;
    let service = CycleService::with_parts(
        Arc::new(registry),
        config.allocator(),
        Arc::new(SystemClock),
    );
    info!(
        "Allocator ready with {} demand",
        service.allocator().estimator().name()
    );

    let app = create_router(AppState::new(Arc::new(service)));

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
