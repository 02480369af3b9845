//! Retitle server binary.
//!
//! Hosts the HTTP surface and the pipeline stages in one process; the bus
//! between them is in-memory, so both must live together.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use retitle_api::{create_router, ApiConfig, AppState};
use retitle_bus::EventBus;
use retitle_pipeline::{spawn_stages, PipelineConfig};
use retitle_store::{JobStore, MemoryJobStore, RedisJobStore};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load configuration once; clients receive it explicitly.
    let config = ApiConfig::from_env();
    let pipeline_config = PipelineConfig::from_env();

    // Initialize tracing with colored output for dev, JSON for production;
    // LOG_FORMAT overrides either way.
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or_else(|_| config.is_production());

    let env_filter = EnvFilter::from_default_env()
        .add_directive("retitle=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting retitle-api");
    info!("API config: host={}, port={}", config.host, config.port);

    let store: Arc<dyn JobStore> = if std::env::var("REDIS_URL").is_ok() {
        match RedisJobStore::from_env() {
            Ok(store) => Arc::new(store),
            Err(e) => {
                error!("Failed to create Redis job store: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        info!("REDIS_URL not set, using in-memory job store");
        Arc::new(MemoryJobStore::new())
    };

    let bus = EventBus::new();
    let stage_handles = spawn_stages(&pipeline_config, Arc::clone(&store), bus.clone());

    let state = AppState::new(config.clone(), store, bus);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid bind address");

    info!("Listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    for handle in stage_handles {
        handle.abort();
    }

    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Received shutdown signal");
}
