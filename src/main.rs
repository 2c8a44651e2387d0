//! Zone Control Server - Authoritative game server for the control-zone mode
//!
//! This is the main entry point for the game server. It handles:
//! - The authoritative contest tick loop over the loaded map's zones
//! - WebSocket connections for player position reports and event fan-out
//! - HTTP endpoints for health checks and map changes

mod app;
mod config;
mod game;
mod http;
mod util;
mod ws;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::AppState;
use crate::config::maps::MapRegistry;
use crate::config::Config;
use crate::game::{ControlMatch, MatchCommand};
use crate::http::build_router;
use crate::util::time::init_server_time;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    // Initialize server time tracking
    init_server_time();

    info!("Starting Zone Control Server");
    info!("Server address: {}", config.server_addr);

    // Load per-map zone coordinates (seeds a default file on first start)
    let registry = MapRegistry::load_or_init(&config.map_config_path)?;
    info!(maps = registry.map_count(), "Map coordinate registry loaded");

    // Spawn the authoritative match task
    let (control_match, match_handle) = ControlMatch::new(&config, registry);
    tokio::spawn(control_match.run());

    // Load the startup map, if configured
    if let Some(map) = config.startup_map.clone() {
        match_handle
            .command_tx
            .send(MatchCommand::ChangeMap(map))
            .await
            .map_err(|_| anyhow::anyhow!("match task exited before startup map load"))?;
    }

    // Create application state and router
    let state = AppState::new(config.clone(), match_handle);
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server_addr;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("Health check: http://{}/health", addr);
    info!("WebSocket endpoint: ws://{}/ws", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
