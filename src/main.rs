//! Chat gateway configuration service.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │               CHAT GATEWAY                    │
//!                      │                                               │
//!   Admin Request      │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!   ──────────────────▶│  │  http   │──▶│  admin  │──▶│   config   │  │
//!                      │  │ server  │   │ auth +  │   │  manager   │  │
//!                      │  └─────────┘   │handlers │   └─────┬──────┘  │
//!                      │                └─────────┘         │         │
//!                      │                              ┌─────▼──────┐  │
//!   Request Workers    │  ┌───────────┐               │   config   │  │
//!   ──────────────────▶│  │ rotation  │◀─────────────▶│   store    │  │
//!   (session per call) │  │  cursor   │               │  (RwLock)  │  │
//!                      │  └───────────┘               └─────┬──────┘  │
//!                      │                                    │         │
//!                      │                              ┌─────▼──────┐  │
//!                      │                              │persistence │  │
//!                      │                              │config.json │  │
//!                      │                              └────────────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_gateway::admin::handlers::mask_api_key;
use chat_gateway::{ConfigManager, HttpServer};

#[derive(Parser)]
#[command(name = "chat-gateway")]
#[command(about = "Runtime configuration service for a multi-credential chat gateway", long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("chat-gateway v0.1.0 starting");

    let cli = Cli::parse();

    let manager = Arc::new(ConfigManager::bootstrap(cli.config));
    let snapshot = manager.store().snapshot();

    tracing::info!(
        address = %snapshot.address,
        api_key = %mask_api_key(&snapshot.api_key),
        sessions = snapshot.sessions.len(),
        default_model = %snapshot.default_model,
        force_model = %snapshot.force_model,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&snapshot.address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listening for connections");

    // Create and run HTTP server
    let server = HttpServer::new(manager);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
