//! HTTP entry point for Room Crawler.
//!
//! `POST` to any path runs the pipeline once and answers `ok` or the error.
//!
//! ## Environment Variables
//!
//! - `PORT`: Listen port (default: 8080)
//! - `RUST_LOG`: Log filter (e.g., `info`, `room_crawler=debug`)
//!
//! The crawler itself is configured as for the CLI.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use room_crawler::{config, error::Result, pipeline::Pipeline, server};

async fn run() -> Result<()> {
    let config = config::load_from_env()?;
    let pipeline = Pipeline::from_config(&config)?;
    server::serve(Arc::new(pipeline), config.server.port).await
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Room Crawler server starting...");

    match run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}
