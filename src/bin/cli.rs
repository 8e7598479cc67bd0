//! Room Crawler CLI
//!
//! Runs the pipeline once. For the HTTP trigger, use `room-crawler-server`.
//!
//! ## Environment Variables
//!
//! - `ROOMS_URL`: Listings page to scrape
//! - `SPREADSHEET_ID`: Spreadsheet holding the snapshot
//! - `GOOGLE_CREDENTIALS_JSON`: Service account key for the spreadsheet
//! - `SLACK_WEBHOOK_URL`: Incoming webhook for reports
//! - `SNAPSHOT_PATH`: Use a local JSON snapshot instead of the spreadsheet
//! - `ROOM_CRAWLER_CONFIG`: Optional TOML file with selectors and tunables
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)

use std::process::ExitCode;

use clap::Parser;
use room_crawler::{config, error::AppError, pipeline::Pipeline};

/// Room Crawler - reports listing changes
#[derive(Parser, Debug)]
#[command(name = "room-crawler", version, about)]
struct Cli {}

/// Initialize logging, honoring `RUST_LOG`.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let _cli = Cli::parse();
    init_logging();

    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match Pipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log::error!("Failed to initialize: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match pipeline.execute().await {
        Ok(outcome) => {
            log::info!("Done: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Run failed: {}", e);
            let reported = pipeline.report(e).await;
            if matches!(reported, AppError::Escalation { .. }) {
                eprintln!("{}", reported);
            }
            ExitCode::FAILURE
        }
    }
}
