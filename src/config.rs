// src/config.rs

//! Configuration loading utilities.
//!
//! The configuration is assembled once at process start: defaults, then an
//! optional TOML file named by `ROOM_CRAWLER_CONFIG`, then individual
//! environment variables.

use std::path::PathBuf;

use crate::error::Result;
use crate::models::Config;

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_PATH_VAR: &str = "ROOM_CRAWLER_CONFIG";

/// Build and validate the configuration from the process environment.
pub fn load_from_env() -> Result<Config> {
    load_with(|key| std::env::var(key).ok())
}

/// Build and validate the configuration from an arbitrary variable lookup.
pub fn load_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(CONFIG_PATH_VAR) {
        Some(path) if !path.trim().is_empty() => Config::load_or_default(path.trim()),
        _ => Config::default(),
    };
    apply_env_overrides(&mut config, &lookup);
    config.validate()?;
    Ok(config)
}

/// Override configuration fields from environment variables.
///
/// The endpoint and credential variables are taken as-is, even when empty.
fn apply_env_overrides<F>(config: &mut Config, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("ROOMS_URL") {
        config.source.url = url;
    }
    if let Some(id) = lookup("SPREADSHEET_ID") {
        config.sheets.spreadsheet_id = id;
    }
    if let Some(url) = lookup("SLACK_WEBHOOK_URL") {
        config.notifier.webhook_url = url;
    }
    if let Some(json) = lookup("GOOGLE_CREDENTIALS_JSON") {
        config.sheets.credentials_json = json;
    }

    if let Some(port) = lookup("PORT") {
        match port.trim().parse() {
            Ok(port) => config.server.port = port,
            Err(_) => log::warn!(
                "Ignoring invalid PORT {:?}, using {}",
                port,
                config.server.port
            ),
        }
    }

    if let Some(path) = lookup("SNAPSHOT_PATH") {
        if !path.trim().is_empty() {
            config.snapshot_path = Some(PathBuf::from(path.trim()));
        }
    }

    if let Some(timeout) = lookup("CRAWL_TIMEOUT_SECS") {
        if let Ok(secs) = timeout.trim().parse() {
            config.http.timeout_secs = Some(secs);
        }
    }

    if let Some(agent) = lookup("USER_AGENT") {
        if !agent.trim().is_empty() {
            config.http.user_agent = agent;
        }
    }
}
