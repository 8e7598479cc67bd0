// src/error.rs

//! Unified error handling for the room crawler.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Service account payload or token exchange failed
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Listing page could not be fetched or parsed
    #[error("failed to fetch listings: {0}")]
    Fetch(String),

    /// Snapshot could not be read or written
    #[error("failed to {context} snapshot: {message}")]
    Store { context: String, message: String },

    /// Webhook delivery failed
    #[error("failed to notify: {0}")]
    Notify(String),

    /// Independent failures collected within one run
    #[error("{}", join_lines(.0))]
    Aggregate(Vec<AppError>),

    /// Reporting a failure through the notifier failed as well
    #[error("failed to notify err. notify err: {notify}, err: {original}")]
    Escalation {
        notify: Box<AppError>,
        original: Box<AppError>,
    },
}

fn join_lines(errors: &[AppError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a credentials error.
    pub fn credentials(message: impl fmt::Display) -> Self {
        Self::Credentials(message.to_string())
    }

    /// Create a fetch error.
    pub fn fetch(message: impl fmt::Display) -> Self {
        Self::Fetch(message.to_string())
    }

    /// Create a snapshot store error with context (`load` or `save`).
    pub fn store(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Store {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a notification error.
    pub fn notify(message: impl fmt::Display) -> Self {
        Self::Notify(message.to_string())
    }

    /// Combine a failed error report with the error it was reporting.
    pub fn escalation(notify: AppError, original: AppError) -> Self {
        Self::Escalation {
            notify: Box::new(notify),
            original: Box::new(original),
        }
    }
}
