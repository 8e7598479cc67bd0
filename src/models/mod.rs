// src/models/mod.rs

//! Domain models for the room crawler.

mod config;
mod diff;
mod listing;

// Re-export all public types
pub use config::{
    Config, HttpConfig, ListingSelectors, NotifierConfig, ServerConfig, SheetsConfig,
    SourceConfig,
};
pub use diff::Diff;
pub use listing::{Listing, ListingPair};
