// src/lib.rs

//! Room Crawler Library
//!
//! Scrapes a rental listings page, compares it with the previous snapshot
//! and reports added, updated and removed rooms.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
