//! Service layer for the room crawler.
//!
//! - Listing extraction (`ListingCrawler`)
//! - Webhook notification (`SlackNotifier`)

mod listings;
mod notifier;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Diff, Listing};

pub use listings::{ListingCrawler, parse_listings};
pub use notifier::{SlackNotifier, render_diff, render_error};

/// Source of the current listings.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch every listing currently on the page, in page order.
    async fn fetch_listings(&self) -> Result<Vec<Listing>>;
}

/// Channel that receives diff reports and failure alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Report added, updated and removed listings.
    async fn notify_diff(&self, diff: &Diff) -> Result<()>;

    /// Report a failed run.
    async fn notify_error(&self, error: &AppError) -> Result<()>;
}
