//! Snapshot persistence.
//!
//! The snapshot is the full listing set from the previous run. It is always
//! replaced wholesale; there are no partial updates.
//!
//! Writers are not coordinated. Two overlapping runs may interleave their
//! clear and write steps, so callers must keep to a single writer.
//!
//! ## Backends
//!
//! - `SheetsStore`: rows `A2:E…` of a Google spreadsheet (id, title, price,
//!   layout, size); row 1 is left to a header.
//! - `LocalStorage`: a JSON array on disk, for development.

pub mod local;
pub mod sheets;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Listing;

// Re-export for convenience
pub use local::LocalStorage;
pub use sheets::SheetsStore;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the listings written by the previous run.
    async fn load_snapshot(&self) -> Result<Vec<Listing>>;

    /// Replace the stored snapshot with `listings`.
    async fn save_snapshot(&self, listings: &[Listing]) -> Result<()>;
}
