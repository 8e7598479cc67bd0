//! Pipeline entry points for crawler operations.
//!
//! - `compute_diff`: Compare current listings against the snapshot
//! - `Pipeline`: Fetch, diff, notify and save in one run

pub mod diff;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use diff::compute_diff;
pub use pipeline::{Pipeline, RunOutcome};
