//! Diff between two listing sets.

use super::{Listing, ListingPair};

/// Added, updated and removed listings between two runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Listings whose id is absent from the previous set
    pub added: Vec<Listing>,
    /// Listings present in both sets with at least one differing field
    pub updated: Vec<ListingPair>,
    /// Listings whose id is absent from the current set
    pub removed: Vec<Listing>,
}

impl Diff {
    /// Check if there are any changes.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}
