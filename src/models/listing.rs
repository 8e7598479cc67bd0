//! Listing data structures.

use serde::{Deserialize, Serialize};

/// One rental unit scraped from the listings page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    /// Stable identifier assigned by the listing site
    pub id: String,

    /// Property title (multiple fragments joined with a space)
    pub title: String,

    /// Rent, as displayed
    pub price: String,

    /// Floor plan, as displayed (e.g. "1K")
    pub layout: String,

    /// Floor area, as displayed
    pub size: String,
}

impl Listing {
    /// Build the detail page URL for this listing.
    ///
    /// `{id}` in the template is replaced with the listing id.
    pub fn url(&self, template: &str) -> String {
        template.replace("{id}", &self.id)
    }

    /// Fields in snapshot column order.
    pub fn to_row(&self) -> [&str; 5] {
        [
            self.id.as_str(),
            self.title.as_str(),
            self.price.as_str(),
            self.layout.as_str(),
            self.size.as_str(),
        ]
    }
}

/// A listing that exists in both the current and previous set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPair {
    pub new: Listing,
    pub old: Listing,
}

impl ListingPair {
    /// Whether any field differs between the two versions.
    pub fn has_diff(&self) -> bool {
        self.new != self.old
    }
}
