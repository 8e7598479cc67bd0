//! Utility functions and helpers.

pub mod http;

#[cfg(test)]
pub(crate) mod test_server;

/// Trim surrounding whitespace, including ideographic spaces.
pub fn clean_text(text: &str) -> String {
    text.trim().to_string()
}
