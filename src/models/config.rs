//! Application configuration structures.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Listings page and extraction rules
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP client settings shared by all outbound calls
    #[serde(default)]
    pub http: HttpConfig,

    /// Google Sheets snapshot settings
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Webhook notification settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// HTTP entry point settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Local JSON snapshot file; replaces Google Sheets when set
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate tunable values for basic sanity.
    ///
    /// Endpoints and credentials are not checked here; a missing value
    /// surfaces as a failure of the component that needs it.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("http.user_agent is empty"));
        }
        if self.http.timeout_secs == Some(0) {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        if self.sheets.range.trim().is_empty() {
            return Err(AppError::config("sheets.range is empty"));
        }
        if !self.notifier.listing_url_template.contains("{id}") {
            return Err(AppError::config(
                "notifier.listing_url_template must contain {id}",
            ));
        }
        Ok(())
    }
}

/// Listings page location and CSS selectors.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceConfig {
    /// URL of the listings page
    #[serde(default)]
    pub url: String,

    /// Extraction rules
    #[serde(default)]
    pub selectors: ListingSelectors,
}

/// Selectors and labels used to pull listings out of the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// CSS selector for one listing item
    #[serde(default = "defaults::item_selector")]
    pub item_selector: String,

    /// Attribute carrying the listing id; items without it are skipped
    #[serde(default = "defaults::id_attr")]
    pub id_attr: String,

    /// CSS selector for title fragments
    #[serde(default = "defaults::title_selector")]
    pub title_selector: String,

    /// CSS selector for the price container
    #[serde(default = "defaults::price_selector")]
    pub price_selector: String,

    /// Label text preceding the layout value
    #[serde(default = "defaults::layout_label")]
    pub layout_label: String,

    /// Label text preceding the size value
    #[serde(default = "defaults::size_label")]
    pub size_label: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            item_selector: defaults::item_selector(),
            id_attr: defaults::id_attr(),
            title_selector: defaults::title_selector(),
            price_selector: defaults::price_selector(),
            layout_label: defaults::layout_label(),
            size_label: defaults::size_label(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; the client's own default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: None,
        }
    }
}

/// Google Sheets snapshot settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Target spreadsheet id
    #[serde(default)]
    pub spreadsheet_id: String,

    /// Service account key (JSON)
    #[serde(default, skip_serializing)]
    pub credentials_json: String,

    /// A1 range holding the snapshot rows
    #[serde(default = "defaults::sheet_range")]
    pub range: String,

    /// Sheets API base URL
    #[serde(default = "defaults::sheets_api_base")]
    pub api_base_url: String,

    /// OAuth scope requested for the service account
    #[serde(default = "defaults::sheets_scope")]
    pub scope: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            credentials_json: String::new(),
            range: defaults::sheet_range(),
            api_base_url: defaults::sheets_api_base(),
            scope: defaults::sheets_scope(),
        }
    }
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("credentials_json", &"<redacted>")
            .field("range", &self.range)
            .field("api_base_url", &self.api_base_url)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Webhook notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Incoming webhook URL
    #[serde(default)]
    pub webhook_url: String,

    /// Detail page template; `{id}` is replaced with the listing id
    #[serde(default = "defaults::listing_url_template")]
    pub listing_url_template: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            listing_url_template: defaults::listing_url_template(),
        }
    }
}

/// HTTP entry point settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: defaults::port(),
        }
    }
}

mod defaults {
    // Source defaults
    pub fn item_selector() -> String {
        "li.list-group-item".into()
    }
    pub fn id_attr() -> String {
        "data-id".into()
    }
    pub fn title_selector() -> String {
        "span.prop-title-link".into()
    }
    pub fn price_selector() -> String {
        "div.price".into()
    }
    pub fn layout_label() -> String {
        "間取り".into()
    }
    pub fn size_label() -> String {
        "専有面積".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; room-crawler/0.1)".into()
    }

    // Sheets defaults
    pub fn sheet_range() -> String {
        "sheet1!A2:E100".into()
    }
    pub fn sheets_api_base() -> String {
        "https://sheets.googleapis.com".into()
    }
    pub fn sheets_scope() -> String {
        "https://www.googleapis.com/auth/spreadsheets".into()
    }

    // Notifier defaults
    pub fn listing_url_template() -> String {
        "https://www.fudousan.or.jp/property/detail?p_no={id}".into()
    }

    // Server defaults
    pub fn port() -> u16 {
        8080
    }
}
