//! Google Sheets snapshot storage.
//!
//! Talks to the Sheets v4 REST API with a service account:
//!
//! 1. Sign an RS256 JWT assertion with the account's private key
//! 2. Exchange it for an access token at the account's `token_uri`
//! 3. Read the range with `values.get`, or replace it with
//!    `values:batchClear` followed by `values:batchUpdate`

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use ring::rand::SystemRandom;
use ring::signature::{RSA_PKCS1_SHA256, RsaKeyPair};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Listing, SheetsConfig};
use crate::storage::SnapshotStore;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Number of columns in a snapshot row.
pub const ROW_WIDTH: usize = 5;

/// Prefix that keeps the sheet from reinterpreting ids as numbers.
const TEXT_MARKER: &str = "'";

/// Fields of a service account key file that are needed here.
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Snapshot backend storing one listing per spreadsheet row.
pub struct SheetsStore {
    client: Client,
    config: SheetsConfig,
    token: Mutex<Option<CachedToken>>,
}

impl SheetsStore {
    /// Create a new store. Credentials are parsed on first use.
    pub fn new(client: Client, config: SheetsConfig) -> Self {
        Self {
            client,
            config,
            token: Mutex::new(None),
        }
    }

    /// Return a valid access token, exchanging a fresh assertion if needed.
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref() {
            if token.expires_at > now {
                return Ok(token.value.clone());
            }
        }

        let key: ServiceAccountKey = serde_json::from_str(&self.config.credentials_json)
            .map_err(|e| AppError::credentials(format!("invalid service account JSON: {e}")))?;
        let assertion = sign_assertion(&key, &self.config.scope, now)?;

        let response: TokenResponse = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| AppError::credentials(format!("token exchange failed: {e}")))?
            .json()
            .await?;

        let lifetime = (response.expires_in - TOKEN_REFRESH_MARGIN_SECS).max(0);
        let token = CachedToken {
            value: response.access_token,
            expires_at: now + Duration::seconds(lifetime),
        };
        log::debug!("Obtained access token for {}", key.client_email);

        *cached = Some(token.clone());
        Ok(token.value)
    }

    /// Build `{base}/v4/spreadsheets/{id}/values/{last}`.
    fn values_url(&self, last: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_base_url)?;
        url.path_segments_mut()
            .map_err(|_| AppError::config("sheets.api_base_url cannot be a base URL"))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.config.spreadsheet_id.as_str(),
                "values",
                last,
            ]);
        Ok(url)
    }

    /// Build `{base}/v4/spreadsheets/{id}/values:{method}`.
    fn batch_url(&self, method: &str) -> Result<Url> {
        let last = format!("values:{method}");
        let mut url = Url::parse(&self.config.api_base_url)?;
        url.path_segments_mut()
            .map_err(|_| AppError::config("sheets.api_base_url cannot be a base URL"))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.config.spreadsheet_id.as_str(),
                last.as_str(),
            ]);
        Ok(url)
    }

    async fn read_rows(&self) -> Result<Vec<Listing>> {
        let token = self.access_token().await?;
        let range: ValueRange = self
            .client
            .get(self.values_url(&self.config.range)?)
            .bearer_auth(&token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let listings = parse_rows(range.values);
        log::info!(
            "Loaded {} listings from {}",
            listings.len(),
            self.config.range
        );
        Ok(listings)
    }

    async fn write_rows(&self, listings: &[Listing]) -> Result<()> {
        let token = self.access_token().await?;

        self.client
            .post(self.batch_url("batchClear")?)
            .bearer_auth(&token)
            .json(&json!({ "ranges": [self.config.range] }))
            .send()
            .await?
            .error_for_status()?;

        if listings.is_empty() {
            log::info!("Cleared {}; no listings to write", self.config.range);
            return Ok(());
        }

        let body = json!({
            "valueInputOption": "USER_ENTERED",
            "data": [{
                "range": self.config.range,
                "values": to_rows(listings),
            }]
        });

        self.client
            .post(self.batch_url("batchUpdate")?)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        log::info!(
            "Wrote {} listings to {}",
            listings.len(),
            self.config.range
        );
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for SheetsStore {
    async fn load_snapshot(&self) -> Result<Vec<Listing>> {
        self.read_rows().await.map_err(|e| AppError::store("load", e))
    }

    async fn save_snapshot(&self, listings: &[Listing]) -> Result<()> {
        self.write_rows(listings)
            .await
            .map_err(|e| AppError::store("save", e))
    }
}

/// Decode sheet rows into listings.
///
/// A row that does not hold exactly five text cells is skipped with a
/// warning naming its sheet row (data starts at row 2).
pub fn parse_rows(rows: Vec<Vec<Value>>) -> Vec<Listing> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let listing = parse_row(&row);
            if listing.is_none() {
                log::warn!("row {} is malformed: {:?}", index + 2, row);
            }
            listing
        })
        .collect()
}

fn parse_row(row: &[Value]) -> Option<Listing> {
    let [id, title, price, layout, size] = row else {
        return None;
    };
    Some(Listing {
        id: id.as_str()?.to_string(),
        title: title.as_str()?.to_string(),
        price: price.as_str()?.to_string(),
        layout: layout.as_str()?.to_string(),
        size: size.as_str()?.to_string(),
    })
}

/// Encode listings as sheet rows, marking ids as text.
pub fn to_rows(listings: &[Listing]) -> Vec<[String; ROW_WIDTH]> {
    listings
        .iter()
        .map(|listing| {
            let [id, title, price, layout, size] = listing.to_row();
            [
                format!("{TEXT_MARKER}{id}"),
                title.to_string(),
                price.to_string(),
                layout.to_string(),
                size.to_string(),
            ]
        })
        .collect()
}

/// Build and sign the JWT assertion for the token exchange.
fn sign_assertion(key: &ServiceAccountKey, scope: &str, now: DateTime<Utc>) -> Result<String> {
    let iat = now.timestamp();
    let claims = Claims {
        iss: &key.client_email,
        scope,
        aud: &key.token_uri,
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };
    let signing_input = signing_input(&claims)?;

    let der = decode_pem(&key.private_key)?;
    let key_pair = RsaKeyPair::from_pkcs8(&der)
        .map_err(|e| AppError::credentials(format!("invalid private key: {e}")))?;

    let mut signature = vec![0; key_pair.public().modulus_len()];
    key_pair
        .sign(
            &RSA_PKCS1_SHA256,
            &SystemRandom::new(),
            signing_input.as_bytes(),
            &mut signature,
        )
        .map_err(|e| AppError::credentials(format!("failed to sign assertion: {e}")))?;

    Ok(format!(
        "{}.{}",
        signing_input,
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

/// `base64url(header).base64url(claims)`
fn signing_input(claims: &Claims) -> Result<String> {
    let header = json!({ "alg": "RS256", "typ": "JWT" });
    Ok(format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?)
    ))
}

/// Decode a PEM block into DER bytes.
fn decode_pem(pem: &str) -> Result<Vec<u8>> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect();

    if body.is_empty() {
        return Err(AppError::credentials("private key is empty"));
    }

    STANDARD
        .decode(body)
        .map_err(|e| AppError::credentials(format!("private key is not valid base64: {e}")))
}
