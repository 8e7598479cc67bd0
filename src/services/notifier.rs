// src/services/notifier.rs

//! Webhook notifier.
//!
//! Renders diffs and errors as Slack section blocks and posts them as a
//! form-encoded `payload` field.

use async_trait::async_trait;
use reqwest::Client;
use slack_morphism::prelude::*;

use crate::error::{AppError, Result};
use crate::models::{Diff, Listing};
use crate::services::Notifier;

/// Notifier posting to a Slack-compatible incoming webhook.
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
    listing_url_template: String,
}

impl SlackNotifier {
    pub fn new(
        client: Client,
        webhook_url: impl Into<String>,
        listing_url_template: impl Into<String>,
    ) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
            listing_url_template: listing_url_template.into(),
        }
    }

    async fn post(&self, payload: &SlackMessageContent) -> Result<()> {
        let payload = serde_json::to_string(payload)?;
        log::debug!("Webhook payload: {}", payload);

        self.client
            .post(&self.webhook_url)
            .form(&[("payload", payload.as_str())])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify_diff(&self, diff: &Diff) -> Result<()> {
        let payload = render_diff(diff, &self.listing_url_template);
        self.post(&payload).await.map_err(AppError::notify)
    }

    async fn notify_error(&self, error: &AppError) -> Result<()> {
        let payload = render_error(error);
        self.post(&payload).await.map_err(AppError::notify)
    }
}

/// Render a diff as message blocks: added, then updated, then removed.
pub fn render_diff(diff: &Diff, url_template: &str) -> SlackMessageContent {
    let added = diff.added.iter().map(|l| added_text(l, url_template));
    let updated = diff
        .updated
        .iter()
        .map(|p| updated_text(&p.new, url_template));
    let removed = diff.removed.iter().map(removed_text);

    let blocks: Vec<SlackBlock> = added.chain(updated).chain(removed).map(section).collect();

    SlackMessageContent::new().with_blocks(blocks)
}

/// Render an error as a single message block.
pub fn render_error(error: &AppError) -> SlackMessageContent {
    SlackMessageContent::new().with_blocks(vec![section(error.to_string())])
}

fn added_text(listing: &Listing, url_template: &str) -> String {
    format!(
        "New: {}\n{} {} {}\n{}",
        listing.title,
        listing.price,
        listing.layout,
        listing.size,
        listing.url(url_template)
    )
}

fn updated_text(listing: &Listing, url_template: &str) -> String {
    format!(
        "Updated: {}\n{}\n{}",
        listing.title,
        listing.price,
        listing.url(url_template)
    )
}

fn removed_text(listing: &Listing) -> String {
    format!("Removed: {}", listing.title)
}

fn section(text: String) -> SlackBlock {
    SlackSectionBlock::new().with_text(md!(text)).into()
}
