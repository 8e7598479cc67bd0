// src/pipeline/pipeline.rs

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::{ListingCrawler, ListingSource, Notifier, SlackNotifier};
use crate::storage::{LocalStorage, SheetsStore, SnapshotStore};
use crate::utils::http;

use super::diff::compute_diff;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Current listings match the snapshot; nothing was sent or written
    NoChanges,
    /// Changes were reported and the snapshot was replaced
    Reported {
        added: usize,
        updated: usize,
        removed: usize,
    },
}

/// The three collaborators of a run.
pub struct Pipeline {
    source: Box<dyn ListingSource>,
    store: Box<dyn SnapshotStore>,
    notifier: Box<dyn Notifier>,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn ListingSource>,
        store: Box<dyn SnapshotStore>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
        }
    }

    /// Wire the production collaborators from configuration.
    ///
    /// Uses the local JSON store when `snapshot_path` is set, Google Sheets
    /// otherwise.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = http::create_async_client(&config.http)?;

        let source = ListingCrawler::new(
            client.clone(),
            config.source.url.clone(),
            config.source.selectors.clone(),
        );

        let store: Box<dyn SnapshotStore> = match &config.snapshot_path {
            Some(path) => {
                log::info!("Using local snapshot at {}", path.display());
                Box::new(LocalStorage::new(path))
            }
            None => Box::new(SheetsStore::new(client.clone(), config.sheets.clone())),
        };

        let notifier = SlackNotifier::new(
            client,
            config.notifier.webhook_url.clone(),
            config.notifier.listing_url_template.clone(),
        );

        Ok(Self::new(Box::new(source), store, Box::new(notifier)))
    }

    /// Run one crawl: fetch, load, diff, then notify and save.
    ///
    /// Fetch and load failures abort the run. Notify and save are both
    /// attempted once a diff exists, and their failures are returned together.
    pub async fn execute(&self) -> Result<RunOutcome> {
        let current = self.source.fetch_listings().await?;
        let previous = self.store.load_snapshot().await?;

        let Some(diff) = compute_diff(&current, &previous) else {
            log::info!("no diff detected.");
            return Ok(RunOutcome::NoChanges);
        };

        log::info!(
            "Diff detected: {} added, {} updated, {} removed",
            diff.added.len(),
            diff.updated.len(),
            diff.removed.len()
        );

        let mut errors = Vec::new();

        if let Err(e) = self.notifier.notify_diff(&diff).await {
            log::error!("{}", e);
            errors.push(e);
        }

        if let Err(e) = self.store.save_snapshot(&current).await {
            log::error!("{}", e);
            errors.push(e);
        }

        if !errors.is_empty() {
            return Err(AppError::Aggregate(errors));
        }

        Ok(RunOutcome::Reported {
            added: diff.added.len(),
            updated: diff.updated.len(),
            removed: diff.removed.len(),
        })
    }

    /// Forward a failed run to the notifier.
    ///
    /// Returns the original error, or an `Escalation` carrying both errors
    /// when the alert could not be delivered either.
    pub async fn report(&self, error: AppError) -> AppError {
        match self.notifier.notify_error(&error).await {
            Ok(()) => error,
            Err(notify_err) => {
                let escalated = AppError::escalation(notify_err, error);
                log::error!("{}", escalated);
                escalated
            }
        }
    }
}
