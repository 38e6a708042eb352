//! The weekly refresh cycle.
//!
//! For every publisher the current feed fingerprint is compared with the
//! stored hash. A changed feed has its recent entries inserted and the hash
//! advanced, even when some inserts fail, so rejected entries are not
//! retried forever. Publishers are processed one at a time and a failure
//! in one never stops the others.

pub mod report;

pub use report::{EntryFailure, PublisherOutcome, PublisherReport, RefreshReport};

use chrono::{Days, Local, NaiveDate};

use crate::app::{ContentError, Result};
use crate::domain::PublisherHash;
use crate::feed::{digest_entries, load_feed, select_recent, ScanMode};
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::store::Store;

pub const DEFAULT_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone)]
pub struct RefreshOptions {
    /// Entries older than this many days before `today` are already seen.
    pub window_days: u64,
    pub scan_mode: ScanMode,
    /// Reference date; the local date when `None`.
    pub today: Option<NaiveDate>,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            scan_mode: ScanMode::default(),
            today: None,
        }
    }
}

impl RefreshOptions {
    pub fn cutoff(&self) -> NaiveDate {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        today - Days::new(self.window_days)
    }
}

pub struct Refresher<'a, S: Store + ?Sized> {
    store: &'a S,
    fetcher: &'a (dyn Fetcher + Send + Sync),
    normalizer: Normalizer,
    options: RefreshOptions,
}

impl<'a, S: Store + ?Sized> Refresher<'a, S> {
    pub fn new(
        store: &'a S,
        fetcher: &'a (dyn Fetcher + Send + Sync),
        options: RefreshOptions,
    ) -> Self {
        Self {
            store,
            fetcher,
            normalizer: Normalizer::new(),
            options,
        }
    }

    pub fn options(&self) -> &RefreshOptions {
        &self.options
    }

    /// Refresh every publisher. Fails only if the publisher list itself
    /// cannot be read; per-publisher problems land in the report.
    pub async fn refresh_all(&self) -> Result<RefreshReport> {
        let publishers = self.store.get_publisher_hashes()?;
        let cutoff = self.options.cutoff();
        let mut report = RefreshReport::new(cutoff);

        tracing::info!(
            "Refreshing {} publishers, cutoff {}",
            publishers.len(),
            cutoff
        );

        for publisher in publishers {
            let outcome = self.refresh_publisher(&publisher, cutoff).await;
            report.push(publisher.id, publisher.name, outcome);
        }

        Ok(report)
    }

    async fn refresh_publisher(
        &self,
        publisher: &PublisherHash,
        cutoff: NaiveDate,
    ) -> PublisherOutcome {
        // One read per publisher: the stored hash must describe the same
        // document the entries came from.
        let feed = match load_feed(self.fetcher, &self.normalizer, &publisher.rss).await {
            Ok(feed) => feed,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", publisher.name, e);
                return PublisherOutcome::FeedUnavailable {
                    reason: e.to_string(),
                };
            }
        };
        let current = digest_entries(&feed.entries);

        if !publisher.is_changed(&current) {
            tracing::info!("{} has not published anything new", publisher.name);
            return PublisherOutcome::Unchanged;
        }

        tracing::info!("{} has published something new", publisher.name);

        let entries = select_recent(
            &feed.entries,
            publisher.id,
            cutoff,
            self.options.scan_mode,
        );

        let mut added = Vec::new();
        let mut duplicates = 0;
        let mut failed = Vec::new();

        for entry in entries {
            match self.store.add_entry(&entry) {
                Ok(true) => added.push(entry.title),
                Ok(false) => duplicates += 1,
                Err(ContentError::ConstraintViolation(reason)) => {
                    tracing::warn!("Could not store entry {}: {}", entry.link, reason);
                    failed.push(EntryFailure {
                        link: entry.link,
                        reason,
                    });
                }
                Err(e) => {
                    tracing::error!("Refresh of {} aborted: {}", publisher.name, e);
                    return PublisherOutcome::Failed {
                        reason: e.to_string(),
                    };
                }
            }
        }

        // Advance even after failed inserts so the same rejected entries are
        // not reprocessed every cycle.
        if let Err(e) = self.store.update_publisher_hash(publisher.id, &current) {
            tracing::error!("Could not advance hash for {}: {}", publisher.name, e);
            return PublisherOutcome::Failed {
                reason: e.to_string(),
            };
        }

        PublisherOutcome::Updated {
            added,
            duplicates,
            failed,
        }
    }
}
