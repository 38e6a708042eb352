use std::fmt;

use chrono::NaiveDate;

/// An entry the store refused to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub link: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublisherOutcome {
    /// Fingerprint matched the stored hash.
    Unchanged,
    /// Feed changed; recent entries were stored and the hash advanced.
    Updated {
        /// Titles of the entries inserted, in feed order.
        added: Vec<String>,
        /// Entries already stored for this publisher.
        duplicates: usize,
        failed: Vec<EntryFailure>,
    },
    /// The feed could not be fetched or parsed. Nothing was written.
    FeedUnavailable { reason: String },
    /// A store error stopped this publisher's refresh.
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct PublisherReport {
    pub id: i64,
    pub name: String,
    pub outcome: PublisherOutcome,
}

impl fmt::Display for PublisherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            PublisherOutcome::Unchanged => write!(f, "{}: unchanged", self.name),
            PublisherOutcome::Updated {
                added,
                duplicates,
                failed,
            } => {
                write!(
                    f,
                    "{}: updated ({} added, {} failed",
                    self.name,
                    added.len(),
                    failed.len()
                )?;
                if *duplicates > 0 {
                    write!(f, ", {} already stored", duplicates)?;
                }
                write!(f, ")")
            }
            PublisherOutcome::FeedUnavailable { reason } => {
                write!(f, "{}: feed unavailable ({})", self.name, reason)
            }
            PublisherOutcome::Failed { reason } => write!(f, "{}: error ({})", self.name, reason),
        }
    }
}

/// Result of one refresh cycle, one line per publisher in processing order.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub cutoff: NaiveDate,
    pub publishers: Vec<PublisherReport>,
}

impl RefreshReport {
    pub fn new(cutoff: NaiveDate) -> Self {
        Self {
            cutoff,
            publishers: Vec::new(),
        }
    }

    pub fn push(&mut self, id: i64, name: String, outcome: PublisherOutcome) {
        self.publishers.push(PublisherReport { id, name, outcome });
    }

    pub fn outcome(&self, id: i64) -> Option<&PublisherOutcome> {
        self.publishers
            .iter()
            .find(|p| p.id == id)
            .map(|p| &p.outcome)
    }

    pub fn total_added(&self) -> usize {
        self.publishers
            .iter()
            .map(|p| match &p.outcome {
                PublisherOutcome::Updated { added, .. } => added.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn total_failed(&self) -> usize {
        self.publishers
            .iter()
            .map(|p| match &p.outcome {
                PublisherOutcome::Updated { failed, .. } => failed.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn unavailable_count(&self) -> usize {
        self.publishers
            .iter()
            .filter(|p| matches!(p.outcome, PublisherOutcome::FeedUnavailable { .. }))
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.publishers
            .iter()
            .filter(|p| matches!(p.outcome, PublisherOutcome::Failed { .. }))
            .count()
    }

    /// Human-readable report. `verbose` also lists inserted titles and
    /// rejected entries.
    pub fn render(&self, verbose: bool) -> String {
        let mut out = String::new();

        for publisher in &self.publishers {
            out.push_str(&publisher.to_string());
            out.push('\n');

            if !verbose {
                continue;
            }
            if let PublisherOutcome::Updated { added, failed, .. } = &publisher.outcome {
                for title in added {
                    out.push_str(&format!("  + {}\n", title));
                }
                for failure in failed {
                    out.push_str(&format!("  ! {} ({})\n", failure.link, failure.reason));
                }
            }
        }

        out.push_str(&format!(
            "Refresh complete: {} publishers, {} new entries since {}, {} failed inserts, {} unavailable feeds, {} errors",
            self.publishers.len(),
            self.total_added(),
            self.cutoff,
            self.total_failed(),
            self.unavailable_count(),
            self.error_count()
        ));
        out
    }
}
