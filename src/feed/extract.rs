use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::app::Result;
use crate::domain::Entry;
use crate::feed::load_feed;
use crate::fetcher::Fetcher;
use crate::normalizer::{FeedEntry, Normalizer};

/// How far down the feed extraction looks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// Stop at the first entry not newer than the cutoff. Only correct for
    /// feeds listed newest first.
    #[default]
    StopAtFirstOld,
    /// Check every entry. Handles feeds in any order.
    FullScan,
}

const UNTITLED: &str = "(Untitled)";

fn is_newer(entry: &FeedEntry, cutoff: DateTime<Utc>) -> bool {
    entry.timestamp().is_some_and(|ts| ts > cutoff)
}

/// Pick the entries published after `cutoff` and turn them into
/// [`Entry`] rows for `publisher_id`, keeping feed order.
///
/// Entries without a timestamp never count as newer. Newer entries with no
/// link are dropped.
pub fn select_recent(
    entries: &[FeedEntry],
    publisher_id: i64,
    cutoff: NaiveDate,
    mode: ScanMode,
) -> Vec<Entry> {
    let cutoff = cutoff.and_time(NaiveTime::MIN).and_utc();
    let mut recent = Vec::new();

    for entry in entries {
        if !is_newer(entry, cutoff) {
            match mode {
                ScanMode::StopAtFirstOld => break,
                ScanMode::FullScan => continue,
            }
        }

        let Some(link) = entry.link.clone() else {
            tracing::warn!("Skipping entry {:?} without a link", entry.title);
            continue;
        };

        recent.push(Entry {
            title: entry.title.clone().unwrap_or_else(|| UNTITLED.to_string()),
            link,
            publisher: publisher_id,
            date: entry.timestamp().map(|ts| ts.date_naive()),
        });
    }

    recent
}

/// Fetch the feed at `url` and return its entries newer than `cutoff`.
pub async fn extract_recent_entries(
    fetcher: &(dyn Fetcher + Send + Sync),
    normalizer: &Normalizer,
    url: &str,
    publisher_id: i64,
    cutoff: NaiveDate,
    mode: ScanMode,
) -> Result<Vec<Entry>> {
    let feed = load_feed(fetcher, normalizer, url).await?;
    let recent = select_recent(&feed.entries, publisher_id, cutoff, mode);
    tracing::debug!(
        "{} of {} entries in {} are newer than {}",
        recent.len(),
        feed.entries.len(),
        url,
        cutoff
    );
    Ok(recent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ContentError;
    use crate::fetcher::memory::{rss_fixture, MemoryFetcher};
    use chrono::{Days, TimeZone};

    const FEED: &str = "https://example.com/rss";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn days_ago(n: u64) -> DateTime<Utc> {
        let day = today() - Days::new(n);
        Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
    }

    fn cutoff() -> NaiveDate {
        today() - Days::new(7)
    }

    fn feed_entry(title: &str, link: Option<&str>, ts: Option<DateTime<Utc>>) -> FeedEntry {
        FeedEntry {
            title: Some(title.to_string()),
            link: link.map(String::from),
            summary: None,
            content: None,
            authors: Vec::new(),
            published: ts,
            updated: None,
        }
    }

    #[tokio::test]
    async fn test_extract_respects_cutoff_and_order() {
        let fetcher = MemoryFetcher::new();
        fetcher.serve(
            FEED,
            rss_fixture(&[
                ("Today", "https://example.com/today", days_ago(0)),
                ("Three days", "https://example.com/three", days_ago(3)),
                ("Ten days", "https://example.com/ten", days_ago(10)),
            ]),
        );

        let entries = extract_recent_entries(
            &fetcher,
            &Normalizer::new(),
            FEED,
            7,
            cutoff(),
            ScanMode::StopAtFirstOld,
        )
        .await
        .unwrap();

        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Today", "Three days"]);
        assert!(entries.iter().all(|e| e.publisher == 7));
        assert_eq!(entries[0].date, Some(today()));
        assert_eq!(entries[1].link, "https://example.com/three");
    }

    #[tokio::test]
    async fn test_extract_all_old_is_empty() {
        let fetcher = MemoryFetcher::new();
        fetcher.serve(
            FEED,
            rss_fixture(&[
                ("Ten days", "https://example.com/ten", days_ago(10)),
                ("Twenty days", "https://example.com/twenty", days_ago(20)),
            ]),
        );

        let entries = extract_recent_entries(
            &fetcher,
            &Normalizer::new(),
            FEED,
            1,
            cutoff(),
            ScanMode::StopAtFirstOld,
        )
        .await
        .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_extract_empty_feed() {
        let fetcher = MemoryFetcher::new();
        fetcher.serve(FEED, rss_fixture(&[]));

        let entries = extract_recent_entries(
            &fetcher,
            &Normalizer::new(),
            FEED,
            1,
            cutoff(),
            ScanMode::FullScan,
        )
        .await
        .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_extract_unreachable_feed() {
        let fetcher = MemoryFetcher::new();
        let err = extract_recent_entries(
            &fetcher,
            &Normalizer::new(),
            FEED,
            1,
            cutoff(),
            ScanMode::StopAtFirstOld,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ContentError::FeedUnavailable { .. }));
    }

    #[test]
    fn test_stop_mode_misses_entries_after_old_one() {
        let entries = vec![
            feed_entry("New", Some("https://example.com/new"), Some(days_ago(1))),
            feed_entry("Old", Some("https://example.com/old"), Some(days_ago(30))),
            feed_entry("Late", Some("https://example.com/late"), Some(days_ago(2))),
        ];

        let stop = select_recent(&entries, 1, cutoff(), ScanMode::StopAtFirstOld);
        assert_eq!(stop.len(), 1);

        let full = select_recent(&entries, 1, cutoff(), ScanMode::FullScan);
        let titles: Vec<&str> = full.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Late"]);
    }

    #[test]
    fn test_cutoff_day_counts_as_newer_after_midnight() {
        let morning = Utc.from_utc_datetime(&cutoff().and_hms_opt(6, 0, 0).unwrap());
        let midnight = Utc.from_utc_datetime(&cutoff().and_hms_opt(0, 0, 0).unwrap());
        let entries = vec![
            feed_entry("Morning", Some("https://example.com/m"), Some(morning)),
            feed_entry("Midnight", Some("https://example.com/0"), Some(midnight)),
        ];

        let recent = select_recent(&entries, 1, cutoff(), ScanMode::StopAtFirstOld);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "Morning");
    }

    #[test]
    fn test_undated_entry_is_not_newer() {
        let entries = vec![
            feed_entry("Undated", Some("https://example.com/u"), None),
            feed_entry("New", Some("https://example.com/new"), Some(days_ago(1))),
        ];

        assert!(select_recent(&entries, 1, cutoff(), ScanMode::StopAtFirstOld).is_empty());
        assert_eq!(
            select_recent(&entries, 1, cutoff(), ScanMode::FullScan).len(),
            1
        );
    }

    #[test]
    fn test_linkless_entry_is_skipped_without_stopping() {
        let mut untitled = feed_entry("x", Some("https://example.com/x"), Some(days_ago(2)));
        untitled.title = None;
        let entries = vec![
            feed_entry("No link", None, Some(days_ago(1))),
            untitled,
        ];

        let recent = select_recent(&entries, 1, cutoff(), ScanMode::StopAtFirstOld);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "(Untitled)");
    }
}
