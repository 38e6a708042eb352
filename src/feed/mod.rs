//! Feed-side operations of the refresh cycle: fingerprinting a feed and
//! pulling its recent entries.

pub mod extract;
pub mod fingerprint;

pub use extract::{extract_recent_entries, select_recent, ScanMode};
pub use fingerprint::{digest_entries, fingerprint};

use crate::app::{ContentError, Result};
use crate::fetcher::Fetcher;
use crate::normalizer::{Normalizer, ParsedFeed};

/// Fetch and parse `url`. Any failure on the way is reported as
/// [`ContentError::FeedUnavailable`].
pub async fn load_feed(
    fetcher: &(dyn Fetcher + Send + Sync),
    normalizer: &Normalizer,
    url: &str,
) -> Result<ParsedFeed> {
    let body = fetcher
        .fetch(url)
        .await
        .map_err(|e| ContentError::feed_unavailable(url, e))?;

    let feed = normalizer
        .normalize(&body)
        .map_err(|e| ContentError::feed_unavailable(url, e))?;

    tracing::debug!(
        "Parsed {:?} from {}: {} entries",
        feed.title.as_deref().unwrap_or("(untitled feed)"),
        url,
        feed.entries.len()
    );
    Ok(feed)
}
