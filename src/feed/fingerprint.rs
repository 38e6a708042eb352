use sha2::{Digest, Sha256};

use crate::app::Result;
use crate::feed::load_feed;
use crate::fetcher::Fetcher;
use crate::normalizer::{FeedEntry, Normalizer};

/// Hex SHA-256 over the canonical form of every entry, in feed order.
pub fn digest_entries(entries: &[FeedEntry]) -> String {
    let mut hasher = Sha256::new();
    for entry in entries {
        let canonical = entry.canonical();
        // Length prefix keeps entry boundaries unambiguous.
        hasher.update((canonical.len() as u64).to_be_bytes());
        hasher.update(canonical.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Fingerprint the current entry set of the feed at `url`.
pub async fn fingerprint(
    fetcher: &(dyn Fetcher + Send + Sync),
    normalizer: &Normalizer,
    url: &str,
) -> Result<String> {
    let feed = load_feed(fetcher, normalizer, url).await?;
    let digest = digest_entries(&feed.entries);
    tracing::debug!("Fingerprint of {} ({} entries): {}", url, feed.entries.len(), digest);
    Ok(digest)
}
