//! In-memory fetcher and RSS fixtures for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::app::{ContentError, Result};
use crate::fetcher::Fetcher;

#[derive(Default)]
pub struct MemoryFetcher {
    feeds: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.feeds
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
    }

    pub fn remove(&self, url: &str) {
        self.feeds.lock().unwrap().remove(url);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.feeds
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| ContentError::Other(format!("connection refused: {url}")))
    }
}

/// Render an RSS 2.0 document whose items carry `(title, link, pubDate)`.
pub fn rss_fixture(items: &[(&str, &str, DateTime<Utc>)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, link, date)| {
            format!(
                "    <item>\n      <title>{title}</title>\n      <link>{link}</link>\n      <guid>{link}</guid>\n      <pubDate>{}</pubDate>\n    </item>\n",
                date.to_rfc2822()
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Fixture Feed</title>
    <link>https://example.com</link>
    <description>Fixture</description>
{items}  </channel>
</rss>"#
    )
}
