use chrono::{DateTime, Utc};
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{ContentError, Result};

/// One feed item reduced to the fields the refresh cycle looks at.
///
/// The parser's entry id is left out: for items without a guid or link it
/// is a fresh random UUID on every parse.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub authors: Vec<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl FeedEntry {
    /// Updated time, falling back to the publication time.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.updated.or(self.published)
    }

    /// Stable textual form of the entry, one field per line.
    pub fn canonical(&self) -> String {
        fn opt(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("")
        }
        fn time(value: &Option<DateTime<Utc>>) -> String {
            value.map(|t| t.to_rfc3339()).unwrap_or_default()
        }

        format!(
            "title:{}\nlink:{}\nsummary:{}\ncontent:{}\nauthors:{}\npublished:{}\nupdated:{}\n",
            opt(&self.title),
            opt(&self.link),
            opt(&self.summary),
            opt(&self.content),
            self.authors.join(","),
            time(&self.published),
            time(&self.updated),
        )
    }
}

#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub title: Option<String>,
    /// Entries in document order.
    pub entries: Vec<FeedEntry>,
}

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, body: &[u8]) -> Result<ParsedFeed> {
        let feed = parser::parse(body).map_err(|e| ContentError::FeedParse(e.to_string()))?;

        let entries = feed
            .entries
            .into_iter()
            .map(|entry| FeedEntry {
                title: entry
                    .title
                    .map(|t| decode_html_entities(t.content.trim()).to_string()),
                link: entry.links.first().map(|l| l.href.clone()),
                summary: entry
                    .summary
                    .map(|s| decode_html_entities(&s.content).to_string()),
                content: entry
                    .content
                    .and_then(|c| c.body)
                    .map(|b| decode_html_entities(&b).to_string()),
                authors: entry.authors.into_iter().map(|a| a.name).collect(),
                published: entry.published.map(|dt| dt.with_timezone(&Utc)),
                updated: entry.updated.map(|dt| dt.with_timezone(&Utc)),
            })
            .collect();

        Ok(ParsedFeed {
            title: feed
                .title
                .map(|t| decode_html_entities(&t.content).to_string()),
            entries,
        })
    }
}
