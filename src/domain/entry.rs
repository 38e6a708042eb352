use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A piece of content discovered in a publisher's feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub link: String,
    /// Id of the owning [`Publisher`](super::Publisher).
    pub publisher: i64,
    pub date: Option<NaiveDate>,
}
