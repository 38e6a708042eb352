use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A saved link. The URL is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub link: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
}

impl Link {
    pub fn new(link: String, title: String, date: NaiveDate) -> Self {
        Self {
            link,
            title,
            date,
            kind: None,
            category: None,
        }
    }
}

/// Fields of a link that may change after creation. The URL and title
/// identify the row and are fixed.
#[derive(Debug, Clone, Default)]
pub struct LinkUpdate {
    pub date: Option<NaiveDate>,
    pub kind: Option<String>,
    pub category: Option<String>,
}
