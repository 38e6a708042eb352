use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
    pub website: String,
    pub rss: String,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Feed fingerprint recorded by the last successful refresh.
    pub hash: Option<String>,
}

impl Publisher {
    pub fn new(name: String, website: String, rss: String) -> Self {
        Self {
            id: 0,
            name,
            website,
            rss,
            category: None,
            kind: None,
            hash: None,
        }
    }
}

/// The slice of a publisher the refresh cycle needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherHash {
    pub id: i64,
    pub name: String,
    pub rss: String,
    pub hash: Option<String>,
}

impl PublisherHash {
    /// A missing stored hash always counts as changed.
    pub fn is_changed(&self, current: &str) -> bool {
        self.hash.as_deref() != Some(current)
    }
}

/// Publisher fields that may change. The name identifies the row; the
/// hash is only written by the refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct PublisherUpdate {
    /// A new feed URL also clears the stored hash.
    pub rss: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
}
