pub mod sqlite;

use crate::app::Result;
use crate::domain::{Entry, Link, LinkUpdate, Publisher, PublisherHash, PublisherUpdate};

pub use sqlite::SqliteStore;

/// Record store for links, publishers and entries.
///
/// Every call runs its own statement and commits on return; nothing spans
/// calls in a transaction.
pub trait Store {
    // Link operations
    fn add_link(&self, link: &Link) -> Result<()>;
    fn get_links(&self) -> Result<Vec<Link>>;
    fn get_link_by_title(&self, title: &str) -> Result<Option<Link>>;
    /// Links are addressed by URL; titles are not unique.
    fn update_link(&self, link: &str, update: &LinkUpdate) -> Result<()>;
    fn delete_link(&self, link: &str) -> Result<()>;

    // Publisher operations
    fn add_publisher(&self, publisher: &Publisher) -> Result<i64>;
    fn get_publisher(&self, id: i64) -> Result<Option<Publisher>>;
    fn get_publisher_by_name(&self, name: &str) -> Result<Option<Publisher>>;
    fn list_publishers(&self) -> Result<Vec<Publisher>>;
    fn update_publisher(&self, name: &str, update: &PublisherUpdate) -> Result<()>;
    fn delete_publisher(&self, name: &str) -> Result<()>;
    fn get_publisher_hashes(&self) -> Result<Vec<PublisherHash>>;
    fn update_publisher_hash(&self, id: i64, hash: &str) -> Result<()>;

    // Entry operations
    /// Returns `false` when the publisher already has an entry with this link.
    fn add_entry(&self, entry: &Entry) -> Result<bool>;
    fn get_entries(&self) -> Result<Vec<Entry>>;
    fn get_entries_by_publisher(&self, publisher_id: i64) -> Result<Vec<Entry>>;
    fn delete_entry(&self, link: &str) -> Result<()>;
}
