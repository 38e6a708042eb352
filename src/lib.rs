//! # content-manager
//!
//! A personal content tracker. It keeps saved links, the publishers you
//! follow, and the entries discovered in their feeds, all in one SQLite
//! database.
//!
//! ## Refresh cycle
//!
//! ```text
//! Store → Fingerprint → (changed?) → Extract → Store entries → Advance hash
//! ```
//!
//! Each publisher's feed is hashed and compared with the hash stored at the
//! last refresh. Only changed feeds are scanned for entries newer than the
//! refresh window (seven days by default).
//!
//! ## Quick Start
//!
//! ```bash
//! # Follow a publisher
//! content-manager add-publisher "Rust Blog" https://blog.rust-lang.org https://blog.rust-lang.org/feed.xml
//!
//! # Pull in what was published this week
//! content-manager refresh --verbose
//!
//! # Save a link for later
//! content-manager add-link -t article -c programming https://example.com/post
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the config,
/// store, fetcher and normalizer.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/content-manager/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Link`](domain::Link): a saved URL
/// - [`Publisher`](domain::Publisher): a followed feed and its last fingerprint
/// - [`Entry`](domain::Entry): content discovered in a publisher's feed
pub mod domain;

/// Feed fingerprinting and recent-entry extraction.
pub mod feed;

/// HTTP fetching of feed documents.
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0
/// into [`FeedEntry`](normalizer::FeedEntry) values.
pub mod normalizer;

/// The publisher refresh cycle and its report.
pub mod refresh;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
