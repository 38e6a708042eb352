pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "content-manager")]
#[command(about = "Track saved links and new content from publishers' feeds", long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file to load instead of the default one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a link
    AddLink {
        /// URL of the resource
        link: String,
        /// Type of content (youtube, blog post, article...)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Category of content (startups, programming, art...)
        #[arg(short, long)]
        category: Option<String>,
        /// Title to store (defaults to the URL)
        #[arg(long)]
        title: Option<String>,
    },
    /// Change the date, type or category of a saved link
    UpdateLink {
        /// URL of the link to change
        link: String,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Remove a saved link
    RemoveLink {
        /// URL of the link to remove
        link: String,
    },
    /// List saved links
    Links,
    /// Add a publisher and record its current feed fingerprint
    AddPublisher {
        name: String,
        website: String,
        /// URL of the publisher's RSS/Atom feed
        rss: String,
        /// Type of publisher (podcast, blog...)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Category of content (startups, programming, art...)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Change a publisher's feed URL, type or category
    UpdatePublisher {
        name: String,
        /// New feed URL; clears the stored fingerprint
        #[arg(long)]
        rss: Option<String>,
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Remove a publisher and its entries
    RemovePublisher {
        name: String,
    },
    /// List publishers
    Publishers,
    /// List entries discovered in publishers' feeds
    Entries {
        /// Only show entries from this publisher
        #[arg(short, long)]
        publisher: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check every publisher's feed and store new entries
    Refresh {
        /// List each added entry and every failed insert
        #[arg(short, long)]
        verbose: bool,
    },
}
