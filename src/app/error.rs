use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Database error: {0}")]
    Database(#[source] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Feed unavailable ({url}): {reason}")]
    FeedUnavailable { url: String, reason: String },

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("{0}")]
    Other(String),
}

impl ContentError {
    /// Wrap a fetch or parse failure for `url` as [`ContentError::FeedUnavailable`].
    pub fn feed_unavailable(url: &str, err: impl std::fmt::Display) -> Self {
        Self::FeedUnavailable {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

// Constraint failures are split out so callers can count them per row
// instead of aborting.
impl From<rusqlite::Error> for ContentError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref code, ref msg)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::ConstraintViolation(msg.clone().unwrap_or_else(|| code.to_string()))
            }
            other => Self::Database(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_foreign_key_failure_is_constraint_violation() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (parent INTEGER NOT NULL REFERENCES parent(id));",
        )
        .unwrap();

        let err: ContentError = conn
            .execute("INSERT INTO child (parent) VALUES (42)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, ContentError::ConstraintViolation(_)));
    }

    #[test]
    fn test_other_sqlite_failure_is_database_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err: ContentError = conn
            .execute("INSERT INTO missing_table VALUES (1)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, ContentError::Database(_)));
    }

    #[test]
    fn test_feed_unavailable_message() {
        let err = ContentError::feed_unavailable("https://example.com/rss", "timed out");
        assert_eq!(
            err.to_string(),
            "Feed unavailable (https://example.com/rss): timed out"
        );
    }
}
