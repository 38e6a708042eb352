use std::path::PathBuf;
use std::sync::Arc;

use crate::app::Result;
use crate::config::{Config, ConfigError};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::refresh::Refresher;
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub normalizer: Normalizer,
}

impl AppContext {
    /// Open the database named by `db_path`, falling back to the config
    /// file's `database` and then to the platform data directory.
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path.or_else(|| config.database.clone()) {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        tracing::debug!("Opening database {}", db_path.display());

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.fetch)?);

        Ok(Self {
            config,
            store,
            fetcher,
            normalizer: Normalizer::new(),
        })
    }

    /// Refresher over this context's store and fetcher, configured from
    /// the `[refresh]` section.
    pub fn refresher(&self) -> Refresher<'_, SqliteStore> {
        Refresher::new(
            self.store.as_ref(),
            self.fetcher.as_ref(),
            self.config.refresh.options(),
        )
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        let app_dir = data_dir.join("content-manager");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("content.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn test_explicit_db_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let configured = dir.path().join("configured.db");
        let explicit = dir.path().join("explicit.db");
        let config = Config {
            database: Some(configured.clone()),
            ..Default::default()
        };

        let ctx = AppContext::new(config, Some(explicit.clone())).unwrap();
        assert!(ctx.store.list_publishers().unwrap().is_empty());
        assert!(explicit.exists());
        assert!(!configured.exists());
    }

    #[test]
    fn test_refresher_uses_configured_window() {
        let mut config = Config::default();
        config.refresh.window_days = 30;
        let ctx = AppContext::in_memory(config).unwrap();

        let refresher = ctx.refresher();
        assert_eq!(refresher.options().window_days, 30);
        assert_eq!(refresher.options().today, None);
    }
}
