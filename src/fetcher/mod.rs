pub mod http_fetcher;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::app::Result;

/// Retrieves the raw bytes of a feed document.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
