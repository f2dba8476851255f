use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::{FeedError, Product, Source};

/// A best-effort, read-only source of catalog items.
#[async_trait]
pub trait CatalogFeed: Send + Sync {
    fn source(&self) -> Source;

    async fn fetch(&self) -> Result<Vec<Product>, FeedError>;
}

/// Fetches a feed under a deadline. Any failure, including a slow endpoint, contributes
/// zero items; the reason is only logged.
pub async fn fetch_or_empty(feed: &dyn CatalogFeed, deadline: Duration) -> Vec<Product> {
    let source = feed.source();
    let result = match tokio::time::timeout(deadline, feed.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(FeedError::Timeout(deadline)),
    };

    match result {
        Ok(products) => products
            .into_iter()
            .map(|product| product.with_source(source))
            .collect(),
        Err(err) => {
            warn!("{source} catalog feed unavailable: {err}");
            Vec::new()
        }
    }
}
