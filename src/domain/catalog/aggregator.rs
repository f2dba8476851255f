use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tokio::sync::OnceCell;
use tracing::info;

use crate::infra::CatalogSettings;

use super::{
    CatalogFeed, EnamFeed, FruityviceFeed, Product, ProductId, Source, fetch_or_empty,
};

struct CachedFeed {
    feed: Arc<dyn CatalogFeed>,
    products: OnceCell<Vec<Product>>,
}

impl CachedFeed {
    fn new(feed: Arc<dyn CatalogFeed>) -> Self {
        Self {
            feed,
            products: OnceCell::new(),
        }
    }

    /// The first call fetches; every later call, including after a failure, reuses the result.
    async fn products(&self, deadline: Duration) -> &[Product] {
        self.products
            .get_or_init(|| async {
                let products = fetch_or_empty(self.feed.as_ref(), deadline).await;
                info!(
                    "Cached {} products from the {} feed",
                    products.len(),
                    self.feed.source()
                );
                products
            })
            .await
    }
}

/// Merges the local listings with the two external feeds. Clones share one cache.
#[derive(Clone)]
pub struct CatalogAggregator {
    enam: Arc<CachedFeed>,
    fruityvice: Arc<CachedFeed>,
    deadline: Duration,
}

impl CatalogAggregator {
    pub fn new(
        enam: Arc<dyn CatalogFeed>,
        fruityvice: Arc<dyn CatalogFeed>,
        deadline: Duration,
    ) -> Self {
        Self {
            enam: Arc::new(CachedFeed::new(enam)),
            fruityvice: Arc::new(CachedFeed::new(fruityvice)),
            deadline,
        }
    }

    pub fn from_settings(settings: &CatalogSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("agri_market/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(
            Arc::new(EnamFeed::new(
                client.clone(),
                &settings.enam_url,
                settings.enam_limit,
            )),
            Arc::new(FruityviceFeed::new(
                client,
                &settings.fruityvice_url,
                settings.fruityvice_limit,
            )),
            settings.fetch_timeout(),
        ))
    }

    /// Fetches both feeds concurrently; neither waits on the other's failure.
    pub async fn external_products(&self) -> (&[Product], &[Product]) {
        futures::join!(
            self.enam.products(self.deadline),
            self.fruityvice.products(self.deadline)
        )
    }

    /// Local listings first, then eNAM, then Fruityvice.
    pub async fn catalog(&self, local: &[Product]) -> Vec<Product> {
        let (enam, fruityvice) = self.external_products().await;
        local
            .iter()
            .cloned()
            .map(|product| product.with_source(Source::Local))
            .chain(enam.iter().cloned())
            .chain(fruityvice.iter().cloned())
            .collect()
    }

    pub async fn product(&self, local: &[Product], product_id: &ProductId) -> Option<Product> {
        if let Some(product) = local.iter().find(|product| &product.id == product_id) {
            return Some(product.clone().with_source(Source::Local));
        }
        let (enam, fruityvice) = self.external_products().await;
        enam.iter()
            .chain(fruityvice)
            .find(|product| &product.id == product_id)
            .cloned()
    }
}

//-------------------------- Tests -------------------------------
