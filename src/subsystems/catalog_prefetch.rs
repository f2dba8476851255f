use async_trait::async_trait;
use tokio::select;
use tokio_graceful_shutdown::{IntoSubsystem, SubsystemHandle};
use tracing::info;

use crate::domain::catalog::CatalogAggregator;

/// Warms the external feed caches once at startup so the first shopper doesn't wait on them.
pub struct CatalogPrefetch {
    catalog: CatalogAggregator,
}

impl CatalogPrefetch {
    pub fn new(catalog: CatalogAggregator) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl IntoSubsystem<anyhow::Error> for CatalogPrefetch {
    async fn run(self, subsys: SubsystemHandle) -> Result<(), anyhow::Error> {
        info!("Catalog prefetch starting.");
        select!(
            (enam, fruityvice) = self.catalog.external_products() => {
                info!(
                    "Catalog prefetch finished with {} eNAM and {} Fruityvice products.",
                    enam.len(),
                    fruityvice.len()
                );
            }
            _ = subsys.on_shutdown_requested() => {
                info!("Catalog prefetch cancelled.");
            }
        );
        Ok(())
    }
}
