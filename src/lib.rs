pub mod domain;
pub mod infra;
pub mod subsystems;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::extract::FromRef;
use domain::{
    catalog::{CatalogAggregator, ListingStore, LocalListings},
    payments::{HttpPaymentProcessor, SharedProcessor},
};
use infra::Settings;
use subsystems::{CatalogPrefetch, WebServer};
use tokio_graceful_shutdown::{IntoSubsystem, SubsystemBuilder, Toplevel};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub settings: Settings,
    pub listings: ListingStore,
    pub catalog: CatalogAggregator,
    pub processor: SharedProcessor,
}

pub fn build_subsystems(state: AppState, prefetch_catalog: bool) -> Toplevel {
    let catalog_prefetch = prefetch_catalog.then(|| CatalogPrefetch::new(state.catalog.clone()));
    let webserver = WebServer::new(state);

    // Setup and execute subsystem tree
    Toplevel::new(async move |s| {
        if let Some(catalog_prefetch) = catalog_prefetch {
            s.start(SubsystemBuilder::new(
                "CatalogPrefetch",
                catalog_prefetch.into_subsystem(),
            ));
        }
        s.start(SubsystemBuilder::new(
            "Webserver",
            webserver.into_subsystem(),
        ));
    })
}

pub async fn start_server(state: AppState, prefetch_catalog: bool) -> anyhow::Result<()> {
    build_subsystems(state, prefetch_catalog)
        .catch_signals()
        .handle_shutdown_requests(Duration::from_millis(2000))
        .await
        .map_err(Into::into)
}

pub fn configure_tracing(settings: &Settings) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(
        settings.application.logs_directory.clone(),
        "agri_market.log",
    );
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(non_blocking)
        .init();
    _guard
}

pub fn construct_app_state(settings: Settings) -> Result<AppState, anyhow::Error> {
    let listings = LocalListings::seeded().context("The bundled local catalog is invalid.")?;
    let catalog = CatalogAggregator::from_settings(&settings.catalog)
        .context("Failed to build the HTTP client for the catalog feeds.")?;
    let processor = HttpPaymentProcessor::new(&settings.payments)
        .context("Failed to build the HTTP client for the payment processor.")?;

    Ok(AppState {
        settings,
        listings: ListingStore::new(listings),
        catalog,
        processor: Arc::new(processor),
    })
}
