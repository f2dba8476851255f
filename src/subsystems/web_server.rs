use std::net::SocketAddr;

use async_trait::async_trait;
use axum::{
    Router,
    routing::{get, patch, post},
};
use futures::FutureExt;
use tokio::select;
use tokio_graceful_shutdown::{IntoSubsystem, SubsystemHandle};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    AppState,
    domain::{catalog, payments},
};

pub struct WebServer {
    state: AppState,
}

impl WebServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(payments::service_info_endpoint))
        .route("/healthcheck", get(payments::health_check_endpoint))
        .route(
            "/create-payment-intent",
            post(payments::create_payment_intent_endpoint),
        )
        .route(
            "/payment-status/{payment_intent_id}",
            get(payments::payment_status_endpoint),
        )
        .route("/generate-qr", post(payments::generate_qr_endpoint))
        .route("/webhook", post(payments::webhook_endpoint))
        .route("/catalog", get(catalog::catalog_endpoint))
        .route(
            "/catalog/products/{product_id}",
            get(catalog::product_endpoint),
        )
        .route("/farmers", get(catalog::farmers_endpoint))
        .route("/farmers/{farmer_id}", get(catalog::farmer_profile_endpoint))
        .route(
            "/farmers/{farmer_id}/listings",
            post(catalog::add_listing_endpoint),
        )
        .route(
            "/listings/{product_id}",
            patch(catalog::update_listing_endpoint).delete(catalog::remove_listing_endpoint),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[async_trait]
impl IntoSubsystem<anyhow::Error> for WebServer {
    async fn run(self, subsys: SubsystemHandle) -> Result<(), anyhow::Error> {
        let address = self.state.settings.application.address();
        let socket_addr: SocketAddr = address.parse()
            .inspect_err(|e| error!("Could not parse server address {address}.\nCheck application host and port in configuration settings.\nFailed with {e}"))?;

        let router = router(self.state);

        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .inspect_err(|e| {
                error!("Could not bind socket address {socket_addr}. Failed with {e}")
            })?;

        info!("Web server starting on http://{socket_addr}");
        select!(
            result = axum::serve(listener, router.into_make_service()).into_future().map(|result| result.map_err(anyhow::Error::new)) => {
                error!("Web server completed with {result:?}");
            }
            _ = subsys.on_shutdown_requested() => {
                info!("Web server shutdown");
            }
        );
        Ok(())
    }
}
