use axum::{Json, extract::State};

use crate::infra::ClientError;

use super::{ServiceInfo, ServiceStatus, SharedProcessor};

pub async fn service_info_endpoint(
    State(processor): State<SharedProcessor>,
) -> Result<Json<ServiceInfo>, ClientError> {
    let stripe = if processor.is_configured() {
        "configured"
    } else {
        "missing payments.secret_key (APP_PAYMENTS__SECRET_KEY)"
    };
    Ok(Json(ServiceInfo {
        status: "AgriTech Server running".to_owned(),
        services: ServiceStatus {
            stripe: stripe.to_owned(),
            upi_qr: "active".to_owned(),
        },
    }))
}

pub async fn health_check_endpoint() -> Result<Json<String>, ClientError> {
    Ok(Json("Ok".to_owned()))
}
