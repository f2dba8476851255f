use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::domain::{catalog::ListingError, payments::PaymentError, payments::WebhookError};

#[derive(Debug)]
pub enum ClientError {
    Payment(PaymentError),
    Listing(ListingError),
    Webhook(WebhookError),
    NotFound(String),
    Payload(String),
    Internal(anyhow::Error),
}

/// Error body shared with the checkout client, which reads `error` back out of failed responses.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ClientError::Payment(payment_error) => match payment_error {
                PaymentError::InvalidAmount => {
                    (StatusCode::BAD_REQUEST, payment_error.to_string())
                }
                PaymentError::NotConfigured => {
                    (StatusCode::SERVICE_UNAVAILABLE, payment_error.to_string())
                }
                PaymentError::Processor(ref message) => {
                    error!("Payment processor failed with {message}");
                    (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
                }
                PaymentError::StatusUnavailable(ref reason) => {
                    error!("Payment status lookup failed with {reason}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Could not retrieve payment status".to_owned(),
                    )
                }
                PaymentError::QrGeneration(ref reason) => {
                    error!("QR generation failed with {reason}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "QR generation failed".to_owned(),
                    )
                }
            },
            ClientError::Listing(listing_error) => match listing_error {
                ListingError::UnknownFarmer(_) | ListingError::UnknownProduct(_) => {
                    (StatusCode::NOT_FOUND, listing_error.to_string())
                }
                ListingError::InvalidListing(_) => {
                    (StatusCode::BAD_REQUEST, listing_error.to_string())
                }
            },
            ClientError::Webhook(webhook_error) => (
                StatusCode::BAD_REQUEST,
                format!("Webhook Error: {webhook_error}"),
            ),
            ClientError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ClientError::Payload(message) => (StatusCode::BAD_REQUEST, message),
            ClientError::Internal(err) => {
                error!("Internal error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Please ask your system administrator to check the logs.".to_owned(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<PaymentError> for ClientError {
    fn from(payment_error: PaymentError) -> Self {
        ClientError::Payment(payment_error)
    }
}

impl From<ListingError> for ClientError {
    fn from(listing_error: ListingError) -> Self {
        ClientError::Listing(listing_error)
    }
}

impl From<WebhookError> for ClientError {
    fn from(webhook_error: WebhookError) -> Self {
        ClientError::Webhook(webhook_error)
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(value: anyhow::Error) -> Self {
        ClientError::Internal(value)
    }
}
