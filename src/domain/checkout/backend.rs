use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::{
    domain::payments::{
        PaymentIntentRequest, PaymentIntentResponse, PaymentStatusResponse, QrRequest, QrResponse,
    },
    infra::{CheckoutSettings, ErrorResponse},
};

use super::BackendError;

/// The payment endpoints checkout depends on.
#[async_trait]
pub trait PaymentBackend: Send + Sync {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, BackendError>;

    async fn payment_status(&self, intent_id: &str) -> Result<PaymentStatusResponse, BackendError>;

    async fn generate_qr(&self, request: &QrRequest) -> Result<QrResponse, BackendError>;
}

/// Reaches the backend over HTTP. No retries: failures go straight back to the shopper.
#[derive(Debug, Clone)]
pub struct HttpPaymentBackend {
    client: Client,
    base_url: String,
}

impl HttpPaymentBackend {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    pub fn from_settings(settings: &CheckoutSettings) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            Client::builder().build()?,
            &settings.backend_base_url,
        ))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("Server error ({status})"),
        };
        Err(BackendError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PaymentBackend for HttpPaymentBackend {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, BackendError> {
        let response = self
            .client
            .post(self.url("/create-payment-intent"))
            .json(request)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn payment_status(&self, intent_id: &str) -> Result<PaymentStatusResponse, BackendError> {
        let response = self
            .client
            .get(self.url(&format!("/payment-status/{intent_id}")))
            .send()
            .await?;
        Self::read(response).await
    }

    async fn generate_qr(&self, request: &QrRequest) -> Result<QrResponse, BackendError> {
        let response = self
            .client
            .post(self.url("/generate-qr"))
            .json(request)
            .send()
            .await?;
        Self::read(response).await
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::{sync::Mutex, time::Duration};

    use rust_decimal::Decimal;

    use super::*;

    /// Records every request. QR answers can be delayed to simulate a slow server.
    #[derive(Default)]
    pub struct RecordingBackend {
        pub qr_requests: Mutex<Vec<QrRequest>>,
        pub intent_requests: Mutex<Vec<PaymentIntentRequest>>,
        pub qr_delay: Duration,
        pub fail_qr: bool,
        pub fail_intent: bool,
    }

    impl RecordingBackend {
        pub fn qr_requests(&self) -> Vec<QrRequest> {
            self.qr_requests.lock().map(|r| r.clone()).unwrap_or_default()
        }

        pub fn intent_requests(&self) -> Vec<PaymentIntentRequest> {
            self.intent_requests
                .lock()
                .map(|r| r.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl PaymentBackend for RecordingBackend {
        async fn create_payment_intent(
            &self,
            request: &PaymentIntentRequest,
        ) -> Result<PaymentIntentResponse, BackendError> {
            if let Ok(mut requests) = self.intent_requests.lock() {
                requests.push(request.clone());
            }
            if self.fail_intent {
                return Err(BackendError::Rejected {
                    status: 503,
                    message: "Payment processor is not configured".to_owned(),
                });
            }
            Ok(PaymentIntentResponse {
                client_secret: "pi_fake_secret".to_owned(),
                payment_intent_id: "pi_fake".to_owned(),
                amount: request.amount.unwrap_or(Decimal::ZERO),
            })
        }

        async fn payment_status(
            &self,
            _intent_id: &str,
        ) -> Result<PaymentStatusResponse, BackendError> {
            Ok(PaymentStatusResponse {
                status: "succeeded".to_owned(),
                amount: Decimal::ZERO,
                currency: "inr".to_owned(),
            })
        }

        async fn generate_qr(&self, request: &QrRequest) -> Result<QrResponse, BackendError> {
            if let Ok(mut requests) = self.qr_requests.lock() {
                requests.push(request.clone());
            }
            tokio::time::sleep(self.qr_delay).await;
            if self.fail_qr {
                return Err(BackendError::Rejected {
                    status: 500,
                    message: "QR generation failed".to_owned(),
                });
            }
            let upi_id = request.upi_id.clone().unwrap_or_default();
            Ok(QrResponse {
                qr_image: format!("data:image/svg+xml;base64,{upi_id}"),
                upi_string: format!("upi://pay?pa={upi_id}"),
            })
        }
    }
}
