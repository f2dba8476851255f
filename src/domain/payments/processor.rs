use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::infra::PaymentSettings;

use super::PaymentError;

pub type SharedProcessor = Arc<dyn PaymentProcessor>;

/// What the backend asks the processor for. `amount` is in minor units (paise).
#[derive(Debug, Clone, PartialEq)]
pub struct NewPaymentIntent {
    pub amount: i64,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
}

/// A payment intent as the processor reports it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessorIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn create_intent(&self, intent: NewPaymentIntent) -> Result<ProcessorIntent, PaymentError>;

    async fn retrieve_intent(&self, intent_id: &str) -> Result<ProcessorIntent, PaymentError>;
}

#[derive(Debug, serde::Deserialize)]
struct ProcessorErrorBody {
    error: ProcessorErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
struct ProcessorErrorDetail {
    message: String,
}

/// Talks to a Stripe-compatible `/v1/payment_intents` API.
pub struct HttpPaymentProcessor {
    client: Client,
    base_url: String,
    secret_key: Option<String>,
}

impl HttpPaymentProcessor {
    pub fn new(settings: &PaymentSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: settings.processor_base_url.trim_end_matches('/').to_owned(),
            secret_key: settings
                .secret_key
                .clone()
                .filter(|key| !key.is_empty()),
        })
    }

    fn secret_key(&self) -> Result<&str, PaymentError> {
        self.secret_key.as_deref().ok_or(PaymentError::NotConfigured)
    }

    async fn read_intent(response: reqwest::Response) -> Result<ProcessorIntent, String> {
        if response.status().is_success() {
            return response
                .json::<ProcessorIntent>()
                .await
                .map_err(|e| e.to_string());
        }
        let status = response.status();
        match response.json::<ProcessorErrorBody>().await {
            Ok(body) => Err(body.error.message),
            Err(_) => Err(format!("Payment processor returned {status}")),
        }
    }
}

#[async_trait]
impl PaymentProcessor for HttpPaymentProcessor {
    fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    async fn create_intent(&self, intent: NewPaymentIntent) -> Result<ProcessorIntent, PaymentError> {
        let secret_key = self.secret_key()?;
        let mut form = vec![
            ("amount", intent.amount.to_string()),
            ("currency", intent.currency),
            ("metadata[customerName]", intent.customer_name.clone()),
            ("metadata[platform]", "AgriTech Marketplace".to_owned()),
            (
                "description",
                format!("AgriTech Marketplace Order - {}", intent.customer_name),
            ),
            ("automatic_payment_methods[enabled]", "true".to_owned()),
        ];
        if let Some(email) = intent.customer_email {
            form.push(("receipt_email", email));
        }

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| PaymentError::Processor(e.to_string()))?;

        Self::read_intent(response)
            .await
            .map_err(PaymentError::Processor)
    }

    async fn retrieve_intent(&self, intent_id: &str) -> Result<ProcessorIntent, PaymentError> {
        let secret_key = self.secret_key()?;
        let response = self
            .client
            .get(format!("{}/v1/payment_intents/{intent_id}", self.base_url))
            .bearer_auth(secret_key)
            .send()
            .await
            .map_err(|e| PaymentError::StatusUnavailable(e.to_string()))?;

        Self::read_intent(response)
            .await
            .map_err(PaymentError::StatusUnavailable)
    }
}
