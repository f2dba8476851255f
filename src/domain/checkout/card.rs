use async_trait::async_trait;

use super::ProcessorError;

/// Opaque reference to the processor's embedded card input. Card data never passes
/// through the marketplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardHandle(pub String);

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BillingDetails {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardConfirmation {
    /// Processor status; only `succeeded` completes an order.
    pub status: String,
    pub reference: String,
}

impl CardConfirmation {
    pub fn succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

/// The processor's client library, injected so checkout can run against a double.
#[async_trait]
pub trait CardProcessor: Send + Sync {
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        card: &CardHandle,
        billing: &BillingDetails,
    ) -> Result<CardConfirmation, ProcessorError>;
}

/// What the card branch of the form shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPanel {
    /// Present once the embedded input reports itself complete.
    pub card: Option<CardHandle>,
    pub processing: bool,
    pub error: Option<String>,
    pub succeeded: bool,
}
