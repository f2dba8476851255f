#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PaymentError {
    #[error("Valid amount is required (minimum ₹1)")]
    InvalidAmount,
    #[error("Payment processor is not configured")]
    NotConfigured,
    #[error("{0}")]
    Processor(String),
    #[error("Could not retrieve payment status: {0}")]
    StatusUnavailable(String),
    #[error("QR generation failed: {0}")]
    QrGeneration(String),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum WebhookError {
    #[error("No signatures found matching the expected signature for payload")]
    SignatureMismatch,
    #[error("Missing Stripe-Signature header")]
    MissingSignature,
    #[error("Unable to extract timestamp and signatures from header")]
    MalformedSignature,
    #[error("Timestamp outside the tolerance zone")]
    TimestampOutsideTolerance,
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}
