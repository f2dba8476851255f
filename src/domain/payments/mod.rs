mod errors;
mod health;
mod intent;
mod processor;
mod upi_qr;
mod webhook;
mod wire;

pub use errors::{PaymentError, WebhookError};
pub use health::{health_check_endpoint, service_info_endpoint};
pub use intent::{
    DEFAULT_CUSTOMER_NAME, create_payment_intent_endpoint, payment_status_endpoint,
    to_minor_units,
};
#[cfg(test)]
pub(crate) use processor::stubs;
pub use processor::{
    HttpPaymentProcessor, NewPaymentIntent, PaymentProcessor, ProcessorIntent, SharedProcessor,
};
pub use upi_qr::{generate_qr_endpoint, render_qr_data_url, upi_payment_link};
pub use webhook::{
    SIGNATURE_HEADER, WebhookEvent, construct_event, sign_payload, verify_signature,
    webhook_endpoint,
};
pub use wire::{
    PaymentIntentRequest, PaymentIntentResponse, PaymentStatusResponse, QrRequest, QrResponse,
    ServiceInfo, ServiceStatus, WebhookAck,
};
