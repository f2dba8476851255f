mod backend;
mod card;
mod errors;
mod flow;
mod upi;

pub use backend::{HttpPaymentBackend, PaymentBackend};
pub use card::{BillingDetails, CardConfirmation, CardHandle, CardPanel, CardProcessor};
pub use errors::{BackendError, CheckoutError, ProcessorError};
pub use flow::{Checkout, CheckoutStage};
pub use upi::{QrState, UpiPanel};

pub(crate) use upi::QrGenerator;

#[cfg(test)]
pub(crate) use backend::fakes as backend_fakes;
#[cfg(test)]
pub(crate) use card::fakes as card_fakes;
