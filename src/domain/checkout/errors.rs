/// A failed call to the marketplace backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-OK status and its `{error}` message.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Could not reach the payment server: {0}")]
    Http(#[from] reqwest::Error),
}

/// An error reported by the card processor, shown to the shopper verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProcessorError {
    pub message: String,
}

impl ProcessorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Every checkout failure leaves the shopper on an editable form.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Please fill all delivery details: {}", .0.join(", "))]
    MissingDeliveryFields(Vec<&'static str>),
    #[error("Please enter your UPI ID")]
    MissingUpiId,
    #[error("Please complete your card details")]
    CardIncomplete,
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("This order has already been placed")]
    AlreadyPlaced,
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error("Payment was not completed (status: {0})")]
    PaymentNotCompleted(String),
}

impl CheckoutError {
    /// Validation failures are caught before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CheckoutError::MissingDeliveryFields(_)
                | CheckoutError::MissingUpiId
                | CheckoutError::CardIncomplete
                | CheckoutError::EmptyCart
        )
    }
}
