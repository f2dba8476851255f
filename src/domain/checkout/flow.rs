//! Checkout slice

use std::{sync::Arc, time::Duration};

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    domain::{
        cart::{Cart, DeliveryInfo, MarketSession, Order, OrderId, PaymentMethod, PaymentStatus},
        payments::{DEFAULT_CUSTOMER_NAME, PaymentIntentRequest, QrRequest},
    },
    infra::CheckoutSettings,
};

use super::{
    BillingDetails, CardConfirmation, CardHandle, CardPanel, CardProcessor, CheckoutError,
    PaymentBackend, QrGenerator, QrState, UpiPanel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Editing,
    Placed(OrderId),
}

/// The checkout form: delivery details plus one of three payment branches.
///
/// Cash on delivery places the order straight away. UPI shows a QR for the cart total
/// and lets the shopper assert that they paid. Card creates a payment intent on the
/// backend, confirms it through the injected [`CardProcessor`] and places a paid order
/// once the processor reports `succeeded`.
pub struct Checkout {
    backend: Arc<dyn PaymentBackend>,
    processor: Arc<dyn CardProcessor>,
    currency: String,
    card_success_delay: Duration,
    name: String,
    phone: String,
    address: String,
    method: PaymentMethod,
    upi: QrGenerator,
    /// Cart total the current QR was scheduled for.
    qr_amount: Option<Decimal>,
    card: CardPanel,
    stage: CheckoutStage,
}

impl Checkout {
    pub fn new(
        settings: &CheckoutSettings,
        backend: Arc<dyn PaymentBackend>,
        processor: Arc<dyn CardProcessor>,
    ) -> Self {
        Self {
            upi: QrGenerator::new(
                backend.clone(),
                settings.qr_debounce(),
                settings.default_upi_id.clone(),
            ),
            backend,
            processor,
            currency: settings.currency.clone(),
            card_success_delay: settings.card_success_delay(),
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            method: PaymentMethod::Cod,
            qr_amount: None,
            card: CardPanel::default(),
            stage: CheckoutStage::Editing,
        }
    }

    /// The payer name is encoded in the QR, so a shown or pending QR is regenerated.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name == self.name {
            return;
        }
        self.name = name;
        if let (PaymentMethod::Upi, Some(amount)) = (self.method, self.qr_amount) {
            self.schedule_qr_for(amount);
        }
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }

    pub fn upi_panel(&self) -> UpiPanel {
        self.upi.panel()
    }

    pub fn watch_upi_panel(&self) -> watch::Receiver<UpiPanel> {
        self.upi.subscribe()
    }

    pub fn card_panel(&self) -> &CardPanel {
        &self.card
    }

    /// Leaving a branch discards its transient state.
    pub fn select_method(&mut self, method: PaymentMethod, cart: &Cart) {
        if method != PaymentMethod::Upi {
            self.upi.cancel();
            self.qr_amount = None;
        }
        if method != PaymentMethod::Card {
            self.card = CardPanel {
                card: self.card.card.take(),
                ..Default::default()
            };
        }
        self.method = method;
        if method == PaymentMethod::Upi {
            self.schedule_qr(cart);
        }
    }

    /// Every edit restarts the debounce; only the last one reaches the backend.
    pub fn set_upi_id(&mut self, upi_id: impl Into<String>, cart: &Cart) {
        let upi_id = upi_id.into();
        self.upi.update(|panel| panel.upi_id = upi_id);
        if self.method == PaymentMethod::Upi {
            self.schedule_qr(cart);
        }
    }

    /// Call when the cart changes while checkout is open; the QR encodes the total.
    pub fn cart_changed(&mut self, cart: &Cart) {
        let total = cart.cart_total();
        if self.method == PaymentMethod::Upi && self.qr_amount != Some(total) {
            self.schedule_qr_for(total);
        }
    }

    /// Explicit retry after a failed QR, without waiting for the debounce.
    pub fn regenerate_qr(&mut self, cart: &Cart) {
        let upi_id = self.upi.panel().upi_id;
        if upi_id.trim().is_empty() {
            self.upi.update(|panel| {
                panel.qr = QrState::Failed("Please enter your UPI ID".to_owned())
            });
            return;
        }
        let amount = cart.cart_total();
        self.qr_amount = Some(amount);
        let request = self.qr_request(upi_id, amount);
        self.upi.schedule_now(request);
    }

    /// The shopper's own claim that the UPI transfer went through. Nothing checks it
    /// against the collector, so orders placed this way are paid on trust. Only a QR
    /// that is actually shown can be acknowledged.
    pub fn acknowledge_upi_payment(&mut self, verified: bool) {
        if self.method != PaymentMethod::Upi {
            return;
        }
        self.upi.update(|panel| {
            panel.payment_verified = verified && matches!(panel.qr, QrState::Ready(_));
        });
    }

    /// Clears the inline QR or card error without retrying.
    pub fn dismiss_error(&mut self) {
        self.upi.update(|panel| {
            if matches!(panel.qr, QrState::Failed(_)) {
                panel.qr = QrState::Idle;
            }
        });
        self.card.error = None;
    }

    /// Reports the embedded card input; `Some` once it is complete.
    pub fn card_input_changed(&mut self, card: Option<CardHandle>, error: Option<String>) {
        self.card.card = card;
        self.card.error = error;
    }

    pub async fn submit(&mut self, session: &mut MarketSession) -> Result<Order, CheckoutError> {
        if let CheckoutStage::Placed(_) = self.stage {
            return Err(CheckoutError::AlreadyPlaced);
        }
        if session.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let mut info = DeliveryInfo::new(
            self.name.trim(),
            self.phone.trim(),
            self.address.trim(),
            self.method,
        );
        let missing = info.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingDeliveryFields(missing));
        }

        match self.method {
            PaymentMethod::Cod => {}
            PaymentMethod::Upi => {
                let panel = self.upi.panel();
                if panel.upi_id.trim().is_empty() {
                    return Err(CheckoutError::MissingUpiId);
                }
                if panel.payment_verified && matches!(panel.qr, QrState::Ready(_)) {
                    info.payment_status = Some(PaymentStatus::Paid);
                }
            }
            PaymentMethod::Card => {
                let confirmation = self.pay_by_card(session.cart.cart_total()).await?;
                info.payment_status = Some(PaymentStatus::Paid);
                info.payment_reference = Some(confirmation.reference);
            }
        }

        let order = session.place_order(info);
        info!(
            "Placed order {} for ₹{} ({}, {})",
            order.id, order.total, order.payment_method, order.payment_status
        );
        self.stage = CheckoutStage::Placed(order.id);
        Ok(order)
    }

    async fn pay_by_card(&mut self, total: Decimal) -> Result<CardConfirmation, CheckoutError> {
        let card = self.card.card.clone().ok_or(CheckoutError::CardIncomplete)?;
        self.card.processing = true;
        self.card.error = None;
        self.card.succeeded = false;

        let result = self.confirm_card(total, &card).await;
        self.card.processing = false;

        match result {
            Ok(confirmation) => {
                self.card.succeeded = true;
                // Leave the success indicator up before moving on.
                tokio::time::sleep(self.card_success_delay).await;
                Ok(confirmation)
            }
            Err(e) => {
                warn!("Card payment failed: {e}");
                self.card.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn confirm_card(
        &self,
        total: Decimal,
        card: &CardHandle,
    ) -> Result<CardConfirmation, CheckoutError> {
        let intent = self
            .backend
            .create_payment_intent(&PaymentIntentRequest {
                amount: Some(total),
                currency: Some(self.currency.clone()),
                customer_name: Some(self.name.trim().to_owned()),
                customer_email: None,
            })
            .await?;

        let billing = BillingDetails {
            name: self.name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
        };
        let confirmation = self
            .processor
            .confirm_card_payment(&intent.client_secret, card, &billing)
            .await?;

        if !confirmation.succeeded() {
            return Err(CheckoutError::PaymentNotCompleted(confirmation.status));
        }
        Ok(confirmation)
    }

    fn schedule_qr(&mut self, cart: &Cart) {
        self.schedule_qr_for(cart.cart_total());
    }

    fn schedule_qr_for(&mut self, amount: Decimal) {
        self.qr_amount = Some(amount);
        let upi_id = self.upi.panel().upi_id;
        if upi_id.trim().is_empty() || !upi_id.contains('@') {
            self.upi.cancel();
            return;
        }
        let request = self.qr_request(upi_id, amount);
        self.upi.schedule(request);
    }

    fn qr_request(&self, upi_id: String, amount: Decimal) -> QrRequest {
        let name = self.name.trim();
        QrRequest {
            upi_id: Some(upi_id.trim().to_owned()),
            name: Some(if name.is_empty() {
                DEFAULT_CUSTOMER_NAME.to_owned()
            } else {
                name.to_owned()
            }),
            amount: Some(amount),
        }
    }
}

//-------------------------- Tests -------------------------------
