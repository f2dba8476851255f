use std::sync::{Arc, Mutex};

use agri_market::{
    domain::{
        cart::{MarketSession, PaymentMethod, PaymentStatus},
        catalog::ProductId,
        checkout::{
            BackendError, BillingDetails, CardConfirmation, CardHandle, CardProcessor, Checkout,
            CheckoutError, HttpPaymentBackend, PaymentBackend, ProcessorError, QrState,
        },
        payments::QrRequest,
    },
    infra::CheckoutSettings,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serial_test::serial;

use crate::test_utils::{TestServer, assert_until_eq, start_test_server};

/// Confirms whatever intent it is handed and remembers the secrets.
#[derive(Default)]
struct ConfirmingProcessor {
    secrets: Mutex<Vec<String>>,
}

#[async_trait]
impl CardProcessor for ConfirmingProcessor {
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        _card: &CardHandle,
        _billing: &BillingDetails,
    ) -> Result<CardConfirmation, ProcessorError> {
        self.secrets.lock().unwrap().push(client_secret.to_owned());
        Ok(CardConfirmation {
            status: "succeeded".to_owned(),
            reference: "pi_stub_1".to_owned(),
        })
    }
}

fn checkout_settings(server: &TestServer) -> CheckoutSettings {
    CheckoutSettings {
        backend_base_url: server.url(),
        qr_debounce_ms: 50,
        card_success_delay_ms: 10,
        ..server.state.settings.checkout.clone()
    }
}

async fn session_from_catalog(server: &TestServer) -> MarketSession {
    let listings = server.state.listings.read().await;
    let mut session = MarketSession::new();
    for product in listings.products().iter().take(2) {
        session.cart.add_to_cart(product, 2);
    }
    session
}

#[tokio::test]
#[serial]
async fn card_checkout_goes_through_the_backend() {
    // Given
    let server = start_test_server(true, |_| {}).await;
    let settings = checkout_settings(&server);
    let backend = Arc::new(HttpPaymentBackend::from_settings(&settings).unwrap());
    let processor = Arc::new(ConfirmingProcessor::default());
    let mut session = session_from_catalog(&server).await;
    let total = session.cart.cart_total();

    let mut checkout = Checkout::new(&settings, backend, processor.clone());
    checkout.set_name("Ravi Kumar");
    checkout.set_phone("9876543210");
    checkout.set_address("4 Temple Street, Mysuru");
    checkout.select_method(PaymentMethod::Card, &session.cart);
    checkout.card_input_changed(Some(CardHandle("card_element".to_owned())), None);

    // When
    let order = checkout.submit(&mut session).await.unwrap();

    // Then
    assert_eq!(order.total, total);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.payment_reference.as_deref(), Some("pi_stub_1"));
    assert_eq!(
        processor.secrets.lock().unwrap().as_slice(),
        ["pi_stub_1_secret_xyz".to_owned()]
    );
    let intents = server.intents.lock().unwrap().clone();
    let minor_units = (total * Decimal::ONE_HUNDRED).normalize().to_string();
    assert_eq!(intents[0]["amount"], minor_units);
    assert!(session.cart.is_empty());
    assert_eq!(session.orders.len(), 1);
}

#[tokio::test]
#[serial]
async fn upi_checkout_shows_a_qr_for_the_cart_total() {
    let server = start_test_server(true, |_| {}).await;
    let settings = checkout_settings(&server);
    let backend = Arc::new(HttpPaymentBackend::from_settings(&settings).unwrap());
    let mut session = session_from_catalog(&server).await;
    let total = session.cart.cart_total().normalize();

    let mut checkout = Checkout::new(
        &settings,
        backend,
        Arc::new(ConfirmingProcessor::default()),
    );
    checkout.set_name("Ravi Kumar");
    checkout.set_phone("9876543210");
    checkout.set_address("4 Temple Street, Mysuru");
    checkout.select_method(PaymentMethod::Upi, &session.cart);
    checkout.set_upi_id("ravi@okaxis", &session.cart);

    let expected = format!("upi://pay?pa=ravi@okaxis&pn=Ravi%20Kumar&am={total}&cu=INR");
    let watched = &checkout;
    assert_until_eq(
        || async move {
            Ok::<Option<String>, ()>(match watched.upi_panel().qr {
                QrState::Ready(qr) => Some(qr.upi_string),
                _ => None,
            })
        },
        Some(expected),
        "waiting for the UPI QR",
    )
    .await;

    checkout.acknowledge_upi_payment(true);
    let order = checkout.submit(&mut session).await.unwrap();
    assert_eq!(order.payment_method, PaymentMethod::Upi);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
#[serial]
async fn backend_rejections_carry_the_server_message() {
    let server = start_test_server(true, |settings| settings.payments.secret_key = None).await;
    let backend = HttpPaymentBackend::from_settings(&checkout_settings(&server)).unwrap();

    let result = backend
        .create_payment_intent(&agri_market::domain::payments::PaymentIntentRequest {
            amount: Some(Decimal::new(270, 0)),
            ..Default::default()
        })
        .await;

    match result {
        Err(BackendError::Rejected { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "Payment processor is not configured");
        }
        other => panic!("Expected a rejection, got {other:?}"),
    }

    let qr = backend
        .generate_qr(&QrRequest {
            upi_id: Some("ravi@okaxis".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(qr.upi_string.starts_with("upi://pay?pa=ravi@okaxis&"));
}

#[tokio::test]
#[serial]
async fn a_card_checkout_without_a_processor_key_keeps_the_cart() {
    let server = start_test_server(true, |settings| settings.payments.secret_key = None).await;
    let settings = checkout_settings(&server);
    let backend = Arc::new(HttpPaymentBackend::from_settings(&settings).unwrap());
    let mut session = session_from_catalog(&server).await;
    let items_before: Vec<ProductId> = session
        .cart
        .items()
        .iter()
        .map(|item| item.product.id.clone())
        .collect();

    let mut checkout = Checkout::new(
        &settings,
        backend,
        Arc::new(ConfirmingProcessor::default()),
    );
    checkout.set_name("Ravi Kumar");
    checkout.set_phone("9876543210");
    checkout.set_address("4 Temple Street, Mysuru");
    checkout.select_method(PaymentMethod::Card, &session.cart);
    checkout.card_input_changed(Some(CardHandle("card_element".to_owned())), None);

    let result = checkout.submit(&mut session).await;

    assert!(matches!(result, Err(CheckoutError::Backend(_))));
    assert_eq!(
        checkout.card_panel().error.as_deref(),
        Some("Payment processor is not configured")
    );
    let items_after: Vec<ProductId> = session
        .cart
        .items()
        .iter()
        .map(|item| item.product.id.clone())
        .collect();
    assert_eq!(items_after, items_before);
    assert!(session.orders.is_empty());
}
