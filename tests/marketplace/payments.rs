use agri_market::domain::payments::{SIGNATURE_HEADER, sign_payload};
use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;

use crate::test_utils::{STUB_SECRET_KEY, start_test_server};

#[tokio::test]
#[serial]
async fn payment_intents_are_created_in_minor_units() {
    let server = start_test_server(true, |_| {}).await;
    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");

    let res = client
        .do_post(
            "/create-payment-intent",
            json!({"amount": 270, "customerName": "Ravi Kumar"}),
        )
        .await
        .expect("Request should be sent.");

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json_body().expect("Expected a JSON body.");
    assert_eq!(body["clientSecret"], "pi_stub_1_secret_xyz");
    assert_eq!(body["paymentIntentId"], "pi_stub_1");
    assert_eq!(body["amount"], 270.0);

    let intents = server.intents.lock().unwrap().clone();
    assert_eq!(intents.len(), 1);
    assert_eq!(intents[0]["amount"], "27000");
    assert_eq!(intents[0]["currency"], "inr");
    assert_eq!(intents[0]["metadata[customerName]"], "Ravi Kumar");
    assert_eq!(intents[0]["automatic_payment_methods[enabled]"], "true");
}

#[tokio::test]
#[serial]
async fn amounts_below_one_rupee_are_rejected_before_the_processor() {
    let server = start_test_server(true, |_| {}).await;
    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");

    let res = client
        .do_post("/create-payment-intent", json!({"amount": 0}))
        .await
        .expect("Request should be sent.");

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json_body().expect("Expected a JSON body.");
    assert_eq!(body["error"], "Valid amount is required (minimum ₹1)");
    assert!(server.intents.lock().unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn payment_intents_are_refused_without_a_processor_key() {
    let server = start_test_server(true, |settings| settings.payments.secret_key = None).await;
    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");

    let res = client
        .do_post("/create-payment-intent", json!({"amount": 100}))
        .await
        .expect("Request should be sent.");

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let status = client.do_get("/").await.expect("Status should be served.");
    let body = status.json_body().expect("Expected a JSON body.");
    assert_ne!(body["services"]["stripe"], "configured");
}

#[tokio::test]
#[serial]
async fn payment_status_reports_major_units() {
    let server = start_test_server(true, |_| {}).await;
    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");

    let res = client
        .do_get("/payment-status/pi_stub_1")
        .await
        .expect("Request should be sent.");
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json_body().expect("Expected a JSON body.");
    assert_eq!(body["status"], "succeeded");
    assert_eq!(body["amount"], 270.0);
    assert_eq!(body["currency"], "inr");

    let missing = client
        .do_get("/payment-status/pi_missing")
        .await
        .expect("Request should be sent.");
    assert_eq!(missing.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = missing.json_body().expect("Expected a JSON body.");
    assert_eq!(body["error"], "Could not retrieve payment status");
}

#[tokio::test]
#[serial]
async fn qr_codes_encode_the_upi_payment_link() {
    let server = start_test_server(true, |_| {}).await;
    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");

    let res = client
        .do_post(
            "/generate-qr",
            json!({"upiId": "ravi@okaxis", "name": "Ravi Kumar", "amount": 270}),
        )
        .await
        .expect("Request should be sent.");

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json_body().expect("Expected a JSON body.");
    assert_eq!(
        body["upiString"],
        "upi://pay?pa=ravi@okaxis&pn=Ravi%20Kumar&am=270&cu=INR"
    );
    assert!(
        body["qrImage"]
            .as_str()
            .is_some_and(|image| image.starts_with("data:image/svg+xml;base64,"))
    );
}

#[tokio::test]
#[serial]
async fn qr_codes_fall_back_to_the_merchant() {
    let server = start_test_server(true, |_| {}).await;
    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");

    let res = client
        .do_post("/generate-qr", json!({}))
        .await
        .expect("Request should be sent.");

    let body = res.json_body().expect("Expected a JSON body.");
    let expected = format!(
        "upi://pay?pa={}&pn=AgriTech%20Marketplace&am=&cu=INR",
        server.state.settings.upi.merchant_upi_id
    );
    assert_eq!(body["upiString"], expected.as_str());
}

#[tokio::test]
#[serial]
async fn signed_webhooks_are_acknowledged_and_forged_ones_rejected() {
    let secret = "whsec_test";
    let server = start_test_server(true, |settings| {
        settings.payments.webhook_secret = Some(secret.to_owned())
    })
    .await;
    let client = reqwest::Client::new();
    let url = format!("{}/webhook", server.url());
    let payload = br#"{"type":"payment_intent.succeeded","data":{"object":{"id":"pi_stub_1"}}}"#;

    let signed = client
        .post(&url)
        .header(
            SIGNATURE_HEADER,
            sign_payload(payload, secret, jiff::Timestamp::now().as_second()),
        )
        .body(payload.to_vec())
        .send()
        .await
        .expect("Request should be sent.");
    assert_eq!(signed.status(), StatusCode::OK);
    let ack: serde_json::Value = signed.json().await.expect("Expected a JSON body.");
    assert_eq!(ack["received"], true);

    let forged = client
        .post(&url)
        .header(
            SIGNATURE_HEADER,
            sign_payload(payload, STUB_SECRET_KEY, jiff::Timestamp::now().as_second()),
        )
        .body(payload.to_vec())
        .send()
        .await
        .expect("Request should be sent.");
    assert_eq!(forged.status(), StatusCode::BAD_REQUEST);

    let unsigned = client
        .post(&url)
        .body(payload.to_vec())
        .send()
        .await
        .expect("Request should be sent.");
    assert_eq!(unsigned.status(), StatusCode::BAD_REQUEST);
}
