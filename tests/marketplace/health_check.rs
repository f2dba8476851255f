use axum::http::StatusCode;
use serial_test::serial;

use crate::test_utils::start_test_server;

#[tokio::test]
#[serial]
async fn the_webserver_responds_to_a_simple_get_request() {
    let server = start_test_server(true, |_| {}).await;

    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");
    let res = client.do_get("/healthcheck").await.expect("Health check should succeed.");

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn the_root_reports_which_payment_services_are_available() {
    let server = start_test_server(true, |_| {}).await;

    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");
    let res = client.do_get("/").await.expect("Status should be served.");
    let body = res.json_body().expect("Status should be JSON.");

    assert_eq!(body["status"], "AgriTech Server running");
    assert_eq!(body["services"]["stripe"], "configured");
    assert_eq!(body["services"]["upiQR"], "active");
}
