use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};

use agri_market::{
    AppState, construct_app_state,
    infra::{Settings, get_config_settings},
    start_server,
};
use axum::{
    Form, Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};

pub const STUB_SECRET_KEY: &str = "sk_test_stub";

/// Asserts that a function returns an expected value or retries until it does.
/// Retries every 100ms if the values do not match.
/// Will fail immediately on an error or after 50 retries (5 seconds).
pub async fn assert_until_eq<F, Fut, T, E>(f: F, expected_value: T, label: &str)
where
    F: Fn() -> Fut,
    E: std::fmt::Debug,
    Fut: Future<Output = Result<T, E>>,
    T: PartialEq + std::fmt::Debug,
{
    let delay_ms = 100;
    let max_times = 50;
    let mut times: usize = 0;
    let mut result: T = f().await.unwrap();
    while times < max_times {
        times += 1;
        if result == expected_value {
            break;
        } else {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            println!("Retry #{times} {label}");
            result = f().await.unwrap();
        }
    }
    assert_eq!(result, expected_value);
}

/// Serves `router` on a random local port and returns its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Stub listener should bind.");
    let address = listener.local_addr().expect("Stub should have an address.");
    tokio::spawn(async move { axum::serve(listener, router).await });
    format!("http://{address}")
}

/// Form fields of every payment intent the stub processor has been asked to create.
pub type RecordedIntents = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// A processor speaking the `/v1/payment_intents` dialect. Intent `pi_missing` does not exist.
pub fn stub_processor(recorded: RecordedIntents) -> Router {
    Router::new()
        .route(
            "/v1/payment_intents",
            post(move |Form(form): Form<HashMap<String, String>>| async move {
                let amount: i64 = form
                    .get("amount")
                    .and_then(|amount| amount.parse().ok())
                    .unwrap_or_default();
                let currency = form.get("currency").cloned().unwrap_or_default();
                recorded.lock().unwrap().push(form);
                Json(json!({
                    "id": "pi_stub_1",
                    "client_secret": "pi_stub_1_secret_xyz",
                    "amount": amount,
                    "currency": currency,
                    "status": "requires_payment_method",
                }))
            }),
        )
        .route(
            "/v1/payment_intents/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "pi_missing" {
                    return (
                        StatusCode::NOT_FOUND,
                        Json(json!({"error": {"message": "No such payment_intent: 'pi_missing'"}})),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "id": id,
                        "amount": 27000,
                        "currency": "inr",
                        "status": "succeeded",
                    })),
                )
            }),
        )
}

pub fn enam_items() -> Value {
    json!({
        "data": [
            {"commodity": "Tomato", "market": "Kolar", "state": "Karnataka", "modal_price": "2400"},
            {"commodity": "Basmati Rice", "market": "Karnal", "state": "Haryana", "min_price": 60, "max_price": 80},
        ]
    })
}

pub fn fruits() -> Value {
    json!([
        {"name": "Mango", "id": 27, "family": "Anacardiaceae",
         "nutritions": {"calories": 60, "fat": 0.38, "sugar": 13.7, "carbohydrates": 15, "protein": 0.82}},
        {"name": "Banana", "id": 1, "family": "Musaceae",
         "nutritions": {"calories": 96, "fat": 0.2, "sugar": 17.2, "carbohydrates": 22, "protein": 1}},
        {"name": "Kiwi", "id": 66, "family": "Actinidiaceae",
         "nutritions": {"calories": 61, "fat": 0.5, "sugar": 9, "carbohydrates": 15, "protein": 1.1}},
    ])
}

/// Catalog feeds answering with `enam_items()` and `fruits()`, or failing with 500s.
pub fn stub_feeds(healthy: bool) -> Router {
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Router::new()
        .route("/enam", post(move || async move { (status, Json(enam_items())) }))
        .route("/fruit/all", get(move || async move { (status, Json(fruits())) }))
}

pub struct TestServer {
    pub handle: JoinHandle<Result<(), anyhow::Error>>,
    pub state: AppState,
    pub intents: RecordedIntents,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.state.settings.application.address())
    }
}

/// Starts the server against stub upstreams. `configure` may adjust settings last.
pub async fn start_test_server(
    healthy_feeds: bool,
    configure: impl FnOnce(&mut Settings),
) -> TestServer {
    let intents = RecordedIntents::default();
    let processor_url = spawn_stub(stub_processor(intents.clone())).await;
    let feeds_url = spawn_stub(stub_feeds(healthy_feeds)).await;

    let mut settings = get_config_settings().expect("Could not read application configuration.");
    settings.application.host = "127.0.0.1".to_owned();
    settings.application.port = free_port().await;
    settings.payments.processor_base_url = processor_url;
    settings.payments.secret_key = Some(STUB_SECRET_KEY.to_owned());
    settings.catalog.enam_url = format!("{feeds_url}/enam");
    settings.catalog.fruityvice_url = format!("{feeds_url}/fruit/all");
    configure(&mut settings);

    let state = construct_app_state(settings).expect("Expected AppState to be created.");
    let handle = tokio::task::spawn(start_server(state.clone(), false));
    let server = TestServer {
        handle,
        state,
        intents,
    };

    let client = &reqwest::Client::new();
    let health_url = &format!("{}/healthcheck", server.url());
    assert_until_eq(
        || async move {
            Ok::<bool, ()>(
                client
                    .get(health_url)
                    .send()
                    .await
                    .is_ok_and(|res| res.status().is_success()),
            )
        },
        true,
        "waiting for the web server",
    )
    .await;

    server
}

async fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Expected a free port.");
    listener
        .local_addr()
        .expect("Expected a local address.")
        .port()
}
