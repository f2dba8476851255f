use axum::http::StatusCode;
use serde_json::{Value, json};
use serial_test::serial;

use crate::test_utils::start_test_server;

const LOCAL_PRODUCTS: u64 = 33;

async fn catalog_total(client: &httpc_test::Client, query: &str) -> u64 {
    let res = client
        .do_get(&format!("/catalog{query}"))
        .await
        .expect("Catalog should be served.");
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json_body().expect("Expected a JSON body.");
    body["total"].as_u64().expect("Expected a total.")
}

#[tokio::test]
#[serial]
async fn the_catalog_merges_local_listings_with_both_feeds() {
    let server = start_test_server(true, |_| {}).await;
    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");

    assert_eq!(catalog_total(&client, "").await, LOCAL_PRODUCTS + 2 + 3);
    assert_eq!(catalog_total(&client, "?source=enam").await, 2);
    assert_eq!(catalog_total(&client, "?source=fruityvice").await, 3);
    assert_eq!(catalog_total(&client, "?source=local").await, LOCAL_PRODUCTS);

    let res = client
        .do_get("/catalog?source=fruityvice&sort=priceHigh")
        .await
        .expect("Catalog should be served.");
    let body = res.json_body().expect("Expected a JSON body.");
    let first = &body["products"][0];
    assert_eq!(first["name"], "Kiwi");
    assert_eq!(first["source"], "Fruityvice");
    assert_eq!(first["id"], "fruit-66");

    let product = client
        .do_get("/catalog/products/enam-1")
        .await
        .expect("Product should be served.");
    assert_eq!(product.status(), StatusCode::OK);
    let body = product.json_body().expect("Expected a JSON body.");
    assert_eq!(body["name"], "Tomato");
    assert_eq!(body["source"], "eNAM");
}

#[tokio::test]
#[serial]
async fn failing_feeds_degrade_to_local_listings() {
    let server = start_test_server(false, |_| {}).await;
    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");

    assert_eq!(catalog_total(&client, "").await, LOCAL_PRODUCTS);
    assert_eq!(catalog_total(&client, "?source=enam").await, 0);
}

#[tokio::test]
#[serial]
async fn the_catalog_is_paged() {
    let server = start_test_server(true, |_| {}).await;
    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");
    let page_size = server.state.settings.catalog.page_size;

    let res = client.do_get("/catalog").await.expect("Catalog should be served.");
    let body = res.json_body().expect("Expected a JSON body.");
    assert_eq!(body["products"].as_array().map(Vec::len), Some(page_size));
    assert_eq!(body["hasMore"], true);

    let res = client
        .do_get("/catalog?pages=100")
        .await
        .expect("Catalog should be served.");
    let body = res.json_body().expect("Expected a JSON body.");
    assert_eq!(body["hasMore"], false);
    assert_eq!(body["visible"], body["total"]);
}

#[tokio::test]
#[serial]
async fn farmers_can_list_edit_and_remove_products() {
    let server = start_test_server(true, |_| {}).await;
    let client = httpc_test::new_client(server.url()).expect("Expected client to be created.");

    let farmers = client.do_get("/farmers").await.expect("Farmers should be served.");
    let farmers = farmers.json_body().expect("Expected a JSON body.");
    let farmer_id = farmers[0]["id"].as_str().expect("Expected a farmer id.").to_owned();

    let created = client
        .do_post(
            &format!("/farmers/{farmer_id}/listings"),
            json!({
                "name": "Jackfruit",
                "category": "fruits",
                "price": 45,
                "availableQty": 12,
                "farmingMethod": "Organic",
            }),
        )
        .await
        .expect("Listing should be created.");
    assert_eq!(created.status(), StatusCode::CREATED);
    let product: Value = created.json_body().expect("Expected a JSON body.");
    let product_id = product["id"].as_str().expect("Expected a product id.").to_owned();
    assert_eq!(catalog_total(&client, "?source=local").await, LOCAL_PRODUCTS + 1);

    let updated = client
        .do_patch(&format!("/listings/{product_id}"), json!({"price": 50}))
        .await
        .expect("Listing should be updated.");
    assert_eq!(updated.status(), StatusCode::OK);
    let body = updated.json_body().expect("Expected a JSON body.");
    assert_eq!(body["price"], 50.0);

    let removed = client
        .do_delete(&format!("/listings/{product_id}"))
        .await
        .expect("Listing should be removed.");
    assert_eq!(removed.status(), StatusCode::OK);
    assert_eq!(catalog_total(&client, "?source=local").await, LOCAL_PRODUCTS);

    let unknown = client
        .do_post(
            "/farmers/nobody/listings",
            json!({
                "name": "Jackfruit",
                "category": "fruits",
                "price": 45,
                "availableQty": 12,
                "farmingMethod": "Organic",
            }),
        )
        .await
        .expect("Request should be sent.");
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}
