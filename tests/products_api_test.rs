mod common;

use axum::http::{header, Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::json;

use common::{decimal, response_json, TestApp};

async fn app() -> TestApp {
    // History is not exercised here
    TestApp::products("http://127.0.0.1:9").await
}

#[tokio::test]
async fn product_lifecycle() {
    let app = app().await;

    let response = app
        .request(
            Method::POST,
            "/products",
            Some(json!({ "id": 500, "name": "Widget", "stock": 10, "price": "2.50" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string();
    let created = response_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_ne!(id, 500);
    assert_eq!(location, format!("/products/{}", id));
    assert_eq!(decimal(&created["price"]), dec!(2.5));

    let response = app
        .request(
            Method::PUT,
            &location,
            Some(json!({ "id": id, "name": "Widget", "stock": 4, "price": "3.00" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let fetched = response_json(app.request(Method::GET, &location, None).await).await;
    assert_eq!(fetched["stock"], 4);
    assert_eq!(decimal(&fetched["price"]), dec!(3));

    let response = app.request(Method::DELETE, &location, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.request(Method::GET, &location, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.request(Method::DELETE, &location, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn replace_checks_id_and_existence() {
    let app = app().await;
    let created = response_json(
        app.request(
            Method::POST,
            "/products",
            Some(json!({ "name": "Widget", "stock": 1, "price": 1 })),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PUT,
            &format!("/products/{}", id),
            Some(json!({ "id": id + 1, "name": "Widget", "stock": 1, "price": 1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::PUT,
            "/products/999",
            Some(json!({ "id": 999, "name": "Ghost", "stock": 1, "price": 1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_name_is_rejected() {
    let app = app().await;

    let response = app
        .request(
            Method::POST,
            "/products",
            Some(json!({ "name": "", "stock": 1, "price": "1.00" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn health_and_docs_are_served() {
    let app = app().await;

    let response = app
        .request_with_headers(Method::GET, "/health", None, &[("x-request-id", "probe-1")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "probe-1");
    assert_eq!(response_json(response).await["service"], "products");

    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = response_json(response).await;
    assert!(doc["paths"]["/products/{id}/history"].is_object());
}

#[tokio::test]
async fn every_response_gets_a_request_id() {
    let app = app().await;

    let response = app.request(Method::GET, "/products/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let header_id = response.headers()["x-request-id"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(!header_id.is_empty());
    assert_eq!(response_json(response).await["request_id"], header_id);
}
