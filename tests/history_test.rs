mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{response_json, TestApp, TestStack};

/// Seeds {(p1, sale, 2024-01-05), (p1, purchase, 2024-01-10), (p2, sale, 2024-01-05)}
async fn seeded_stack() -> (TestStack, i64, i64) {
    let stack = TestStack::start().await;
    let first = stack.create_product("First", 50, "1.00").await;
    let second = stack.create_product("Second", 50, "1.00").await;

    for (product_id, kind, timestamp) in [
        (first, "sale", "2024-01-05T15:00:00Z"),
        (first, "purchase", "2024-01-10T15:00:00Z"),
        (second, "sale", "2024-01-05T15:00:00Z"),
    ] {
        let response = stack
            .transactions
            .request(
                Method::POST,
                "/transactions",
                Some(json!({
                    "timestamp": timestamp,
                    "type": kind,
                    "productId": product_id,
                    "quantity": 1,
                    "unitPrice": "1.00"
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    (stack, first, second)
}

fn kinds(items: &Value) -> Vec<String> {
    items
        .as_array()
        .expect("array")
        .iter()
        .map(|t| t["type"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn history_filters_narrow_and_widen() {
    let (stack, first, _) = seeded_stack().await;

    let response = stack
        .transactions
        .request(
            Method::GET,
            &format!("/transactions/history/{}?type=sale", first),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let items = response_json(response).await;
    assert_eq!(kinds(&items), vec!["sale"]);
    assert_eq!(items[0]["productId"], first);

    let response = stack
        .transactions
        .request(Method::GET, &format!("/transactions/history/{}", first), None)
        .await;
    assert_eq!(kinds(&response_json(response).await), vec!["sale", "purchase"]);

    let response = stack
        .transactions
        .request(
            Method::GET,
            &format!(
                "/transactions/history/{}?fromDate=2024-01-06&toDate=2024-01-31",
                first
            ),
            None,
        )
        .await;
    assert_eq!(kinds(&response_json(response).await), vec!["purchase"]);

    let response = stack
        .transactions
        .request(
            Method::GET,
            &format!("/transactions/history/{}?type=SALE&toDate=2024-01-06", first),
            None,
        )
        .await;
    assert_eq!(kinds(&response_json(response).await), vec!["sale"]);
}

#[tokio::test]
async fn empty_type_means_no_type_filter() {
    let (stack, first, _) = seeded_stack().await;

    let response = stack
        .transactions
        .request(
            Method::GET,
            &format!("/transactions/history/{}?type=&fromDate=", first),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_product_has_empty_history() {
    let (stack, _, _) = seeded_stack().await;

    let response = stack
        .transactions
        .request(Method::GET, "/transactions/history/999", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!([]));
}

#[tokio::test]
async fn unparseable_date_is_a_bad_request() {
    let (stack, first, _) = seeded_stack().await;

    let response = stack
        .transactions
        .request(
            Method::GET,
            &format!("/transactions/history/{}?fromDate=05/01/2024", first),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_store_delegates_history_with_filters() {
    let (stack, first, second) = seeded_stack().await;

    let response = stack
        .products
        .request(
            Method::GET,
            &format!("/products/{}/history?type=sale", first),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(kinds(&response_json(response).await), vec!["sale"]);

    let response = stack
        .products
        .request(Method::GET, &format!("/products/{}/history", second), None)
        .await;
    let items = response_json(response).await;
    assert_eq!(kinds(&items), vec!["sale"]);
    assert_eq!(items[0]["productId"], second);
}

#[tokio::test]
async fn passthrough_turns_null_into_empty_list() {
    let transaction_service = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transactions/history/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .mount(&transaction_service)
        .await;

    let app = TestApp::products(&transaction_service.uri()).await;
    let response = app
        .request(Method::GET, "/products/3/history", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!([]));
}

#[tokio::test]
async fn passthrough_mirrors_remote_failure() {
    let transaction_service = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&transaction_service)
        .await;

    let app = TestApp::products(&transaction_service.uri()).await;
    let response = app
        .request(Method::GET, "/products/3/history", None)
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
