#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use stock_services::{
    config::{AppConfig, ServiceKind},
    db::{self, DbConfig, DbPool},
    server,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tower::ServiceExt;

/// Configuration pointing each service at the given peer base URLs.
pub fn test_config(service: ServiceKind, products_url: &str, transactions_url: &str) -> AppConfig {
    let mut cfg = AppConfig::for_service(service);
    cfg.database_url = "sqlite::memory:".to_string();
    cfg.products_service_url = products_url.to_string();
    cfg.transactions_service_url = transactions_url.to_string();
    cfg
}

/// Fresh, migrated in-memory database for one service.
pub async fn fresh_db(service: ServiceKind) -> Arc<DbPool> {
    let pool = db::establish_connection_with_config(&DbConfig::in_memory())
        .await
        .expect("failed to create test database");
    db::run_migrations(&pool, service)
        .await
        .expect("failed to run migrations in tests");
    Arc::new(pool)
}

/// One service's router backed by its own in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub db: Arc<DbPool>,
    server: Option<JoinHandle<()>>,
}

impl TestApp {
    /// Product Store whose history lookups go to `transactions_url`.
    pub async fn products(transactions_url: &str) -> Self {
        let db = fresh_db(ServiceKind::Products).await;
        let cfg = test_config(ServiceKind::Products, "http://127.0.0.1:9", transactions_url);
        Self {
            router: server::products_app(db.clone(), &cfg),
            db,
            server: None,
        }
    }

    /// Transaction Service talking to the Product Store at `products_url`.
    pub async fn transactions(products_url: &str) -> Self {
        let db = fresh_db(ServiceKind::Transactions).await;
        let cfg = test_config(ServiceKind::Transactions, products_url, "http://127.0.0.1:9");
        Self {
            router: server::transactions_app(db.clone(), &cfg),
            db,
            server: None,
        }
    }

    /// Serves the router on `listener` in the background.
    pub fn serve_on(&mut self, listener: TcpListener) {
        let router = self.router.clone();
        self.server = Some(tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        }));
    }

    /// Serves the router on an ephemeral port and returns its base URL.
    pub async fn serve(&mut self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let url = format!("http://{}", listener.local_addr().expect("local addr"));
        self.serve_on(listener);
        url
    }

    /// Send a request against the router, with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            server.abort();
        }
    }
}

/// Both services wired to each other over real sockets.
///
/// Requests go through `oneshot` on either router; the peer calls they trigger
/// travel over HTTP to the live servers.
pub struct TestStack {
    pub products: TestApp,
    pub transactions: TestApp,
}

impl TestStack {
    pub async fn start() -> Self {
        let transactions_listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let transactions_url = format!(
            "http://{}",
            transactions_listener.local_addr().expect("local addr")
        );

        let mut products = TestApp::products(&transactions_url).await;
        let products_url = products.serve().await;

        let mut transactions = TestApp::transactions(&products_url).await;
        transactions.serve_on(transactions_listener);

        Self {
            products,
            transactions,
        }
    }

    /// Creates a product through the Product Store API and returns its id.
    pub async fn create_product(&self, name: &str, stock: i32, price: &str) -> i64 {
        let response = self
            .products
            .request(
                Method::POST,
                "/products",
                Some(serde_json::json!({ "name": name, "stock": stock, "price": price })),
            )
            .await;
        assert_eq!(response.status(), 201, "product creation failed");
        response_json(response).await["id"]
            .as_i64()
            .expect("product id")
    }

    pub async fn stock_of(&self, product_id: i64) -> i64 {
        let response = self
            .products
            .request(Method::GET, &format!("/products/{}", product_id), None)
            .await;
        assert_eq!(response.status(), 200);
        response_json(response).await["stock"]
            .as_i64()
            .expect("stock")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Decimal fields travel as JSON strings
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("expected decimal, got {}", other),
    }
}
