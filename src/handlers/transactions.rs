use crate::common::HistoryParams;
use crate::entities::transaction;
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, PaginationParams};
use crate::models::{NewTransaction, Page};
use crate::services::transactions::TransactionService;
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;

/// Handler state of the Transaction Service
#[derive(Clone)]
pub struct TransactionsState {
    pub service: Arc<TransactionService>,
    pub default_page_size: u64,
}

/// Create the transactions router
pub fn transactions_router() -> Router<TransactionsState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/:id", get(get_transaction))
        .route("/transactions/history/:product_id", get(transaction_history))
}

/// List transactions page by page
#[utoipa::path(
    get,
    path = "/transactions",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of transactions", body = Page<transaction::Model>),
        (status = 400, description = "Invalid pagination", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn list_transactions(
    State(state): State<TransactionsState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = params.to_page_request(state.default_page_size)?;
    let transactions = state.service.list(page).await?;
    Ok(Json(transactions))
}

/// Get a transaction by id
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    params(("id" = i32, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction found", body = transaction::Model),
        (status = 404, description = "Transaction not found", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn get_transaction(
    State(state): State<TransactionsState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let transaction = state.service.get(id).await?;
    Ok(Json(transaction))
}

/// Record a purchase or sale and push the new stock to the Product Store
#[utoipa::path(
    post,
    path = "/transactions",
    request_body = NewTransaction,
    responses(
        (status = 201, description = "Transaction created and stock updated", body = transaction::Model,
            headers(("Location" = String, description = "URL of the new transaction"))
        ),
        (status = 400, description = "Unknown product or insufficient stock", body = crate::errors::ErrorResponse),
        (status = 502, description = "Product Store unreachable", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn create_transaction(
    State(state): State<TransactionsState>,
    Json(payload): Json<NewTransaction>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.service.create(payload).await?;
    Ok(created_response(
        format!("/transactions/{}", created.id),
        created,
    ))
}

/// Transactions of one product filtered by date range and type
#[utoipa::path(
    get,
    path = "/transactions/history/{product_id}",
    params(("product_id" = i32, Path, description = "Product id"), HistoryParams),
    responses(
        (status = 200, description = "Matching transactions in id order", body = [transaction::Model]),
        (status = 400, description = "Unparseable date filter", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn transaction_history(
    State(state): State<TransactionsState>,
    Path(product_id): Path<i32>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let filter = params.to_filter()?;
    let items = state.service.history(product_id, &filter).await?;
    Ok(Json(items))
}
