use crate::common::HistoryParams;
use crate::entities::{product, transaction};
use crate::errors::ServiceError;
use crate::handlers::common::{created_response, no_content_response, PaginationParams};
use crate::models::Page;
use crate::services::products::ProductService;
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;

/// Handler state of the Product Store
#[derive(Clone)]
pub struct ProductsState {
    pub service: Arc<ProductService>,
    pub default_page_size: u64,
}

/// Create the products router
pub fn products_router() -> Router<ProductsState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(replace_product).delete(delete_product),
        )
        .route("/products/:id/history", get(product_history))
}

/// List products page by page
#[utoipa::path(
    get,
    path = "/products",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of products", body = Page<product::Model>),
        (status = 400, description = "Invalid pagination", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<ProductsState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = params.to_page_request(state.default_page_size)?;
    let products = state.service.list(page).await?;
    Ok(Json(products))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = product::Model),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<ProductsState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state.service.get(id).await?;
    Ok(Json(product))
}

/// Create a product; the store assigns the id
#[utoipa::path(
    post,
    path = "/products",
    request_body = product::Model,
    responses(
        (status = 201, description = "Product created", body = product::Model,
            headers(("Location" = String, description = "URL of the new product"))
        ),
        (status = 400, description = "Invalid product", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<ProductsState>,
    Json(payload): Json<product::Model>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.service.create(payload).await?;
    Ok(created_response(format!("/products/{}", created.id), created))
}

/// Replace a whole product record
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = product::Model,
    responses(
        (status = 204, description = "Product replaced"),
        (status = 400, description = "Body id differs from path id", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn replace_product(
    State(state): State<ProductsState>,
    Path(id): Path<i32>,
    Json(payload): Json<product::Model>,
) -> Result<impl IntoResponse, ServiceError> {
    state.service.replace(id, payload).await?;
    Ok(no_content_response())
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<ProductsState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.service.delete(id).await?;
    Ok(no_content_response())
}

/// Transaction history of a product, served by the Transaction Service
#[utoipa::path(
    get,
    path = "/products/{id}/history",
    params(("id" = i32, Path, description = "Product id"), HistoryParams),
    responses(
        (status = 200, description = "Matching transactions, possibly empty", body = [transaction::Model]),
        (status = 502, description = "Transaction Service unreachable", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn product_history(
    State(state): State<ProductsState>,
    Path(id): Path<i32>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state.service.history(id, &params).await?;
    Ok(Json(items))
}
