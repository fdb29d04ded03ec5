use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const OPENAPI_JSON: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Store API",
        version = "1.0.0",
        description = r#"
# Product Store

Owns product records (`id`, `name`, `stock`, `price`).

Stock is only changed by replacing the whole record. The Transaction Service does
that after every purchase or sale it records.

## Pagination

`page` is zero-based (default 0); `pageSize` defaults to 10 and must be at least 1.
Responses are `{ "items": [...], "total": n }`.
        "#
    ),
    tags(
        (name = "products", description = "Product records and their transaction history")
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::replace_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::product_history,
    ),
    components(
        schemas(
            crate::entities::product::Model,
            crate::entities::transaction::Model,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ProductsApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Transaction Service API",
        version = "1.0.0",
        description = r#"
# Transaction Service

Records purchases and sales against products held by the Product Store.

Creating a transaction reads the product, rejects sales above the stock on hand,
stores the transaction and then writes the new stock back to the Product Store.
If that last write fails the transaction is kept and the Product Store's status
code is returned.

Timestamps are stored as wall-clock time in UTC-05:00.
        "#
    ),
    tags(
        (name = "transactions", description = "Transaction records and history queries")
    ),
    paths(
        crate::handlers::transactions::list_transactions,
        crate::handlers::transactions::get_transaction,
        crate::handlers::transactions::create_transaction,
        crate::handlers::transactions::transaction_history,
    ),
    components(
        schemas(
            crate::entities::transaction::Model,
            crate::models::NewTransaction,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct TransactionsApiDoc;

pub fn products_swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON, ProductsApiDoc::openapi())
}

pub fn transactions_swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON, TransactionsApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_document_lists_history_passthrough() {
        let json = serde_json::to_string(&ProductsApiDoc::openapi()).unwrap();
        assert!(json.contains("Product Store API"));
        assert!(json.contains("/products/{id}/history"));
        assert!(json.contains("ErrorResponse"));
    }

    #[test]
    fn transactions_document_lists_workflow_endpoints() {
        let json = serde_json::to_string(&TransactionsApiDoc::openapi()).unwrap();
        assert!(json.contains("/transactions/history/{product_id}"));
        assert!(json.contains("NewTransaction"));
    }
}
