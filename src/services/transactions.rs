use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::{error, info, instrument, warn};

use crate::{
    common::{normalize_timestamp, HistoryFilter},
    db::DbPool,
    entities::{
        product,
        transaction::{self, Column as TransactionColumn, Entity as Transaction},
    },
    errors::ServiceError,
    models::{NewTransaction, Page, PageRequest, TransactionKind},
    services::product_store::ProductStore,
};

pub const PRODUCT_NOT_FOUND: &str = "Producto no encontrado";
pub const INSUFFICIENT_STOCK: &str = "Stock insuficiente";

/// Owns transaction records and drives the stock reconciliation with the Product Store.
///
/// Creation is a plain call chain across two stores: fetch, check, insert, push.
/// Nothing is rolled back if the final push fails, and concurrent creates for the
/// same product are not serialized.
#[derive(Clone)]
pub struct TransactionService {
    db_pool: Arc<DbPool>,
    products: Arc<dyn ProductStore>,
}

impl TransactionService {
    pub fn new(db_pool: Arc<DbPool>, products: Arc<dyn ProductStore>) -> Self {
        Self { db_pool, products }
    }

    /// Records a transaction and writes the resulting stock back to the Product Store.
    #[instrument(
        skip(self, input),
        fields(product_id = input.product_id, kind = %input.kind, quantity = input.quantity)
    )]
    pub async fn create(&self, input: NewTransaction) -> Result<transaction::Model, ServiceError> {
        let kind = TransactionKind::classify(&input.kind);
        let timestamp = normalize_timestamp(input.timestamp.as_deref(), Utc::now())?;
        let total_price = Decimal::from(input.quantity)
            .checked_mul(input.unit_price)
            .ok_or_else(|| ServiceError::BadRequest("totalPrice is out of range".to_string()))?;

        let product = match self.products.get(input.product_id).await? {
            Some(product) => product,
            None => {
                warn!("Rejected transaction: product {} not found", input.product_id);
                counter!("transactions.rejected", 1);
                return Err(ServiceError::InvalidReference(PRODUCT_NOT_FOUND.to_string()));
            }
        };

        let stock_actual = product.stock;
        if kind.exceeds_stock(input.quantity, stock_actual) {
            warn!(
                stock = stock_actual,
                "Rejected sale of {} units: insufficient stock", input.quantity
            );
            counter!("transactions.rejected", 1);
            return Err(ServiceError::InsufficientStock(INSUFFICIENT_STOCK.to_string()));
        }

        let new_stock = kind
            .apply(stock_actual, input.quantity)
            .ok_or_else(|| ServiceError::BadRequest("Resulting stock is out of range".to_string()))?;

        let db = &*self.db_pool;
        let saved = transaction::ActiveModel {
            id: NotSet,
            timestamp: Set(timestamp),
            kind: Set(input.kind),
            product_id: Set(input.product_id),
            quantity: Set(input.quantity),
            unit_price: Set(input.unit_price),
            total_price: Set(total_price),
            note: Set(input.note),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!("Failed to insert transaction: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let updated = product::Model {
            stock: new_stock,
            ..product
        };
        if let Err(e) = self.products.replace(saved.product_id, &updated).await {
            // The row above stays; stock is left at its previous value
            error!(
                transaction_id = saved.id,
                error = %e,
                "Transaction persisted but product stock update failed"
            );
            counter!("transactions.stock_push_failed", 1);
            return Err(e);
        }

        counter!("transactions.created", 1);
        info!(
            transaction_id = saved.id,
            stock_before = stock_actual,
            stock_after = new_stock,
            "Transaction created"
        );
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<transaction::Model, ServiceError> {
        let db = &*self.db_pool;
        Transaction::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Transaction {} not found", id)))
    }

    /// Page of transactions in id order
    #[instrument(skip(self))]
    pub async fn list(&self, page: PageRequest) -> Result<Page<transaction::Model>, ServiceError> {
        let db = &*self.db_pool;

        let total = Transaction::find().count(db).await.map_err(|e| {
            error!("Failed to count transactions: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let items = Transaction::find()
            .order_by_asc(TransactionColumn::Id)
            .offset(page.offset())
            .limit(page.page_size)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to list transactions: {}", e);
                ServiceError::DatabaseError(e)
            })?;

        Ok(Page { items, total })
    }

    /// All transactions of a product matching the filter, unpaginated
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        product_id: i32,
        filter: &HistoryFilter,
    ) -> Result<Vec<transaction::Model>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = Transaction::find().filter(TransactionColumn::ProductId.eq(product_id));
        if let Some(from) = filter.from {
            query = query.filter(TransactionColumn::Timestamp.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(TransactionColumn::Timestamp.lte(to));
        }
        if let Some(kind) = &filter.kind {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(TransactionColumn::Kind))).eq(kind.as_str()),
            );
        }

        let items = query
            .order_by_asc(TransactionColumn::Id)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to query transaction history: {}", e);
                ServiceError::DatabaseError(e)
            })?;

        info!(count = items.len(), "History query served");
        Ok(items)
    }
}
