use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};
use tracing::{error, info, instrument};
use validator::Validate;

use crate::{
    common::HistoryParams,
    db::DbPool,
    entities::{
        product::{self, Column as ProductColumn, Entity as Product},
        transaction,
    },
    errors::ServiceError,
    models::{Page, PageRequest},
    services::transaction_history::TransactionHistoryClient,
};

/// Service for managing products
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
    history: TransactionHistoryClient,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>, history: TransactionHistoryClient) -> Self {
        Self { db_pool, history }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;
        Product::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    /// Page of products in id order
    #[instrument(skip(self))]
    pub async fn list(&self, page: PageRequest) -> Result<Page<product::Model>, ServiceError> {
        let db = &*self.db_pool;

        let total = Product::find().count(db).await.map_err(|e| {
            error!("Failed to count products: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let items = Product::find()
            .order_by_asc(ProductColumn::Id)
            .offset(page.offset())
            .limit(page.page_size)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to list products: {}", e);
                ServiceError::DatabaseError(e)
            })?;

        Ok(Page { items, total })
    }

    /// Stores a new product; any id in the input is ignored
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: product::Model) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db_pool;
        let created = product::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            stock: Set(input.stock),
            price: Set(input.price),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!("Failed to create product: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        info!(product_id = created.id, "Product created");
        Ok(created)
    }

    /// Full-record replacement. The body must carry the same id as the path.
    #[instrument(skip(self, input), fields(stock = input.stock))]
    pub async fn replace(&self, id: i32, input: product::Model) -> Result<(), ServiceError> {
        if input.id != id {
            return Err(ServiceError::BadRequest(format!(
                "Product id {} does not match path id {}",
                input.id, id
            )));
        }
        input.validate()?;

        let db = &*self.db_pool;
        let result = product::ActiveModel {
            id: Set(id),
            name: Set(input.name),
            stock: Set(input.stock),
            price: Set(input.price),
        }
        .update(db)
        .await;

        match result {
            Ok(_) => {
                info!(product_id = id, "Product replaced");
                Ok(())
            }
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => {
                Err(ServiceError::NotFound(format!("Product {} not found", id)))
            }
            Err(e) => {
                error!("Failed to replace product {}: {}", id, e);
                Err(ServiceError::DatabaseError(e))
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = Product::delete_by_id(id).exec(db).await.map_err(|e| {
            error!("Failed to delete product {}: {}", id, e);
            ServiceError::DatabaseError(e)
        })?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Product {} not found", id)));
        }

        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Transaction history of a product, read from the Transaction Service
    pub async fn history(
        &self,
        id: i32,
        params: &HistoryParams,
    ) -> Result<Vec<transaction::Model>, ServiceError> {
        self.history.history(id, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceKind;
    use crate::db::{establish_connection_with_config, run_migrations, DbConfig};
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    async fn service() -> ProductService {
        let pool = establish_connection_with_config(&DbConfig::in_memory())
            .await
            .unwrap();
        run_migrations(&pool, ServiceKind::Products).await.unwrap();
        // Nothing listens here; history is covered against a live peer elsewhere
        ProductService::new(
            Arc::new(pool),
            TransactionHistoryClient::new("http://127.0.0.1:9"),
        )
    }

    fn draft(name: &str, stock: i32) -> product::Model {
        product::Model {
            id: 0,
            name: name.to_string(),
            stock,
            price: dec!(2.5),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_ignores_caller_id() {
        let service = service().await;
        let mut input = draft("Widget", 5);
        input.id = 77;

        let created = service.create(input).await.unwrap();
        assert_ne!(created.id, 77);
        assert_eq!(service.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn create_validates_name() {
        let service = service().await;
        assert_matches!(
            service.create(draft("", 1)).await,
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            service.create(draft(&"x".repeat(256), 1)).await,
            Err(ServiceError::ValidationError(_))
        );
    }

    #[tokio::test]
    async fn replace_overwrites_the_record() {
        let service = service().await;
        let created = service.create(draft("Widget", 5)).await.unwrap();

        let replacement = product::Model {
            stock: 2,
            name: "Widget v2".into(),
            ..created.clone()
        };
        service.replace(created.id, replacement.clone()).await.unwrap();
        assert_eq!(service.get(created.id).await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn replace_rejects_id_mismatch_and_missing_rows() {
        let service = service().await;
        let created = service.create(draft("Widget", 5)).await.unwrap();

        assert_matches!(
            service.replace(created.id + 1, created.clone()).await,
            Err(ServiceError::BadRequest(_))
        );

        let ghost = product::Model {
            id: 999,
            ..created
        };
        assert_matches!(
            service.replace(999, ghost).await,
            Err(ServiceError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let service = service().await;
        let created = service.create(draft("Widget", 5)).await.unwrap();

        service.delete(created.id).await.unwrap();
        assert_matches!(service.get(created.id).await, Err(ServiceError::NotFound(_)));
        assert_matches!(service.delete(created.id).await, Err(ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_reports_total_and_window() {
        let service = service().await;
        for i in 0..5 {
            service.create(draft(&format!("P{}", i), i)).await.unwrap();
        }

        let page = service.list(PageRequest::new(1, 2).unwrap()).await.unwrap();
        assert_eq!(page.total, 5);
        let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["P2", "P3"]);
    }
}
