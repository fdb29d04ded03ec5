use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use crate::entities::product;
use crate::errors::ServiceError;

/// Product Store operations the transaction workflow depends on.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Current product state; `None` when the store does not know the id.
    async fn get(&self, id: i32) -> Result<Option<product::Model>, ServiceError>;

    /// Replaces the whole product record.
    async fn replace(&self, id: i32, product: &product::Model) -> Result<(), ServiceError>;
}

/// `ProductStore` backed by the Product Store's HTTP API.
#[derive(Clone, Debug)]
pub struct HttpProductStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn product_url(&self, id: i32) -> String {
        format!("{}/products/{}", self.base_url, id)
    }
}

#[async_trait]
impl ProductStore for HttpProductStore {
    #[instrument(skip(self))]
    async fn get(&self, id: i32) -> Result<Option<product::Model>, ServiceError> {
        let resp = self
            .client
            .get(self.product_url(id))
            .send()
            .await
            .map_err(|e| {
                warn!("Product service unavailable: {}", e);
                ServiceError::ExternalServiceError(format!("Product service unavailable: {}", e))
            })?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!("Product {} not found upstream", id);
            return Ok(None);
        }

        if !resp.status().is_success() {
            return Err(ServiceError::upstream(
                resp.status().as_u16(),
                format!("Product service returned {}", resp.status()),
            ));
        }

        // A `null` body counts as not found
        resp.json::<Option<product::Model>>().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("Invalid product response: {}", e))
        })
    }

    #[instrument(skip(self, product), fields(stock = product.stock))]
    async fn replace(&self, id: i32, product: &product::Model) -> Result<(), ServiceError> {
        let resp = self
            .client
            .put(self.product_url(id))
            .json(product)
            .send()
            .await
            .map_err(|e| {
                warn!("Product service unavailable: {}", e);
                ServiceError::ExternalServiceError(format!("Product service unavailable: {}", e))
            })?;

        if !resp.status().is_success() {
            return Err(ServiceError::upstream(
                resp.status().as_u16(),
                "Error actualizando producto en ProductosService",
            ));
        }

        Ok(())
    }
}
