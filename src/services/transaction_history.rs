use tracing::{instrument, warn};

use crate::common::HistoryParams;
use crate::entities::transaction;
use crate::errors::ServiceError;

/// Client the Product Store uses to read a product's history from the Transaction Service.
#[derive(Clone, Debug)]
pub struct TransactionHistoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl TransactionHistoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Forwards the filters unchanged. An empty or `null` answer is an empty history.
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        product_id: i32,
        params: &HistoryParams,
    ) -> Result<Vec<transaction::Model>, ServiceError> {
        let url = format!("{}/transactions/history/{}", self.base_url, product_id);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!("Transaction service unavailable: {}", e);
                ServiceError::ExternalServiceError(format!(
                    "Transaction service unavailable: {}",
                    e
                ))
            })?;

        if !resp.status().is_success() {
            return Err(ServiceError::upstream(
                resp.status().as_u16(),
                format!("Transaction service returned {}", resp.status()),
            ));
        }

        let body = resp.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let items: Option<Vec<transaction::Model>> = serde_json::from_slice(&body).map_err(|e| {
            ServiceError::ExternalServiceError(format!("Invalid history response: {}", e))
        })?;
        Ok(items.unwrap_or_default())
    }
}
