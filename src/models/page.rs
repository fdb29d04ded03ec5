use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// One page of a listing plus the size of the whole set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Zero-based page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Result<Self, ServiceError> {
        if page_size == 0 {
            return Err(ServiceError::BadRequest(
                "pageSize must be at least 1".to_string(),
            ));
        }
        Ok(Self { page, page_size })
    }

    /// Rows to skip
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.page_size)
    }
}
