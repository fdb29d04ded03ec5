use crate::errors::ServiceError;
use crate::models::PageRequest;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Created response carrying the new resource's location
pub fn created_response<T: Serialize>(location: String, data: T) -> Response {
    let mut response = (StatusCode::CREATED, Json(data)).into_response();
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Pagination parameters for list operations (zero-based page)
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Zero-based page index, default 0
    pub page: Option<u64>,
    /// Items per page, at least 1
    pub page_size: Option<u64>,
}

impl PaginationParams {
    pub fn to_page_request(&self, default_page_size: u64) -> Result<PageRequest, ServiceError> {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.page_size.unwrap_or(default_page_size),
        )
    }
}
