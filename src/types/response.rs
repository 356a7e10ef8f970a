use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::pagination::{Paginated, PaginationMeta};

/// Success envelope shared by every endpoint.
///
/// Failures use [`crate::errors::ErrorResponse`], which has the same
/// `success`/`message` keys with `success: false`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            pagination: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn paginated(page: Paginated<T>) -> Self {
        Self {
            success: true,
            data: Some(page.data),
            message: None,
            pagination: Some(page.meta),
        }
    }
}

/// Created response helper (common pattern for POST endpoints)
pub struct Created<T: Serialize>(pub ApiResponse<T>);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}
