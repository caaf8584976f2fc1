//! Common response types for API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response helper for created resources: 201 with the bare representation
pub struct Created<T>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// Body returned by DELETE endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
    /// Number of rows removed
    pub deleted: u64,
}

impl DeletedResponse {
    pub fn new(deleted: u64, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            deleted,
        }
    }
}
