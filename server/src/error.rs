//! Request-level failures and their HTTP mapping.
//!
//! Store faults are logged with their cause and surfaced as a generic 500;
//! the caller never sees driver messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::store::StoreError;
use crate::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Todo not found")]
    NotFound,

    #[error("Invalid todo id: {0}")]
    InvalidId(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match &self {
            ApiError::NotFound => self.to_string(),
            ApiError::InvalidId(_) => "Invalid todo id".to_string(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Store(cause) => {
                tracing::error!(error = %cause, "store operation failed");
                "Internal server error".to_string()
            }
        };
        (self.status(), Json(ErrorResponse { error })).into_response()
    }
}
