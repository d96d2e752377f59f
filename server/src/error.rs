//! Error taxonomy for the HTTP API.
//!
//! # Design
//! Every failure crosses the wire as `{"error": "<message>"}` with the
//! status derived from the variant. Validation messages name the offending
//! field; the 500 arm logs the detail and sends a generic body so internal
//! state never leaks to the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by store operations and request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or an input value is invalid.
    #[error("{0}")]
    Validation(String),

    /// No record with the requested id.
    #[error("Todo not found")]
    NotFound,

    /// Underlying storage failure. The in-memory store never produces this;
    /// it is part of the contract for storage backends that can actually
    /// fail.
    #[error("storage failure: {0}")]
    Internal(String),
}

/// JSON body shape shared by every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Todo not found".to_string()),
            ApiError::Internal(detail) => {
                tracing::error!("storage failure: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong!".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
