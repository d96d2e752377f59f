//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `Validation` get dedicated variants because callers handle
//! "the record does not exist" and "the server rejected my input"
//! differently from transport-level surprises; `Validation` carries the
//! server's human-readable message from the 400 body. All other non-2xx
//! responses land in `HttpError` with the raw status code and body for
//! debugging.

use std::fmt;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned 404 — the requested todo does not exist.
    NotFound,

    /// The server returned 400 — the request failed validation. Carries
    /// the `error` message from the response body.
    Validation(String),

    /// The server returned a non-2xx status other than 400/404.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized.
    SerializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "resource not found"),
            ApiError::Validation(message) => {
                write!(f, "validation failed: {message}")
            }
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
