//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the client
//! deterministic and free of I/O dependencies. Status interpretation runs
//! before deserialization: 404 becomes `NotFound`, 400 becomes `Validation`
//! with the server's message, everything else non-2xx becomes `HttpError`.

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CreateTodo, DeletedTodos, ErrorBody, Health, ListQuery, Stats, Todo, TodoPage, UpdateTodo,
};

/// Synchronous, stateless client for the todo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self, query: &ListQuery) -> Result<HttpRequest, ApiError> {
        let query_string = serde_urlencoded::to_string(query)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let path = if query_string.is_empty() {
            format!("{}/api/todos", self.base_url)
        } else {
            format!("{}/api/todos?{query_string}", self.base_url)
        };
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_get_todo(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/todos", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_update_todo(&self, id: Uuid, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/api/todos/{id}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_toggle_todo(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}/api/todos/{id}/toggle", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_delete_todo(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/api/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_delete_completed(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/api/todos", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_stats(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/stats", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_health(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/health", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<TodoPage, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 201)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// The server answers a delete with the removed record.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_delete_completed(&self, response: HttpResponse) -> Result<DeletedTodos, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_stats(&self, response: HttpResponse) -> Result<Stats, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_health(&self, response: HttpResponse) -> Result<Health, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        400 => Err(ApiError::Validation(error_message(&response.body))),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

/// Pull the `error` field out of a JSON error body, falling back to the raw
/// body when it is not the expected shape.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| body.to_string())
}
