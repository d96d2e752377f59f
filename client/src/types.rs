//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently so
//! the client crate has no compile-time dependency on server internals;
//! integration tests catch any schema drift between the two crates. The
//! wire format is camelCase JSON with lowercase priority values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Request payload for creating a new todo. Omitted optional fields fall
/// back to the server's defaults (`priority` becomes medium).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Request payload for a partial update. Only the fields present in the
/// JSON are applied; omitted fields remain unchanged on the server. The
/// double-wrapped fields serialize `Some(None)` as an explicit `null`,
/// which clears the field server-side.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Query parameters for the list operation. `None` fields are omitted from
/// the query string. `sort` takes a field name with an optional leading `-`
/// for descending, e.g. `-createdAt`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// One page of records plus the pagination envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub current: u64,
    pub pages: u64,
    pub total: u64,
}

/// Aggregate counts over the whole store.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub counts_by_priority: PriorityCounts,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct PriorityCounts {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Response of the bulk delete of completed todos.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTodos {
    pub message: String,
    pub deleted_todos: Vec<Todo>,
}

/// Liveness probe response.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Body shape of every error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
