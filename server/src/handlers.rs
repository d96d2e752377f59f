//! HTTP request handlers.
//!
//! One handler per (method, route) pair. Each handler validates its input,
//! invokes exactly one store operation and maps the outcome to a response;
//! error statuses come from [`ApiError`]'s `IntoResponse` impl.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ErrorBody};
use crate::model::{
    CreateTodo, DeletedTodos, Pagination, Priority, Stats, Todo, TodoPage, UpdateTodo,
};
use crate::store::{ListOptions, Sort, TodoStore};

/// Query parameters accepted by `GET /api/todos`. Malformed values (a
/// non-boolean `completed`, an unknown `priority`) are rejected by the
/// extractor before the handler runs.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub sort: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

pub async fn list_todos(
    State(store): State<TodoStore>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TodoPage>, ApiError> {
    let sort = match query.sort.as_deref() {
        Some(raw) => Sort::parse(raw)?,
        None => Sort::default(),
    };
    let options = ListOptions {
        completed: query.completed,
        priority: query.priority,
        sort,
        page: query.page.max(1),
        limit: query.limit.max(1),
    };
    let (todos, total) = store.list(&options).await;
    Ok(Json(TodoPage {
        todos,
        pagination: Pagination {
            current: options.page,
            pages: total.div_ceil(options.limit),
            total,
        },
    }))
}

pub async fn get_todo(
    State(store): State<TodoStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, ApiError> {
    store.get(id).await.map(Json)
}

pub async fn create_todo(
    State(store): State<TodoStore>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = store.create(input).await?;
    tracing::debug!(id = %todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(store): State<TodoStore>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, ApiError> {
    store.update(id, input).await.map(Json)
}

pub async fn toggle_todo(
    State(store): State<TodoStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, ApiError> {
    store.toggle(id).await.map(Json)
}

pub async fn delete_todo(
    State(store): State<TodoStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, ApiError> {
    let todo = store.delete(id).await?;
    tracing::debug!(id = %todo.id, "deleted todo");
    Ok(Json(todo))
}

pub async fn delete_completed(State(store): State<TodoStore>) -> Json<DeletedTodos> {
    let deleted = store.delete_completed().await;
    tracing::debug!(count = deleted.len(), "deleted completed todos");
    Json(DeletedTodos {
        message: format!("Deleted {} completed todos", deleted.len()),
        deleted_todos: deleted,
    })
}

pub async fn stats(State(store): State<TodoStore>) -> Json<Stats> {
    Json(store.stats().await)
}

/// Liveness probe response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Route not found".to_string(),
        }),
    )
}
