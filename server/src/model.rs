//! Domain model and wire DTOs for the todo service.
//!
//! # Design
//! The wire format is JSON with camelCase keys (`createdAt`, `dueDate`, ...)
//! and lowercase priority values; Rust fields stay snake_case via serde
//! renames. `UpdateTodo` distinguishes "field absent" from "field set to
//! null": the clearable fields (`description`, `dueDate`) are double-wrapped
//! options where the outer level means present-in-JSON and the inner level
//! carries the value, so an explicit `null` clears the field while omitting
//! it leaves the field unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A single todo record.
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

/// Record priority. Variant order matters: ascending sorts yield low before
/// medium before high.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Request payload for creating a todo. `completed` is not accepted here;
/// new records always start pending.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

/// Request payload for a partial update. Omitted fields are left untouched;
/// for `description` and `dueDate` an explicit JSON `null` clears the field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Maps a key set to `null` to `Some(None)` and a key with a value to
/// `Some(Some(value))`; an absent key never reaches this function and stays
/// `None` via `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// One page of records plus the pagination envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number that was served.
    pub current: u64,
    /// Number of pages in the filtered set.
    pub pages: u64,
    /// Records matching the filter, before pagination.
    pub total: u64,
}

/// Aggregate counts over the whole store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub counts_by_priority: PriorityCounts,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorityCounts {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Response for the bulk delete of completed todos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTodos {
    pub message: String,
    pub deleted_todos: Vec<Todo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_todo() -> Todo {
        let now = Utc::now();
        Todo {
            id: Uuid::nil(),
            title: "Test".to_string(),
            description: None,
            completed: false,
            priority: Priority::Medium,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn todo_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample_todo()).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["title"], "Test");
        assert_eq!(json["completed"], false);
        assert_eq!(json["priority"], "medium");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn todo_omits_absent_optional_fields() {
        let json = serde_json::to_value(sample_todo()).unwrap();
        assert!(json.get("description").is_none());
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn todo_roundtrips_through_json() {
        let todo = Todo {
            description: Some("details".to_string()),
            completed: true,
            priority: Priority::High,
            ..sample_todo()
        };
        let json = serde_json::to_string(&todo).unwrap();
        let back: Todo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, todo);
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"priority":"high"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_todo_defaults_priority_to_medium() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No priority"}"#).unwrap();
        assert_eq!(input.priority, Priority::Medium);
        assert!(input.description.is_none());
        assert!(input.due_date.is_none());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.completed.is_none());
        assert!(input.priority.is_none());
        assert!(input.description.is_none());
        assert!(input.due_date.is_none());
    }

    #[test]
    fn update_todo_partial_fields() {
        let input: UpdateTodo = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert_eq!(input.completed, Some(true));
        assert!(input.title.is_none());
    }

    #[test]
    fn update_todo_null_clears_but_absent_skips() {
        let input: UpdateTodo = serde_json::from_str(r#"{"dueDate":null}"#).unwrap();
        assert_eq!(input.due_date, Some(None));
        assert!(input.description.is_none());

        let input: UpdateTodo =
            serde_json::from_str(r#"{"description":"keep","dueDate":"2026-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(input.description, Some(Some("keep".to_string())));
        assert!(matches!(input.due_date, Some(Some(_))));
    }

    #[test]
    fn priority_parses_lowercase_only() {
        let low: Priority = serde_json::from_str(r#""low""#).unwrap();
        assert_eq!(low, Priority::Low);
        let bad: Result<Priority, _> = serde_json::from_str(r#""Urgent""#);
        assert!(bad.is_err());
    }

    #[test]
    fn priority_orders_low_to_high() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }
}
