//! In-memory todo store.
//!
//! # Design
//! `TodoStore` owns the record collection behind a `tokio::sync::RwLock` and
//! is the only component that mutates it. Every operation takes the lock
//! exactly once, so each is atomic with respect to the others. Input is
//! validated before anything is touched: a rejected create or update leaves
//! the store exactly as it was.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;
use crate::model::{CreateTodo, Priority, PriorityCounts, Stats, Todo, UpdateTodo};

const MAX_TITLE_CHARS: usize = 200;
const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Shared, clonable handle to the record collection.
#[derive(Debug, Clone, Default)]
pub struct TodoStore {
    inner: Arc<RwLock<HashMap<Uuid, Todo>>>,
}

/// Filtering, ordering and pagination for [`TodoStore::list`].
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub sort: Sort,
    /// 1-based page number.
    pub page: u64,
    pub limit: u64,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            completed: None,
            priority: None,
            sort: Sort::default(),
            page: 1,
            limit: 10,
        }
    }
}

/// Sort order for [`TodoStore::list`], parsed from the wire form the API
/// accepts: a field name with an optional leading `-` for descending
/// (`createdAt`, `-createdAt`, `dueDate`, `title`, `priority`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub descending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    DueDate,
    Title,
    Priority,
}

impl Default for Sort {
    /// Newest first.
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            descending: true,
        }
    }
}

impl Sort {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let (name, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        let key = match name {
            "createdAt" => SortKey::CreatedAt,
            "dueDate" => SortKey::DueDate,
            "title" => SortKey::Title,
            "priority" => SortKey::Priority,
            _ => {
                return Err(ApiError::Validation(format!("Invalid sort field: {name}")));
            }
        };
        Ok(Self { key, descending })
    }
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// One page of records matching the filter, plus the total match count
    /// before pagination.
    pub async fn list(&self, options: &ListOptions) -> (Vec<Todo>, u64) {
        let todos = self.inner.read().await;
        let mut matched: Vec<Todo> = todos
            .values()
            .filter(|todo| {
                options
                    .completed
                    .is_none_or(|completed| todo.completed == completed)
            })
            .filter(|todo| {
                options
                    .priority
                    .is_none_or(|priority| todo.priority == priority)
            })
            .cloned()
            .collect();
        drop(todos);

        matched.sort_by(|a, b| {
            let ordering = match options.sort.key {
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::DueDate => a.due_date.cmp(&b.due_date),
                SortKey::Title => a.title.cmp(&b.title),
                SortKey::Priority => a.priority.cmp(&b.priority),
            }
            // ties fall back to creation time, then id, so pages are stable
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id));
            if options.sort.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        let total = matched.len() as u64;
        let skip = options.page.saturating_sub(1).saturating_mul(options.limit);
        let page = matched
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(options.limit).unwrap_or(usize::MAX))
            .collect();
        (page, total)
    }

    pub async fn get(&self, id: Uuid) -> Result<Todo, ApiError> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    /// Validates the input, assigns an id and sets both timestamps to the
    /// same instant. New records always start pending.
    pub async fn create(&self, input: CreateTodo) -> Result<Todo, ApiError> {
        let title = validate_title(&input.title)?;
        let description = validate_description(input.description)?;

        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4(),
            title,
            description,
            completed: false,
            priority: input.priority,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.insert(todo.id, todo.clone());
        Ok(todo)
    }

    /// Applies only the fields present in the input; `updatedAt` is always
    /// refreshed on success. Validation runs before the record is touched.
    pub async fn update(&self, id: Uuid, input: UpdateTodo) -> Result<Todo, ApiError> {
        let title = match input.title {
            Some(title) => Some(validate_title(&title)?),
            None => None,
        };
        let description = match input.description {
            Some(description) => Some(validate_description(description)?),
            None => None,
        };

        let mut todos = self.inner.write().await;
        let todo = todos.get_mut(&id).ok_or(ApiError::NotFound)?;
        if let Some(title) = title {
            todo.title = title;
        }
        if let Some(completed) = input.completed {
            todo.completed = completed;
        }
        if let Some(priority) = input.priority {
            todo.priority = priority;
        }
        if let Some(description) = description {
            todo.description = description;
        }
        if let Some(due_date) = input.due_date {
            todo.due_date = due_date;
        }
        todo.updated_at = Utc::now();
        Ok(todo.clone())
    }

    pub async fn toggle(&self, id: Uuid) -> Result<Todo, ApiError> {
        let mut todos = self.inner.write().await;
        let todo = todos.get_mut(&id).ok_or(ApiError::NotFound)?;
        todo.completed = !todo.completed;
        todo.updated_at = Utc::now();
        Ok(todo.clone())
    }

    /// Removes the record and returns it.
    pub async fn delete(&self, id: Uuid) -> Result<Todo, ApiError> {
        self.inner
            .write()
            .await
            .remove(&id)
            .ok_or(ApiError::NotFound)
    }

    /// Removes every completed record in one locked pass and returns them in
    /// creation order.
    pub async fn delete_completed(&self) -> Vec<Todo> {
        let mut todos = self.inner.write().await;
        let mut removed: Vec<Todo> = Vec::new();
        todos.retain(|_, todo| {
            if todo.completed {
                removed.push(todo.clone());
                false
            } else {
                true
            }
        });
        removed.sort_by_key(|todo| todo.created_at);
        removed
    }

    pub async fn stats(&self) -> Stats {
        let todos = self.inner.read().await;
        let total = todos.len() as u64;
        let mut completed = 0;
        let mut counts = PriorityCounts::default();
        for todo in todos.values() {
            if todo.completed {
                completed += 1;
            }
            match todo.priority {
                Priority::Low => counts.low += 1,
                Priority::Medium => counts.medium += 1,
                Priority::High => counts.high += 1,
            }
        }
        Stats {
            total,
            completed,
            pending: total - completed,
            counts_by_priority: counts,
        }
    }
}

fn validate_title(raw: &str) -> Result<String, ApiError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::Validation(format!(
            "Title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

/// Trims the description; an empty-after-trim value is stored as absent.
fn validate_description(raw: Option<String>) -> Result<Option<String>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let description = raw.trim();
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(ApiError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    if description.is_empty() {
        return Ok(None);
    }
    Ok(Some(description.to_string()))
}
