//! HTTP todo service.
//!
//! # Overview
//! A JSON CRUD API over a single todo collection: listing with filtering,
//! sorting and pagination, single-record reads and partial updates, a
//! completion toggle, bulk deletion of completed records, aggregate counts
//! and a liveness probe.
//!
//! # Design
//! - [`TodoStore`] owns every record; handlers hold no state of their own
//!   and call exactly one store operation each.
//! - `app()` builds the full `Router` so tests can drive the service
//!   in-process with `tower::ServiceExt`, while `run()` serves it on a real
//!   listener.
//! - Errors cross the wire as `{"error": "<message>"}` with the status
//!   mapped from the [`ApiError`] variant.

pub mod error;
pub mod handlers;
pub mod model;
pub mod store;

use axum::routing::{get, patch};
use axum::Router;
use tokio::net::TcpListener;

pub use error::ApiError;
pub use model::{CreateTodo, Priority, Todo, UpdateTodo};
pub use store::TodoStore;

/// Build the service router with a fresh, empty store.
pub fn app() -> Router {
    let store = TodoStore::new();
    Router::new()
        .route(
            "/api/todos",
            get(handlers::list_todos)
                .post(handlers::create_todo)
                .delete(handlers::delete_completed),
        )
        .route(
            "/api/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route("/api/todos/{id}/toggle", patch(handlers::toggle_todo))
        .route("/api/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        .fallback(handlers::route_not_found)
        .with_state(store)
}

/// Serve `app()` on the given listener.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
