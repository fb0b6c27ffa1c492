//! Pure API handlers
//!
//! These handlers contain business logic and are HTTP-agnostic.
//! They take typed input and return `Result<T, ApiError>`.

use chrono::Utc;

use crate::models::Todo;
use crate::storage::TodoStore;

use super::error::ApiError;
use super::types::{CreateTodoRequest, HealthData, UpdateTodoRequest};

// =============================================================================
// HEALTH
// =============================================================================

/// Report that the service is up
#[must_use]
pub fn health() -> HealthData {
    HealthData {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    }
}

// =============================================================================
// TODOS
// =============================================================================

/// List all todos in insertion order
#[must_use]
pub fn list_todos(store: &TodoStore) -> Vec<Todo> {
    store.list()
}

/// Create a new todo
pub fn create_todo(store: &TodoStore, req: CreateTodoRequest) -> Result<Todo, ApiError> {
    let text = req.text.unwrap_or_default();
    let completed = req.completed.unwrap_or(false);
    Ok(store.create(&text, completed)?)
}

/// Update text and/or completion of an existing todo
pub fn update_todo(store: &TodoStore, id: &str, req: UpdateTodoRequest) -> Result<Todo, ApiError> {
    Ok(store.update(id, req.into())?)
}

/// Delete a todo
pub fn delete_todo(store: &TodoStore, id: &str) -> Result<(), ApiError> {
    Ok(store.delete(id)?)
}
