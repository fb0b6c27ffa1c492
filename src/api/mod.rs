//! HTTP-agnostic API layer
//!
//! This module provides typed request/response structures and pure business logic
//! handlers that can be used by any HTTP server implementation or directly by
//! tests.
//!
//! ## Design
//!
//! - **Handlers are pure functions**: Take the store and typed input, return `Result<T, ApiError>`
//! - **Types are framework-agnostic**: No HTTP types leak into this module
//! - **Errors carry HTTP semantics**: `ApiError` knows its status code for translation

mod error;
mod handlers;
mod types;

pub use error::{ApiError, ErrorBody, ErrorCode, GENERIC_ERROR_MESSAGE};
pub use handlers::{create_todo, delete_todo, health, list_todos, update_todo};
pub use types::{CreateTodoRequest, HealthData, UpdateTodoRequest};
