//! Storage for todos
//!
//! Todos live in process memory only; restarting the server starts a fresh
//! list.

/// In-memory todo storage
pub mod todo;

pub use todo::{StoreError, TodoStore};
