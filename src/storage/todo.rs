//! Todo storage
//!
//! Holds the authoritative list of todos in process memory. The list and the
//! id counter sit behind one mutex so the store can be shared between server
//! worker threads; every operation holds the lock for its whole extent.

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::models::{Todo, TodoPatch};

/// Errors returned by store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Text was missing, empty or whitespace-only
    #[error("todo text is required")]
    EmptyText,

    /// No live todo has this id
    #[error("todo '{0}' not found")]
    NotFound(String),
}

#[derive(Debug)]
struct Inner {
    todos: Vec<Todo>,
    next_id: u64,
}

impl Inner {
    /// Ids are never reissued, even after a delete
    fn allocate_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.todos
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

/// In-memory, insertion-ordered todo store
#[derive(Debug)]
pub struct TodoStore {
    inner: Mutex<Inner>,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    /// Create an empty store
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                todos: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a store holding the two demo todos a fresh install starts with
    #[must_use]
    pub fn seeded() -> Self {
        let mut inner = Inner {
            todos: Vec::new(),
            next_id: 1,
        };
        for text in ["Learn React", "Build CI/CD Pipeline"] {
            let id = inner.allocate_id();
            inner.todos.push(Todo::new(id, text, false));
        }
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Lock the collection. No operation panics while holding the guard,
    /// so a poisoned lock still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All todos in insertion order
    #[must_use]
    pub fn list(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    /// Look up a single todo
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Todo> {
        self.lock().todos.iter().find(|t| t.id == id).cloned()
    }

    /// Number of live todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().todos.len()
    }

    /// True if there are no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a new todo
    ///
    /// The text is trimmed before it is stored.
    pub fn create(&self, text: &str, completed: bool) -> Result<Todo, StoreError> {
        let text = normalize_text(text)?;

        let mut inner = self.lock();
        let id = inner.allocate_id();
        let todo = Todo::new(id, text, completed);
        inner.todos.push(todo.clone());
        drop(inner);

        log::debug!("Created todo {}", todo.id);
        Ok(todo)
    }

    /// Apply a partial update to an existing todo
    ///
    /// Supplied text is trimmed and must not end up empty. `updatedAt` is
    /// refreshed whenever at least one field is set.
    pub fn update(&self, id: &str, patch: TodoPatch) -> Result<Todo, StoreError> {
        let TodoPatch { text, completed } = patch;

        let mut inner = self.lock();
        let index = inner.position(id)?;

        let patch = TodoPatch {
            text: text.map(|t| normalize_text(&t)).transpose()?,
            completed,
        };
        let todo = &mut inner.todos[index];
        let changed = todo.apply(patch);
        let updated = todo.clone();
        drop(inner);

        if changed {
            log::debug!("Updated todo {id}");
        }
        Ok(updated)
    }

    /// Remove a todo, keeping the order of the rest
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let index = inner.position(id)?;
        inner.todos.remove(index);
        drop(inner);

        log::debug!("Deleted todo {id}");
        Ok(())
    }
}

/// Trim todo text, rejecting anything that is empty afterwards
fn normalize_text(text: &str) -> Result<String, StoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyText);
    }
    Ok(trimmed.to_string())
}
