//! API request and response types
//!
//! All types are framework-agnostic and can be used by any client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{TodoPatch, serialize_timestamp};

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Request body for creating a todo
///
/// `text` is optional at the parsing level so a missing field reports the
/// same validation error as an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    /// Todo text
    #[serde(default)]
    pub text: Option<String>,
    /// Initial completion flag (defaults to false)
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Request body for updating a todo (all fields optional)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    /// New text
    #[serde(default)]
    pub text: Option<String>,
    /// New completion flag
    #[serde(default)]
    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(req: UpdateTodoRequest) -> Self {
        Self {
            text: req.text,
            completed: req.completed,
        }
    }
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthData {
    /// Always `OK` while the process is serving
    pub status: String,
    /// Server time when the check was answered
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}
