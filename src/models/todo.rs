//! Todo model
//!
//! A todo is one short line of text that can be ticked off.
//! Records serialize with camelCase keys because that is the shape
//! the browser client reads.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// A todo record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Opaque unique identifier, assigned by the store
    pub id: String,

    /// What needs to be done (trimmed, never empty)
    pub text: String,

    /// Whether the todo has been ticked off
    #[serde(default)]
    pub completed: bool,

    /// When this todo was created
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,

    /// When this todo was last changed; absent until the first update
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_timestamp"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Create a fresh, never-updated todo
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>, completed: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Apply a patch, returning whether any field was set
    ///
    /// The caller is responsible for validating `patch.text`.
    pub fn apply(&mut self, patch: TodoPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = Some(Utc::now());
        true
    }
}

/// A partial update to a todo
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// Replacement text
    pub text: Option<String>,
    /// Replacement completion flag
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// A patch that only sets the completion flag
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }

    /// A patch that only replaces the text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    /// True if the patch sets no field
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }
}

/// Format a timestamp the way browsers print `Date.toISOString()`
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize a timestamp as ISO-8601 with millisecond precision
pub fn serialize_timestamp<S: Serializer>(
    ts: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

#[allow(clippy::ref_option)] // serialize_with always passes &Option<T>
fn serialize_optional_timestamp<S: Serializer>(
    ts: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => serialize_timestamp(ts, serializer),
        None => serializer.serialize_none(),
    }
}
