//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record and its persisted wire shape.
//! - Provide text normalization used for validation and duplicate checks.
//!
//! # Invariants
//! - `id` is assigned once and never reused for another todo.
//! - `text` is trimmed and non-empty.
//! - `created_at` is set at construction and never changes.
//! - Deserialization trims text and rejects records that still break the
//!   invariants above.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one todo.
///
/// Kept as an opaque string so records written by older clients (which used
/// timestamp + random suffix ids) load unchanged. New ids are UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Generates a fresh collision-resistant id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TodoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Validation failures for todo text and identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Text is empty after trimming.
    EmptyText,
    /// Another todo already uses the same text, ignoring case.
    DuplicateText(String),
    /// Identifier is empty after trimming.
    EmptyId,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "todo text cannot be empty"),
            Self::DuplicateText(text) => write!(f, "a todo with text `{text}` already exists"),
            Self::EmptyId => write!(f, "todo id cannot be empty"),
        }
    }
}

impl Error for TodoValidationError {}

/// One item of the todo list.
///
/// Serialized with camelCase field names (`id`, `text`, `completed`,
/// `createdAt`) to stay compatible with previously stored collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TodoRecord")]
pub struct Todo {
    pub id: TodoId,
    /// Display text, always trimmed.
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a pending todo with a generated id and the current timestamp.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank.
    pub fn new(text: &str) -> Result<Self, TodoValidationError> {
        Self::with_id(TodoId::generate(), text, Utc::now())
    }

    /// Creates a pending todo with caller-provided identity and timestamp.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(
        id: TodoId,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TodoValidationError> {
        let todo = Self {
            id,
            text: text.trim().to_string(),
            completed: false,
            created_at,
        };
        todo.validate()?;
        Ok(todo)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.id.is_blank() {
            return Err(TodoValidationError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(TodoValidationError::EmptyText);
        }
        Ok(())
    }

    /// Key used for case-insensitive duplicate detection.
    pub fn match_key(&self) -> String {
        match_key(&self.text)
    }
}

/// Normalizes text for duplicate comparison: trimmed and lowercased.
pub fn match_key(text: &str) -> String {
    text.trim().to_lowercase()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoRecord {
    id: TodoId,
    text: String,
    #[serde(default)]
    completed: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<TodoRecord> for Todo {
    type Error = TodoValidationError;

    fn try_from(value: TodoRecord) -> Result<Self, Self::Error> {
        let todo = Self {
            id: value.id,
            text: value.text.trim().to_string(),
            completed: value.completed,
            created_at: value.created_at,
        };
        todo.validate()?;
        Ok(todo)
    }
}
