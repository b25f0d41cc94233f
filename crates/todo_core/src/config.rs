//! Store configuration.
//!
//! # Responsibility
//! - Name the blob key the collection is persisted under.
//! - Choose the blob encoding (compact or pretty JSON).
//!
//! # Invariants
//! - `storage_key` is trimmed and non-empty.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Blob key used by earlier browser builds; kept so stored lists carry over.
pub const DEFAULT_STORAGE_KEY: &str = "enhancedTodos";

/// Errors raised while building a [`StoreConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyStorageKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorageKey => write!(f, "storage key cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Settings for one [`crate::TodoStore`] instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    storage_key: String,
    /// Writes indented JSON when set. Loading accepts either form.
    pub pretty_json: bool,
}

impl StoreConfig {
    /// Creates a config for a custom storage key.
    ///
    /// # Errors
    /// - `EmptyStorageKey` when `storage_key` is blank.
    pub fn new(storage_key: &str) -> Result<Self, ConfigError> {
        let trimmed = storage_key.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(Self {
            storage_key: trimmed.to_string(),
            pretty_json: false,
        })
    }

    /// Builder-style toggle for pretty JSON output.
    pub fn with_pretty_json(mut self, pretty_json: bool) -> Self {
        self.pretty_json = pretty_json;
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            pretty_json: false,
        }
    }
}
