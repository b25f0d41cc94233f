//! Core domain logic for the todo list.
//! This crate is the single source of truth for list invariants; rendering
//! layers call into [`TodoStore`] and never mutate the collection directly.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::query::{FilterParseError, FilterStatus, TodoStats};
pub use model::todo::{Todo, TodoId, TodoValidationError};
pub use repo::blob_store::{BlobStore, RepoError, RepoResult, SqliteBlobStore};
pub use repo::memory::MemoryBlobStore;
pub use service::todo_store::{LoadError, LoadOutcome, StoreError, StoreResult, TodoStore};
