//! Blob persistence seam and its implementations.
//!
//! # Responsibility
//! - Define the key-value string contract the todo store persists through.
//! - Keep SQLite details out of the store/service layer.
//!
//! # Invariants
//! - `set` followed by `get` on the same key returns the written value.
//! - Implementations never interpret blob contents.

pub mod blob_store;
pub mod memory;
