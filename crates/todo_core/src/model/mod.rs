//! Domain model for the todo list.
//!
//! # Responsibility
//! - Define the canonical `Todo` record and its identity type.
//! - Define query-side value types (filter status, aggregate stats).
//!
//! # Invariants
//! - Every todo is identified by a stable, non-empty `TodoId`.
//! - Stored text is trimmed and never empty.

pub mod query;
pub mod todo;
