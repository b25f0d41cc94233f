//! Core use-case services.
//!
//! # Responsibility
//! - Own in-memory state and orchestrate persistence through repositories.
//! - Keep presentation layers decoupled from storage details.

pub mod todo_store;
