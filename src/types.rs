//! Type definitions for the todo service
//!
//! This module contains all type definitions organized by category.

/// Schemaless document types shared by every store backend
pub mod document;
/// The todo record and its input shapes
pub mod todo;

// Re-export commonly used types for convenience
pub use document::{Document, Filter, Namespace, ObjectId, StoredDocument};
pub use todo::{DeleteOutcome, NewTodo, Todo, TodoId, TodoPatch, TodoQuery, UpdateOutcome};
