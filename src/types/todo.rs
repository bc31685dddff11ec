//! Todo record and the input shapes accepted at the service boundary
//!
//! `Todo` is what the store holds and what readers get back. `NewTodo`,
//! `TodoPatch` and `TodoQuery` are the validated inputs for create, update
//! and query; all three reject unknown fields.

use crate::core::error::{Error, Result};
use crate::storage::StoreError;
use crate::types::document::{Document, Filter};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sequential integer identity of a todo. This is the only public key.
pub type TodoId = i64;

/// Field names as persisted in the collection
pub mod fields {
    /// Sequential id
    pub const ID: &str = "id";
    /// Title
    pub const TITLE: &str = "title";
    /// Description
    pub const DESCRIPTION: &str = "description";
    /// Completion flag
    pub const COMPLETED: &str = "completed";
}

/// A stored todo record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Sequential id assigned at creation
    pub id: TodoId,
    /// Short title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Whether the task is done
    pub completed: bool,
}

impl Todo {
    /// Decode a todo from a stored document body
    pub fn from_document(doc: &Document) -> std::result::Result<Self, StoreError> {
        serde_json::from_value(Value::Object(doc.clone())).map_err(|e| {
            StoreError::corruption(format!("document does not hold a todo: {}", e))
        })
    }
}

/// Create request. A client-supplied `id` is accepted but never honored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTodo {
    /// Ignored; the allocator always assigns the id
    #[serde(default)]
    pub id: Option<TodoId>,
    /// Short title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Whether the task is done
    pub completed: bool,
}

impl NewTodo {
    /// Build a create request
    pub fn new(title: impl Into<String>, description: impl Into<String>, completed: bool) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            completed,
        }
    }

    /// Validate an arbitrary JSON value against the todo shape
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::validation(e.to_string()))
    }

    /// Document body without the id field; the id is set at insert time
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(fields::TITLE.into(), Value::from(self.title.as_str()));
        doc.insert(fields::DESCRIPTION.into(), Value::from(self.description.as_str()));
        doc.insert(fields::COMPLETED.into(), Value::from(self.completed));
        doc
    }
}

/// Partial update. Only the fields present are changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoPatch {
    /// Ids are immutable; if given it must equal the target id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TodoId>,
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New completion flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Patch that only flips the completion flag
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Validate an arbitrary JSON value against the patch shape
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::validation(e.to_string()))
    }

    /// Check the patch is applicable to the todo with `target` id
    pub fn validate_for(&self, target: TodoId) -> Result<()> {
        if let Some(id) = self.id {
            if id != target {
                return Err(Error::validation(format!(
                    "id is immutable: patch carries {} but targets {}",
                    id, target
                )));
            }
        }
        if self.to_set_document().is_empty() {
            return Err(Error::validation("patch must set at least one field"));
        }
        Ok(())
    }

    /// Fields to `$set`; the id is never part of it
    pub fn to_set_document(&self) -> Document {
        let mut doc = Document::new();
        if let Some(title) = &self.title {
            doc.insert(fields::TITLE.into(), Value::from(title.as_str()));
        }
        if let Some(description) = &self.description {
            doc.insert(fields::DESCRIPTION.into(), Value::from(description.as_str()));
        }
        if let Some(completed) = self.completed {
            doc.insert(fields::COMPLETED.into(), Value::from(completed));
        }
        doc
    }
}

/// Equality query over any subset of the four fields
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoQuery {
    /// Match on id
    #[serde(default)]
    pub id: Option<TodoId>,
    /// Match on title
    #[serde(default)]
    pub title: Option<String>,
    /// Match on description
    #[serde(default)]
    pub description: Option<String>,
    /// Match on completion flag
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TodoQuery {
    /// Query matching only the given completion state
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// True when no field is constrained
    pub fn is_empty(&self) -> bool {
        self.to_filter().is_empty()
    }

    /// Convert to a store filter
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::all();
        if let Some(id) = self.id {
            filter = filter.and(fields::ID, id);
        }
        if let Some(title) = &self.title {
            filter = filter.and(fields::TITLE, title.as_str());
        }
        if let Some(description) = &self.description {
            filter = filter.and(fields::DESCRIPTION, description.as_str());
        }
        if let Some(completed) = self.completed {
            filter = filter.and(fields::COMPLETED, completed);
        }
        filter
    }
}

/// Result of an update: `matched` records found, `modified` actually changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// Records matching the id (0 or 1)
    pub matched: u64,
    /// Records whose content changed (0 or 1)
    pub modified: u64,
}

/// Result of a delete
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Records removed
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_todo_accepts_and_keeps_client_id_out_of_document() {
        let todo = NewTodo::from_json(json!({
            "id": 42, "title": "A", "description": "d", "completed": false
        }))
        .unwrap();
        assert_eq!(todo.id, Some(42));
        assert!(!todo.to_document().contains_key(fields::ID));
    }

    #[test]
    fn test_new_todo_rejects_bad_shapes() {
        let unknown = NewTodo::from_json(json!({
            "title": "A", "description": "d", "completed": false, "bad": true
        }));
        assert!(matches!(unknown, Err(Error::Validation(_))));

        let missing = NewTodo::from_json(json!({"title": "A", "completed": false}));
        assert!(matches!(missing, Err(Error::Validation(_))));

        let wrong_type = NewTodo::from_json(json!({
            "title": "A", "description": "d", "completed": "yes"
        }));
        assert!(matches!(wrong_type, Err(Error::Validation(_))));
    }

    #[test]
    fn test_patch_validation() {
        assert!(TodoPatch::completed(true).validate_for(1).is_ok());
        assert!(matches!(TodoPatch::default().validate_for(1), Err(Error::Validation(_))));

        let same_id = TodoPatch { id: Some(1), ..TodoPatch::completed(true) };
        assert!(same_id.validate_for(1).is_ok());

        let other_id = TodoPatch { id: Some(2), ..TodoPatch::completed(true) };
        assert!(matches!(other_id.validate_for(1), Err(Error::Validation(_))));
    }

    #[test]
    fn test_patch_sets_only_present_fields() {
        let patch = TodoPatch::from_json(json!({"completed": true})).unwrap();
        let set = patch.to_set_document();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(fields::COMPLETED), Some(&json!(true)));
    }

    #[test]
    fn test_query_to_filter() {
        assert!(TodoQuery::default().is_empty());
        let filter = TodoQuery::completed(true).to_filter();
        let mut doc = Document::new();
        doc.insert("completed".into(), json!(true));
        assert!(filter.matches(&doc));
    }

    #[test]
    fn test_todo_from_corrupt_document() {
        let mut doc = Document::new();
        doc.insert("id".into(), json!("not a number"));
        assert!(matches!(Todo::from_document(&doc), Err(StoreError::Corruption(_))));
    }
}
