//! Document type definitions for the document store
//!
//! Documents are plain JSON objects. The store keeps its own opaque
//! identifier next to each document rather than inside it, so the
//! document body only ever carries application fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A schemaless document body
pub type Document = Map<String, Value>;

/// Opaque identifier generated and owned by the store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(uuid::Uuid);

impl ObjectId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// A document together with the store-native identifier it was saved under
#[derive(Clone, Debug, PartialEq)]
pub struct StoredDocument {
    /// Store-native identifier
    pub oid: ObjectId,
    /// Application fields
    pub body: Document,
}

/// Logical database and collection a store operation targets
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// Logical database name
    pub database: String,
    /// Collection name within the database
    pub collection: String,
}

impl Namespace {
    /// Create a namespace from database and collection names
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// Field-equality filter. A document matches when every listed field is
/// present with an equal value; the empty filter matches every document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter(Document);

impl Filter {
    /// Filter that matches every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on a single field
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    /// Add another equality condition
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// True when the filter has no conditions
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check a document against every condition
    pub fn matches(&self, doc: &Document) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}

impl From<Document> for Filter {
    fn from(doc: Document) -> Self {
        Self(doc)
    }
}
