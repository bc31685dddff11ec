//! Storage layer for the todo service
//!
//! This module provides the document store abstraction and the adapter that
//! maps todo operations onto it.
//!
//! - [`DocumentStore`] is the backend contract: schemaless JSON documents in
//!   namespaced collections, field-equality filters, `$set` updates.
//! - [`MemoryStore`] is the in-process backend.
//! - [`allocator`] computes sequential ids.
//! - [`TodoCollection`] is the adapter the service talks to. It keys every
//!   operation by the integer `id` field; the store's own [`ObjectId`] never
//!   leaves it except as a creation receipt.

use async_trait::async_trait;

use crate::types::{Document, Filter, Namespace, ObjectId, StoredDocument, UpdateOutcome};

pub mod allocator;
pub mod error;
pub mod memory;
pub mod todos;

pub use allocator::{next_id, IdAllocation};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use todos::{CreatedTodo, TodoCollection};

/// Trait for document store implementations
///
/// Every operation may suspend on I/O. Implementations must not hold a lock
/// across an `.await`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document as-is and return the identifier the store assigned
    async fn insert_one(&self, ns: &Namespace, doc: Document) -> StoreResult<ObjectId>;

    /// Atomically set `field` to one more than its current maximum integer
    /// value in the collection (1 when there is none) and insert the document.
    ///
    /// Returns the store identifier and the value assigned to `field`.
    async fn insert_sequenced(
        &self,
        ns: &Namespace,
        field: &str,
        doc: Document,
    ) -> StoreResult<(ObjectId, i64)>;

    /// All documents matching `filter`, in store-native order
    async fn find(&self, ns: &Namespace, filter: &Filter) -> StoreResult<Vec<StoredDocument>>;

    /// First document matching `filter`
    async fn find_one(&self, ns: &Namespace, filter: &Filter) -> StoreResult<Option<StoredDocument>> {
        Ok(self.find(ns, filter).await?.into_iter().next())
    }

    /// Largest integer value of `field` across the collection; `None` when
    /// no document carries an integer there
    async fn max_integer(&self, ns: &Namespace, field: &str) -> StoreResult<Option<i64>>;

    /// Number of documents matching `filter`
    async fn count(&self, ns: &Namespace, filter: &Filter) -> StoreResult<u64>;

    /// Merge `set` into the first document matching `filter`
    async fn update_one(&self, ns: &Namespace, filter: &Filter, set: Document) -> StoreResult<UpdateOutcome>;

    /// Remove the first document matching `filter`; returns 0 or 1
    async fn delete_one(&self, ns: &Namespace, filter: &Filter) -> StoreResult<u64>;

    /// Remove every document matching `filter`
    async fn delete_many(&self, ns: &Namespace, filter: &Filter) -> StoreResult<u64>;

    /// Check the store is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// Helper trait that combines all requirements for store implementations
/// This cleans up generic bounds throughout the codebase
pub trait StorageImpl: DocumentStore + 'static {}

/// Blanket implementation for any type that meets the requirements
impl<T> StorageImpl for T where T: DocumentStore + 'static {}
