//! In-memory document store using DashMap
//!
//! Each namespace maps to one collection: a vector of documents behind a
//! `parking_lot::RwLock`. The vector keeps insertion order, which is the
//! store-native order reported by `find`. Locks are taken and released
//! inside each call, never across an `.await`.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::storage::{DocumentStore, StoreError, StoreResult};
use crate::types::{Document, Filter, Namespace, ObjectId, StoredDocument, UpdateOutcome};

type Collection = Arc<RwLock<Vec<StoredDocument>>>;

/// Simple storage implementation using DashMap and JSON
#[derive(Default)]
pub struct MemoryStore {
    /// Map of namespace to its documents
    collections: DashMap<Namespace, Collection>,
}

impl MemoryStore {
    /// Create a new, empty MemoryStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of namespaces that have been written to
    pub fn namespace_count(&self) -> usize {
        self.collections.len()
    }

    /// Collection for writing, created on first use
    fn collection(&self, ns: &Namespace) -> Collection {
        let entry = self.collections.entry(ns.clone()).or_default();
        Arc::clone(entry.value())
    }

    /// Collection for reading; absent namespaces read as empty
    fn existing(&self, ns: &Namespace) -> Option<Collection> {
        self.collections.get(ns).map(|entry| Arc::clone(entry.value()))
    }
}

fn max_integer_in(docs: &[StoredDocument], field: &str) -> Option<i64> {
    docs.iter()
        .filter_map(|doc| doc.body.get(field).and_then(Value::as_i64))
        .max()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, ns: &Namespace, doc: Document) -> StoreResult<ObjectId> {
        let oid = ObjectId::new();
        let collection = self.collection(ns);
        let mut docs = collection.write();
        docs.push(StoredDocument { oid, body: doc });
        debug!("MemoryStore::insert_one - ns: {}, oid: {}, count now: {}", ns, oid, docs.len());
        Ok(oid)
    }

    async fn insert_sequenced(
        &self,
        ns: &Namespace,
        field: &str,
        mut doc: Document,
    ) -> StoreResult<(ObjectId, i64)> {
        let oid = ObjectId::new();
        let collection = self.collection(ns);
        let mut docs = collection.write();

        let next = match max_integer_in(&docs, field) {
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| StoreError::internal(format!("sequence exhausted for field '{}'", field)))?,
            None => 1,
        };
        doc.insert(field.to_string(), Value::from(next));
        docs.push(StoredDocument { oid, body: doc });
        debug!("MemoryStore::insert_sequenced - ns: {}, {}: {}, oid: {}", ns, field, next, oid);
        Ok((oid, next))
    }

    async fn find(&self, ns: &Namespace, filter: &Filter) -> StoreResult<Vec<StoredDocument>> {
        let Some(collection) = self.existing(ns) else {
            return Ok(Vec::new());
        };
        let docs = collection.read();
        let found: Vec<StoredDocument> = docs
            .iter()
            .filter(|doc| filter.matches(&doc.body))
            .cloned()
            .collect();
        trace!("MemoryStore::find - ns: {}, matched {} of {}", ns, found.len(), docs.len());
        Ok(found)
    }

    async fn find_one(&self, ns: &Namespace, filter: &Filter) -> StoreResult<Option<StoredDocument>> {
        let Some(collection) = self.existing(ns) else {
            return Ok(None);
        };
        let docs = collection.read();
        Ok(docs.iter().find(|doc| filter.matches(&doc.body)).cloned())
    }

    async fn max_integer(&self, ns: &Namespace, field: &str) -> StoreResult<Option<i64>> {
        Ok(self
            .existing(ns)
            .and_then(|collection| max_integer_in(&collection.read(), field)))
    }

    async fn count(&self, ns: &Namespace, filter: &Filter) -> StoreResult<u64> {
        let Some(collection) = self.existing(ns) else {
            return Ok(0);
        };
        let docs = collection.read();
        Ok(docs.iter().filter(|doc| filter.matches(&doc.body)).count() as u64)
    }

    async fn update_one(&self, ns: &Namespace, filter: &Filter, set: Document) -> StoreResult<UpdateOutcome> {
        let Some(collection) = self.existing(ns) else {
            return Ok(UpdateOutcome::default());
        };
        let mut docs = collection.write();
        let Some(doc) = docs.iter_mut().find(|doc| filter.matches(&doc.body)) else {
            return Ok(UpdateOutcome::default());
        };

        let mut changed = false;
        for (field, value) in set {
            if doc.body.get(&field) != Some(&value) {
                doc.body.insert(field, value);
                changed = true;
            }
        }
        debug!("MemoryStore::update_one - ns: {}, oid: {}, changed: {}", ns, doc.oid, changed);
        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn delete_one(&self, ns: &Namespace, filter: &Filter) -> StoreResult<u64> {
        let Some(collection) = self.existing(ns) else {
            return Ok(0);
        };
        let mut docs = collection.write();
        match docs.iter().position(|doc| filter.matches(&doc.body)) {
            Some(index) => {
                let removed = docs.remove(index);
                debug!("MemoryStore::delete_one - ns: {}, oid: {}", ns, removed.oid);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, ns: &Namespace, filter: &Filter) -> StoreResult<u64> {
        let Some(collection) = self.existing(ns) else {
            return Ok(0);
        };
        let mut docs = collection.write();
        let before = docs.len();
        docs.retain(|doc| !filter.matches(&doc.body));
        let removed = (before - docs.len()) as u64;
        debug!("MemoryStore::delete_many - ns: {}, removed: {}", ns, removed);
        Ok(removed)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
