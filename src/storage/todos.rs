//! Todo collection adapter
//!
//! Translates todo operations into document store calls against one
//! namespace. The integer `id` field is the only key used to address
//! records. Zero matched or removed records is a valid result here; turning
//! it into "not found" is the caller's decision.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::storage::allocator::{self, IdAllocation};
use crate::storage::{StorageImpl, StoreResult};
use crate::types::todo::fields;
use crate::types::{
    DeleteOutcome, Filter, Namespace, NewTodo, ObjectId, StoredDocument, Todo, TodoId, TodoPatch, TodoQuery,
    UpdateOutcome,
};

/// Receipt for a created todo
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedTodo {
    /// Identifier the store saved the document under; storage detail only
    pub oid: ObjectId,
    /// The todo as stored, carrying its assigned id
    pub todo: Todo,
}

/// Adapter over a single todo collection
pub struct TodoCollection<S: StorageImpl> {
    store: Arc<S>,
    namespace: Namespace,
    allocation: IdAllocation,
}

impl<S: StorageImpl> TodoCollection<S> {
    /// Create an adapter for `namespace` on `store`
    pub fn new(store: Arc<S>, namespace: Namespace, allocation: IdAllocation) -> Self {
        Self {
            store,
            namespace,
            allocation,
        }
    }

    /// Namespace this adapter reads and writes
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Id allocation mode in effect
    pub fn allocation(&self) -> IdAllocation {
        self.allocation
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Next id the allocator would hand out right now
    pub async fn next_id(&self) -> StoreResult<TodoId> {
        allocator::next_id(self.store.as_ref(), &self.namespace).await
    }

    /// Insert a todo under a freshly allocated id. Any client id is dropped.
    pub async fn create(&self, new: &NewTodo) -> StoreResult<CreatedTodo> {
        if let Some(client_id) = new.id {
            debug!("Ignoring client-supplied id {} on create", client_id);
        }

        let mut body = new.to_document();
        let (oid, id) = match self.allocation {
            IdAllocation::Atomic => {
                self.store
                    .insert_sequenced(&self.namespace, fields::ID, body)
                    .await?
            }
            IdAllocation::Scan => {
                let id = self.next_id().await?;
                body.insert(fields::ID.into(), id.into());
                let oid = self.store.insert_one(&self.namespace, body).await?;
                (oid, id)
            }
        };

        Ok(CreatedTodo {
            oid,
            todo: Todo {
                id,
                title: new.title.clone(),
                description: new.description.clone(),
                completed: new.completed,
            },
        })
    }

    /// Every todo, in store-native order
    pub async fn read_all(&self) -> StoreResult<Vec<Todo>> {
        let docs = self.store.find(&self.namespace, &Filter::all()).await?;
        decode_all(docs)
    }

    /// The todo with `id`, if any
    pub async fn read_by_id(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        self.store
            .find_one(&self.namespace, &by_id(id))
            .await?
            .map(|doc| Todo::from_document(&doc.body))
            .transpose()
    }

    /// Todos matching every field present in `query`
    pub async fn read_by_query(&self, query: &TodoQuery) -> StoreResult<Vec<Todo>> {
        let docs = self.store.find(&self.namespace, &query.to_filter()).await?;
        decode_all(docs)
    }

    /// Set the patch's fields on the todo with `id`
    pub async fn update_by_id(&self, id: TodoId, patch: &TodoPatch) -> StoreResult<UpdateOutcome> {
        self.store
            .update_one(&self.namespace, &by_id(id), patch.to_set_document())
            .await
    }

    /// Remove the todo with `id`
    pub async fn delete_by_id(&self, id: TodoId) -> StoreResult<DeleteOutcome> {
        let deleted = self.store.delete_one(&self.namespace, &by_id(id)).await?;
        Ok(DeleteOutcome { deleted })
    }

    /// Remove every todo matching `query`; an empty query removes all
    pub async fn delete_all(&self, query: &TodoQuery) -> StoreResult<DeleteOutcome> {
        let deleted = self.store.delete_many(&self.namespace, &query.to_filter()).await?;
        Ok(DeleteOutcome { deleted })
    }
}

fn by_id(id: TodoId) -> Filter {
    Filter::eq(fields::ID, id)
}

fn decode_all(docs: Vec<StoredDocument>) -> StoreResult<Vec<Todo>> {
    docs.iter()
        .map(|doc| {
            Todo::from_document(&doc.body).inspect_err(|e| {
                warn!("Undecodable document {}: {}", doc.oid, e);
            })
        })
        .collect()
}
