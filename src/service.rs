//! Todo service
//!
//! The layer the HTTP handlers call. It wraps every adapter call, converts
//! store failures into [`Error::Store`], turns "no such id" into
//! [`Error::NotFound`] where callers need a hard signal, logs, and records
//! metrics. It holds no per-request state.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::core::error::{Error, Result};
use crate::storage::{StorageImpl, TodoCollection};
use crate::system::{Metrics, Operation};
use crate::types::{DeleteOutcome, NewTodo, Todo, TodoId, TodoPatch, TodoQuery, UpdateOutcome};

/// Todo operations over one collection
pub struct TodoService<S: StorageImpl> {
    todos: TodoCollection<S>,
    metrics: Arc<Metrics>,
}

impl<S: StorageImpl> TodoService<S> {
    /// Create a service over `todos`, recording into `metrics`
    pub fn new(todos: TodoCollection<S>, metrics: Arc<Metrics>) -> Self {
        Self { todos, metrics }
    }

    /// The adapter this service wraps
    pub fn collection(&self) -> &TodoCollection<S> {
        &self.todos
    }

    /// Create a todo; the id is always assigned here
    pub async fn create_todo(&self, new: NewTodo) -> Result<Todo> {
        self.observe(Operation::Create, async {
            let created = self.todos.create(&new).await?;
            info!("Todo created: id {} (oid {})", created.todo.id, created.oid);
            Ok(created.todo)
        })
        .await
    }

    /// Fetch one todo by id
    pub async fn get_todo(&self, id: TodoId) -> Result<Todo> {
        self.observe(Operation::Get, async {
            self.todos.read_by_id(id).await?.ok_or(Error::not_found(id))
        })
        .await
    }

    /// Every todo, in store order
    pub async fn list_todos(&self) -> Result<Vec<Todo>> {
        self.observe(Operation::List, async {
            let todos = self.todos.read_all().await?;
            debug!("All todos retrieved: {}", todos.len());
            Ok(todos)
        })
        .await
    }

    /// Todos matching every field in `query`
    pub async fn find_todos(&self, query: TodoQuery) -> Result<Vec<Todo>> {
        self.observe(Operation::Find, async {
            let todos = self.todos.read_by_query(&query).await?;
            debug!("Query {:?} matched {} todos", query, todos.len());
            Ok(todos)
        })
        .await
    }

    /// Apply a partial update. A missing id is reported through zero
    /// counts, not as an error.
    pub async fn update_todo(&self, id: TodoId, patch: TodoPatch) -> Result<UpdateOutcome> {
        self.observe(Operation::Update, async {
            patch.validate_for(id)?;
            let outcome = self.todos.update_by_id(id, &patch).await?;
            debug!("Todo {} updated: {} matched, {} modified", id, outcome.matched, outcome.modified);
            Ok(outcome)
        })
        .await
    }

    /// Delete one todo. NotFound when no todo has `id`, so deleting the
    /// same id twice reports NotFound the second time.
    pub async fn delete_todo(&self, id: TodoId) -> Result<DeleteOutcome> {
        self.observe(Operation::Delete, async {
            let outcome = self.todos.delete_by_id(id).await?;
            if outcome.deleted == 0 {
                return Err(Error::not_found(id));
            }
            info!("Todo {} deleted", id);
            Ok(outcome)
        })
        .await
    }

    /// Delete every todo matching `query` (all of them when empty)
    pub async fn delete_todos(&self, query: TodoQuery) -> Result<DeleteOutcome> {
        self.observe(Operation::DeleteAll, async {
            let outcome = self.todos.delete_all(&query).await?;
            info!("Todos deleted: {}", outcome.deleted);
            Ok(outcome)
        })
        .await
    }

    async fn observe<T, F>(&self, operation: Operation, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        let result = call.await;
        if let Err(e) = &result {
            if e.is_server_error() {
                error!("Todo {} failed: {}", operation, e);
            } else {
                debug!("Todo {} rejected: {}", operation, e);
            }
        }
        self.metrics.record(operation, &result, started.elapsed());
        result
    }
}
