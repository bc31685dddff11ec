//! Sequential id allocation
//!
//! `next_id` reads the current maximum id and adds one. On its own this is
//! a read-then-write protocol: two creates that read the same maximum get
//! the same id. [`IdAllocation`] makes the choice between closing that race
//! and reproducing it explicit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::storage::{DocumentStore, StoreError, StoreResult};
use crate::types::todo::fields;
use crate::types::{Namespace, TodoId};

/// How the adapter assigns ids on create
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdAllocation {
    /// The store computes `max + 1` and inserts in one atomic step.
    /// Concurrent creates always receive distinct ids.
    #[default]
    Atomic,
    /// `next_id` followed by a plain insert. Concurrent creates can observe
    /// the same maximum and store duplicate ids; the duplicate is not
    /// detected or reported.
    Scan,
}

impl fmt::Display for IdAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdAllocation::Atomic => f.write_str("atomic"),
            IdAllocation::Scan => f.write_str("scan"),
        }
    }
}

impl FromStr for IdAllocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atomic" => Ok(IdAllocation::Atomic),
            "scan" => Ok(IdAllocation::Scan),
            other => Err(format!(
                "Invalid id allocation: {}. Valid options: atomic, scan",
                other
            )),
        }
    }
}

/// Next sequential id for the collection: 1 when it holds no integer ids,
/// otherwise the current maximum plus one.
pub async fn next_id<S>(store: &S, ns: &Namespace) -> StoreResult<TodoId>
where
    S: DocumentStore + ?Sized,
{
    match store.max_integer(ns, fields::ID).await? {
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| StoreError::internal("id sequence exhausted")),
        None => Ok(1),
    }
}
