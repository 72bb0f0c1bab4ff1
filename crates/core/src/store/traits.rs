//! Store abstraction
//!
//! The store is a JSON tree addressed by slash-separated paths, the
//! shape the hosted realtime backend exposes. The trait lets the
//! in-memory double, the SQLite backend, and a future network client
//! interchange.

use serde_json::{Map, Value};

use crate::error::Result;
use super::keys;
use super::path::StorePath;

/// A single write against the store tree
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Replace the subtree at `path`
    Set { path: StorePath, value: Value },
    /// Merge top-level fields into the object at `path`
    Update {
        path: StorePath,
        fields: Map<String, Value>,
    },
    /// Remove the subtree at `path` (set-null semantics)
    Delete { path: StorePath },
}

impl WriteOp {
    pub fn path(&self) -> &StorePath {
        match self {
            WriteOp::Set { path, .. } => path,
            WriteOp::Update { path, .. } => path,
            WriteOp::Delete { path } => path,
        }
    }
}

/// Key-path-addressable store operations
pub trait KeyValueStore {
    /// Snapshot of the subtree at `path`
    fn get(&self, path: &StorePath) -> Result<Option<Value>>;

    /// Apply a batch of writes as a single atomic unit: either every op
    /// lands or none do
    fn apply(&self, ops: &[WriteOp]) -> Result<()>;

    /// Replace the subtree at `path`
    fn set(&self, path: &StorePath, value: Value) -> Result<()> {
        self.apply(&[WriteOp::Set {
            path: path.clone(),
            value,
        }])
    }

    /// Merge top-level `fields` into the object at `path`
    fn update(&self, path: &StorePath, fields: Map<String, Value>) -> Result<()> {
        self.apply(&[WriteOp::Update {
            path: path.clone(),
            fields,
        }])
    }

    /// Remove the subtree at `path`
    fn delete(&self, path: &StorePath) -> Result<()> {
        self.apply(&[WriteOp::Delete { path: path.clone() }])
    }

    /// Append a uniquely-keyed child under `path`, returning the new key
    fn push(&self, path: &StorePath, value: Value) -> Result<String> {
        let key = keys::push_key();
        let child = path.clone().child(&key)?;
        self.set(&child, value)?;
        Ok(key)
    }
}
