//! In-memory store backend
//!
//! The test double the lifecycle logic is exercised against, and a
//! usable backend for offline demos. Can simulate the backend dropping
//! away so callers can test their `StoreUnavailable` handling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use serde_json::Value;
use tracing::instrument;

use crate::error::{Error, Result};
use super::path::StorePath;
use super::traits::{KeyValueStore, WriteOp};
use super::tree;

/// JSON tree behind a lock
pub struct MemoryStore {
    root: RwLock<Value>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Value::Null),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate the backend dropping away; every operation fails with
    /// `StoreUnavailable` until restored
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of the whole tree, for diagnostics and tests
    pub fn snapshot(&self) -> Value {
        match self.root.read() {
            Ok(root) => root.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    #[instrument(skip_all, fields(path = %path))]
    fn get(&self, path: &StorePath) -> Result<Option<Value>> {
        self.check_online()?;
        let root = self
            .root
            .read()
            .map_err(|_| Error::StoreUnavailable("store lock poisoned".to_string()))?;
        Ok(tree::get(&root, path.segments())
            .filter(|value| !value.is_null())
            .cloned())
    }

    #[instrument(skip_all, fields(ops = ops.len()))]
    fn apply(&self, ops: &[WriteOp]) -> Result<()> {
        self.check_online()?;
        let mut root = self
            .root
            .write()
            .map_err(|_| Error::StoreUnavailable("store lock poisoned".to_string()))?;
        for op in ops {
            match op {
                WriteOp::Set { path, value } => tree::set(&mut root, path.segments(), value.clone()),
                WriteOp::Update { path, fields } => tree::update(&mut root, path.segments(), fields),
                WriteOp::Delete { path } => tree::set(&mut root, path.segments(), Value::Null),
            }
        }
        tree::prune(&mut root);
        Ok(())
    }
}
