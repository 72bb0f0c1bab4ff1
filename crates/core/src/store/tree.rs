//! JSON tree manipulation shared by the store backends
//!
//! Both backends expose the same semantics as the hosted realtime
//! backend: interior nodes are objects, writing null deletes, and empty
//! objects collapse away. Keeping the tree logic in one place keeps the
//! backends from drifting apart.

use serde_json::{Map, Value};

use crate::error::Result;
use super::path::StorePath;

/// The subtree at `segments`, if present
pub fn get<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut node = root;
    for segment in segments {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}

/// Replace the subtree at `segments`, creating interior objects on the way
pub fn set(root: &mut Value, segments: &[String], value: Value) {
    match segments.split_first() {
        None => *root = value,
        Some((head, rest)) => {
            if !root.is_object() {
                *root = Value::Object(Map::new());
            }
            if let Value::Object(map) = root {
                let child = map.entry(head.clone()).or_insert(Value::Null);
                set(child, rest, value);
            }
        }
    }
}

/// Merge top-level `fields` into the object at `segments`, leaving
/// sibling fields untouched
pub fn update(root: &mut Value, segments: &[String], fields: &Map<String, Value>) {
    match segments.split_first() {
        None => {
            if !root.is_object() {
                *root = Value::Object(Map::new());
            }
            if let Value::Object(map) = root {
                for (key, value) in fields {
                    map.insert(key.clone(), value.clone());
                }
            }
        }
        Some((head, rest)) => {
            if !root.is_object() {
                *root = Value::Object(Map::new());
            }
            if let Value::Object(map) = root {
                let child = map.entry(head.clone()).or_insert(Value::Null);
                update(child, rest, fields);
            }
        }
    }
}

/// Drop nulls and empty objects so deletes collapse interior nodes
pub fn prune(node: &mut Value) {
    if let Value::Object(map) = node {
        for (_, child) in map.iter_mut() {
            prune(child);
        }
        map.retain(|_, child| !is_empty(child));
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Flatten a subtree into `(path, leaf)` rows; nulls and empty objects
/// produce no rows
pub fn flatten(base: &StorePath, value: &Value, out: &mut Vec<(StorePath, Value)>) -> Result<()> {
    match value {
        Value::Null => Ok(()),
        Value::Object(map) => {
            for (key, child) in map {
                flatten(&base.clone().child(key)?, child, out)?;
            }
            Ok(())
        }
        leaf => {
            out.push((base.clone(), leaf.clone()));
            Ok(())
        }
    }
}
