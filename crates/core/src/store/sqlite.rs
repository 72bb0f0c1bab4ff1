//! SQLite store backend
//!
//! Durable single-file backend with the same tree semantics as the
//! hosted backend: leaf values are flattened to `(path, json)` rows and
//! subtree reads reassemble them. Batches run inside one transaction.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tracing::instrument;

use crate::error::Result;
use super::migrations;
use super::path::StorePath;
use super::traits::{KeyValueStore, WriteOp};
use super::tree;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a store at the given file path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)
    }

    /// Current schema version
    pub fn schema_version(&self) -> u32 {
        migrations::schema_version(&self.conn)
    }

    /// All rows at or under `path`, excluding the exact row
    fn select_subtree(conn: &Connection, path: &StorePath) -> Result<Vec<(String, String)>> {
        let mut rows = Vec::new();
        if path.is_root() {
            let mut stmt = conn.prepare("SELECT path, value FROM nodes ORDER BY path")?;
            let mapped = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            for row in mapped {
                rows.push(row?);
            }
        } else {
            let key = path.to_string();
            let mut stmt = conn.prepare(
                // '0' is the next byte after '/', so this range is exactly
                // the strings starting with "{key}/"
                "SELECT path, value FROM nodes WHERE path >= ?1 AND path < ?2 ORDER BY path",
            )?;
            let mapped = stmt.query_map(
                params![format!("{key}/"), format!("{key}0")],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            for row in mapped {
                rows.push(row?);
            }
        }
        Ok(rows)
    }

    fn delete_subtree(conn: &Connection, path: &StorePath) -> Result<()> {
        if path.is_root() {
            conn.execute("DELETE FROM nodes", [])?;
            return Ok(());
        }
        let key = path.to_string();
        conn.execute("DELETE FROM nodes WHERE path = ?1", params![key])?;
        conn.execute(
            "DELETE FROM nodes WHERE path >= ?1 AND path < ?2",
            params![format!("{key}/"), format!("{key}0")],
        )?;
        Ok(())
    }

    /// Remove leaf rows sitting at an ancestor of `path`; a write below
    /// them turns that ancestor into an interior node
    fn delete_masking_ancestors(conn: &Connection, path: &StorePath) -> Result<()> {
        let mut ancestor = path.parent();
        while let Some(current) = ancestor {
            if current.is_root() {
                break;
            }
            conn.execute(
                "DELETE FROM nodes WHERE path = ?1",
                params![current.to_string()],
            )?;
            ancestor = current.parent();
        }
        Ok(())
    }

    fn insert_value(conn: &Connection, path: &StorePath, value: &Value) -> Result<()> {
        let mut leaves = Vec::new();
        tree::flatten(path, value, &mut leaves)?;
        for (leaf_path, leaf) in leaves {
            conn.execute(
                "INSERT OR REPLACE INTO nodes (path, value) VALUES (?1, ?2)",
                params![leaf_path.to_string(), serde_json::to_string(&leaf)?],
            )?;
        }
        Ok(())
    }

    fn apply_op(conn: &Connection, op: &WriteOp) -> Result<()> {
        match op {
            WriteOp::Set { path, value } => {
                Self::delete_subtree(conn, path)?;
                Self::delete_masking_ancestors(conn, path)?;
                Self::insert_value(conn, path, value)?;
            }
            WriteOp::Update { path, fields } => {
                // A leaf row at the target becomes an interior node
                conn.execute(
                    "DELETE FROM nodes WHERE path = ?1",
                    params![path.to_string()],
                )?;
                Self::delete_masking_ancestors(conn, path)?;
                for (key, value) in fields {
                    let child = path.clone().child(key)?;
                    Self::delete_subtree(conn, &child)?;
                    Self::insert_value(conn, &child, value)?;
                }
            }
            WriteOp::Delete { path } => {
                Self::delete_subtree(conn, path)?;
            }
        }
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    #[instrument(skip_all, fields(path = %path))]
    fn get(&self, path: &StorePath) -> Result<Option<Value>> {
        if !path.is_root() {
            let exact: Option<String> = self
                .conn
                .query_row(
                    "SELECT value FROM nodes WHERE path = ?1",
                    params![path.to_string()],
                    |row| row.get(0),
                )
                .optional()?;
            if let Some(text) = exact {
                return Ok(Some(serde_json::from_str(&text)?));
            }
        }

        let rows = Self::select_subtree(&self.conn, path)?;
        if rows.is_empty() {
            return Ok(None);
        }

        let depth = path.segments().len();
        let mut root = Value::Null;
        for (row_path, text) in rows {
            let leaf_path = StorePath::parse(&row_path)?;
            let relative = leaf_path.segments()[depth..].to_vec();
            tree::set(&mut root, &relative, serde_json::from_str(&text)?);
        }
        Ok(Some(root))
    }

    #[instrument(skip_all, fields(ops = ops.len()))]
    fn apply(&self, ops: &[WriteOp]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for op in ops {
            Self::apply_op(&tx, op)?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    fn path(raw: &str) -> StorePath {
        StorePath::parse(raw).unwrap()
    }

    #[test]
    fn test_set_then_get_subtree() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set(&path("a/b"), json!({ "c": 1 })).unwrap();
        store.set(&path("a/d"), json!(2)).unwrap();

        assert_eq!(
            store.get(&path("a")).unwrap(),
            Some(json!({ "b": { "c": 1 }, "d": 2 }))
        );
        assert_eq!(store.get(&path("a/b/c")).unwrap(), Some(json!(1)));
        assert_eq!(store.get(&path("missing")).unwrap(), None);
    }

    #[test]
    fn test_update_merges_fields() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .set(&path("timer"), json!({ "elapsed": 40, "remaining": 20, "ticking": true }))
            .unwrap();

        let mut fields = serde_json::Map::new();
        fields.insert("ticking".to_string(), json!(false));
        store.update(&path("timer"), fields).unwrap();

        assert_eq!(
            store.get(&path("timer")).unwrap(),
            Some(json!({ "elapsed": 40, "remaining": 20, "ticking": false }))
        );
    }

    #[test]
    fn test_overwriting_a_leaf_with_children() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set(&path("a"), json!("scalar")).unwrap();
        store.set(&path("a/b"), json!(1)).unwrap();

        // The old scalar row no longer masks the subtree
        assert_eq!(store.get(&path("a")).unwrap(), Some(json!({ "b": 1 })));
    }

    #[test]
    fn test_delete_subtree() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set(&path("a/b/c"), json!(1)).unwrap();
        store.set(&path("a/sibling"), json!(2)).unwrap();
        store.delete(&path("a/b")).unwrap();

        assert_eq!(store.get(&path("a/b")).unwrap(), None);
        assert_eq!(store.get(&path("a/sibling")).unwrap(), Some(json!(2)));
    }

    #[test]
    fn test_push_appends_keyed_children() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store.push(&path("queue"), json!("x")).unwrap();
        let second = store.push(&path("queue"), json!("y")).unwrap();
        assert!(first < second);

        let queue = store.get(&path("queue")).unwrap().unwrap();
        assert_eq!(queue.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let store = SqliteStore::open_in_memory().unwrap();

        let mut bad_fields = serde_json::Map::new();
        bad_fields.insert("not/a/segment".to_string(), json!(1));
        let result = store.apply(&[
            WriteOp::Set {
                path: path("a"),
                value: json!(1),
            },
            WriteOp::Update {
                path: path("b"),
                fields: bad_fields,
            },
        ]);

        assert!(matches!(result, Err(Error::InvalidPath(_))));
        // The first op must not have survived the failed batch
        assert_eq!(store.get(&path("a")).unwrap(), None);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("store.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            store.set(&path("a/b"), json!("persisted")).unwrap();
        }

        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(store.get(&path("a/b")).unwrap(), Some(json!("persisted")));
        assert_eq!(store.schema_version(), 1);
    }
}
