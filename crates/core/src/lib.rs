//! Gavel Core Library
//!
//! Caucus models, the speaker lifecycle transition, and the
//! path-addressed store layer for the Gavel committee platform.

pub mod error;
pub mod invariants;
pub mod lifecycle;
pub mod models;
pub mod store;

pub use error::{Error, Result};
pub use lifecycle::{run_lifecycle, Lifecycle};
pub use models::*;
pub use store::{
    CaucusStore, KeyValueStore, MemoryStore, SettingsStore, SqliteStore, StorePath, WriteOp,
};
