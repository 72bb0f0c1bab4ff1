//! Data models for Gavel

mod caucus;
mod settings;
mod time;

pub use caucus::*;
pub use settings::*;
pub use time::*;
