//! Save/load persistence for game data
//!
//! Features:
//! - One pretty-printed JSON record per slot file
//! - Single auto-save slot or numbered checkpoint slots
//! - Atomic writes (tmp → save)
//! - Checkpoint discovery by directory scan, tolerant of stray files

pub mod config;
pub mod store;

pub use config::{SaveConfig, SaveMode};
pub use store::{SaveError, SaveStore, SlotId};
