//! dynaproof-store: Storage backends and configuration.
//!
//! Implements the `ProfileStore` and `EventLog` traits from `dynaproof-core`
//! on top of the filesystem (a JSON profile file and a JSON Lines event log)
//! and in memory for tests.

pub mod config;
pub mod event_log;
pub mod json_store;
pub mod memory;

pub use config::{load_config, load_config_from, open_stores, DynaproofConfig};
pub use event_log::JsonlEventLog;
pub use json_store::JsonProfileStore;
pub use memory::{MemoryEventLog, MemoryProfileStore};
