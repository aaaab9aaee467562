//! Contract lifecycle engine.
//!
//! - [`ContractEngine`]: owns contract records, derives status from
//!   signature events, appends audit entries, and persists through a
//!   [`ContractStore`](vendorhub_core::storage::ContractStore).
//! - [`spawn_reload_on_change`]: reloads the engine whenever storage
//!   reports a change.
//! - [`memory`]: in-memory collaborators for tests and local runs.

pub mod engine;
pub mod memory;
pub mod watcher;

pub use engine::ContractEngine;
pub use watcher::spawn_reload_on_change;
