//! Contract activity events and the notifier collaborator.
//!
//! - [`ContractEvent`]: what happened to which contract, and who did it.
//! - [`ContractNotifier`]: fire-and-forget sink the lifecycle engine hands
//!   events to. [`BroadcastNotifier`] fans them out to in-process
//!   subscribers; [`NoopNotifier`] drops them.

pub mod event;
pub mod notifier;

pub use event::{ContractEvent, ContractEventKind};
pub use notifier::{BroadcastNotifier, ContractNotifier, NoopNotifier};
