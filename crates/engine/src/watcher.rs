//! Reload-on-change loop.
//!
//! Every storage change notification triggers a full reload of the engine's
//! contract list. Notifications are not coalesced: a burst of N changes
//! causes N reloads.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use vendorhub_core::storage::StoreChange;

use crate::engine::ContractEngine;

/// Spawn a task that reloads `engine` for each change received on `changes`.
///
/// A lagged receiver reloads once and keeps going. The task exits when the
/// channel closes.
pub fn spawn_reload_on_change(
    engine: Arc<Mutex<ContractEngine>>,
    mut changes: broadcast::Receiver<StoreChange>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) => {
                    tracing::debug!(
                        kind = ?change.kind,
                        contract_id = ?change.contract_id,
                        "Contract change detected, reloading"
                    );
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Change listener lagged, reloading");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Change channel closed, stopping reload watcher");
                    break;
                }
            }

            if let Err(e) = engine.lock().await.reload().await {
                tracing::error!(error = %e, "Failed to reload contracts");
            }
        }
    })
}
