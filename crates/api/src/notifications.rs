//! Consumer of contract events published by the engine.

use tokio::sync::broadcast;
use vendorhub_events::ContractEvent;

/// Log every contract event until the notifier is dropped.
pub async fn log_contract_events(mut rx: broadcast::Receiver<ContractEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                tracing::info!(
                    event_type = event.kind.event_type(),
                    contract_id = %event.contract_id,
                    vendor = %event.vendor_name,
                    status = %event.status,
                    actor = %event.actor,
                    "Contract event",
                );
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "Contract event log lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::info!("Contract notifier closed, event log stopping");
                break;
            }
        }
    }
}
