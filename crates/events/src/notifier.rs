//! Contract notification collaborator.
//!
//! The lifecycle engine calls [`ContractNotifier::notify`] after a contract
//! is created and when an operator asks for the client to be notified.
//! Implementations must return promptly; any error they report is logged
//! by the caller and never aborts the operation.

use tokio::sync::broadcast;
use vendorhub_core::error::CoreError;

use crate::event::ContractEvent;

const DEFAULT_CAPACITY: usize = 256;

/// Fire-and-forget sink for contract events.
pub trait ContractNotifier: Send + Sync {
    fn notify(&self, event: ContractEvent) -> Result<(), CoreError>;
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl ContractNotifier for NoopNotifier {
    fn notify(&self, _event: ContractEvent) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Fans contract events out to every subscriber.
///
/// Sending on a broadcast channel never blocks. Slow subscribers see
/// `RecvError::Lagged` once more than the channel capacity is queued.
#[derive(Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<ContractEvent>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ContractEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ContractNotifier for BroadcastNotifier {
    fn notify(&self, event: ContractEvent) -> Result<(), CoreError> {
        let contract_id = event.contract_id.clone();
        let event_type = event.kind.event_type();
        // An error only means nobody is listening.
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(%contract_id, event_type, receivers, "Contract event published")
            }
            Err(_) => tracing::debug!(%contract_id, event_type, "Contract event had no subscribers"),
        }
        Ok(())
    }
}
