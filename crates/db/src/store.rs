//! PostgreSQL implementations of the storage collaborators.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use vendorhub_core::contract::{Contract, CONTRACT_ENTITY};
use vendorhub_core::error::CoreError;
use vendorhub_core::storage::{ContractStore, StoreChange};
use vendorhub_core::vendor::{normalize_vendor_names, VendorDirectory};

use crate::models::contract::{parse_change_payload, ContractRow};
use crate::repositories::{ContractRepo, VendorRepo};
use crate::DbPool;

/// Channel the `contracts` trigger notifies on.
pub const CONTRACTS_CHANNEL: &str = "contracts_changes";

const CHANGE_CAPACITY: usize = 256;

/// Delay before listening again after the listener connection fails.
const LISTEN_RETRY: Duration = Duration::from_secs(2);

/// Convert a sqlx error into a storage error carrying its message.
fn storage_error(err: sqlx::Error) -> CoreError {
    CoreError::Storage(err.to_string())
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// [`ContractStore`] over the `contracts` table.
///
/// Change notifications only flow after [`listen`](Self::listen) has been
/// started.
#[derive(Clone)]
pub struct PgContractStore {
    pool: DbPool,
    changes: broadcast::Sender<StoreChange>,
}

impl PgContractStore {
    pub fn new(pool: DbPool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self { pool, changes }
    }

    /// Spawn a `LISTEN contracts_changes` task that forwards every
    /// notification to [`subscribe_changes`](ContractStore::subscribe_changes)
    /// receivers.
    pub async fn listen(&self) -> Result<JoinHandle<()>, sqlx::Error> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(CONTRACTS_CHANNEL).await?;
        tracing::info!(channel = CONTRACTS_CHANNEL, "Listening for contract changes");

        let changes = self.changes.clone();
        Ok(tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        let change = parse_change_payload(notification.payload());
                        let _ = changes.send(change);
                    }
                    Err(e) => {
                        // Notifications may have been missed; ask consumers to reload.
                        tracing::error!(error = %e, "Contract change listener failed");
                        let _ = changes.send(StoreChange::unknown());
                        tokio::time::sleep(LISTEN_RETRY).await;
                    }
                }
            }
        }))
    }
}

#[async_trait]
impl ContractStore for PgContractStore {
    async fn fetch_all(&self) -> Result<Vec<Contract>, CoreError> {
        let rows = ContractRepo::list(&self.pool).await.map_err(storage_error)?;
        rows.into_iter().map(Contract::try_from).collect()
    }

    async fn create(&self, contract: &Contract) -> Result<(), CoreError> {
        let row = ContractRow::try_from(contract)?;
        ContractRepo::create(&self.pool, &row)
            .await
            .map_err(storage_error)
    }

    async fn update(&self, contract: &Contract) -> Result<(), CoreError> {
        let row = ContractRow::try_from(contract)?;
        let updated = ContractRepo::update(&self.pool, &row)
            .await
            .map_err(storage_error)?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: CONTRACT_ENTITY,
                id: contract.id.clone(),
            });
        }
        Ok(())
    }

    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

/// [`VendorDirectory`] over the `vendors` table.
#[derive(Clone)]
pub struct PgVendorDirectory {
    pool: DbPool,
}

impl PgVendorDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VendorDirectory for PgVendorDirectory {
    async fn vendor_names(&self) -> Result<Vec<String>, CoreError> {
        let names = VendorRepo::list_names(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(normalize_vendor_names(names))
    }
}
