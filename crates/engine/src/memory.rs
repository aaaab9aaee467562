//! In-memory collaborators.
//!
//! Used by the engine and API tests, and by the API binary when no
//! database is configured.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use vendorhub_core::contract::{Contract, CONTRACT_ENTITY};
use vendorhub_core::error::CoreError;
use vendorhub_core::storage::{
    ChangeKind, ContractStore, DocumentStore, DocumentUpload, StoreChange, StoredDocument,
};
use vendorhub_core::vendor::{normalize_vendor_names, VendorDirectory};

const CHANGE_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Contract store backed by a `Vec`, with write-failure injection.
pub struct MemoryContractStore {
    rows: RwLock<Vec<Contract>>,
    changes: broadcast::Sender<StoreChange>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    fetch_count: AtomicUsize,
}

impl MemoryContractStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            rows: RwLock::new(Vec::new()),
            changes,
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent `create`/`update` fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `fetch_all` fail with a storage error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of `fetch_all` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Write a row as an outside party would, notifying subscribers.
    pub async fn external_upsert(&self, contract: Contract) {
        let mut rows = self.rows.write().await;
        let kind = match rows.iter_mut().find(|c| c.id == contract.id) {
            Some(existing) => {
                *existing = contract.clone();
                ChangeKind::Update
            }
            None => {
                rows.push(contract.clone());
                ChangeKind::Insert
            }
        };
        drop(rows);
        let _ = self.changes.send(StoreChange::new(kind, contract.id));
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("simulated write failure".into()));
        }
        Ok(())
    }
}

impl Default for MemoryContractStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContractStore for MemoryContractStore {
    async fn fetch_all(&self) -> Result<Vec<Contract>, CoreError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("simulated read failure".into()));
        }
        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create(&self, contract: &Contract) -> Result<(), CoreError> {
        self.check_writable()?;
        let mut rows = self.rows.write().await;
        if rows.iter().any(|c| c.id == contract.id) {
            return Err(CoreError::Storage(format!(
                "duplicate key value violates unique constraint on id '{}'",
                contract.id
            )));
        }
        rows.push(contract.clone());
        drop(rows);
        let _ = self
            .changes
            .send(StoreChange::new(ChangeKind::Insert, contract.id.clone()));
        Ok(())
    }

    async fn update(&self, contract: &Contract) -> Result<(), CoreError> {
        self.check_writable()?;
        let mut rows = self.rows.write().await;
        let existing = rows
            .iter_mut()
            .find(|c| c.id == contract.id)
            .ok_or_else(|| CoreError::NotFound {
                entity: CONTRACT_ENTITY,
                id: contract.id.clone(),
            })?;
        *existing = contract.clone();
        drop(rows);
        let _ = self
            .changes
            .send(StoreChange::new(ChangeKind::Update, contract.id.clone()));
        Ok(())
    }

    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Document store that keeps uploads in memory under `memory://` URLs.
#[derive(Default)]
pub struct MemoryDocumentStore {
    files: RwLock<Vec<(String, Vec<u8>)>>,
    fail_uploads: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose uploads always fail.
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail_uploads.store(true, Ordering::SeqCst);
        store
    }

    pub async fn file_count(&self) -> usize {
        self.files.read().await.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn upload(&self, upload: &DocumentUpload) -> Result<StoredDocument, CoreError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(CoreError::Upload("simulated upload failure".into()));
        }
        let mut files = self.files.write().await;
        let key = format!("{}-{}", files.len() + 1, upload.file_name);
        files.push((key.clone(), upload.bytes.clone()));
        Ok(StoredDocument {
            file_name: upload.file_name.clone(),
            url: format!("memory://{key}"),
            persistent: true,
        })
    }
}

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

/// Fixed vendor name list.
#[derive(Debug, Clone, Default)]
pub struct StaticVendorDirectory {
    names: Vec<String>,
}

impl StaticVendorDirectory {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: normalize_vendor_names(names),
        }
    }
}

#[async_trait]
impl VendorDirectory for StaticVendorDirectory {
    async fn vendor_names(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.names.clone())
    }
}
