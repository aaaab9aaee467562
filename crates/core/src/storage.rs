//! Storage collaborator contracts and the local document store.
//!
//! The lifecycle engine never talks to a database or object store directly.
//! It persists whole contract records through [`ContractStore`] and uploads
//! attachments through [`DocumentStore`]; implementations live in the `db`
//! crate (PostgreSQL) and the engine's in-memory test doubles.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;

use crate::contract::{Contract, DocumentRef};
use crate::error::CoreError;
use crate::types::ContractId;

// ---------------------------------------------------------------------------
// Contract storage
// ---------------------------------------------------------------------------

/// Kind of row-level change reported by a [`ContractStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A change notification. Consumers must not rely on the payload and should
/// reload the full list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreChange {
    pub kind: Option<ChangeKind>,
    pub contract_id: Option<ContractId>,
}

impl StoreChange {
    pub fn new(kind: ChangeKind, contract_id: impl Into<ContractId>) -> Self {
        Self {
            kind: Some(kind),
            contract_id: Some(contract_id.into()),
        }
    }

    /// A change with no payload.
    pub fn unknown() -> Self {
        Self {
            kind: None,
            contract_id: None,
        }
    }
}

/// Persistence for whole contract records.
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// All contracts, newest `created_at` first.
    async fn fetch_all(&self) -> Result<Vec<Contract>, CoreError>;

    async fn create(&self, contract: &Contract) -> Result<(), CoreError>;

    /// Overwrite the stored record with the same id (last write wins).
    async fn update(&self, contract: &Contract) -> Result<(), CoreError>;

    /// Subscribe to insert/update/delete notifications from any source.
    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange>;
}

// ---------------------------------------------------------------------------
// Document storage
// ---------------------------------------------------------------------------

/// A binary document to attach to a contract.
#[derive(Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for DocumentUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }
}

/// Result of an upload: the original file name, where it can be fetched,
/// and whether the reference survives the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub file_name: String,
    pub url: String,
    pub persistent: bool,
}

impl From<StoredDocument> for DocumentRef {
    fn from(doc: StoredDocument) -> Self {
        DocumentRef {
            file_name: doc.file_name,
            url: doc.url,
        }
    }
}

/// Binary document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upload(&self, upload: &DocumentUpload) -> Result<StoredDocument, CoreError>;
}

/// URL scheme for session-only fallback references.
pub const SESSION_URL_SCHEME: &str = "session://";

/// Local, non-persistent reference used when an upload fails.
pub fn session_document_ref(upload: &DocumentUpload) -> StoredDocument {
    StoredDocument {
        file_name: upload.file_name.clone(),
        url: format!(
            "{SESSION_URL_SCHEME}{}/{}",
            uuid::Uuid::new_v4(),
            upload.file_name
        ),
        persistent: false,
    }
}

/// Reduce a client-supplied file name to a safe single path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Stores documents in a local directory, served from `base_url`.
///
/// Files are written as `<uuid>-<name>` and opened with `create_new`, so an
/// existing file is never overwritten. A name clash is an upload error.
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
    base_url: String,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn upload(&self, upload: &DocumentUpload) -> Result<StoredDocument, CoreError> {
        let stored_name = format!(
            "{}-{}",
            uuid::Uuid::now_v7().simple(),
            sanitize_file_name(&upload.file_name)
        );

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CoreError::Upload(format!("Cannot create document directory: {e}")))?;

        let write_err =
            |e: std::io::Error| CoreError::Upload(format!("Cannot write '{stored_name}': {e}"));
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.root.join(&stored_name))
            .await
            .map_err(write_err)?;
        file.write_all(&upload.bytes).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;

        tracing::debug!(
            file_name = %upload.file_name,
            stored_name = %stored_name,
            bytes = upload.bytes.len(),
            "Document stored"
        );

        Ok(StoredDocument {
            file_name: upload.file_name.clone(),
            url: format!("{}/{stored_name}", self.base_url),
            persistent: true,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
