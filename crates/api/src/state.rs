use std::sync::Arc;

use tokio::sync::Mutex;
use vendorhub_core::vendor::VendorDirectory;
use vendorhub_engine::ContractEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// The contract engine. Writes are serialized through the lock.
    pub engine: Arc<Mutex<ContractEngine>>,
    /// Source of vendor names for the contract form.
    pub vendors: Arc<dyn VendorDirectory>,
    /// Database pool, absent when running on in-memory storage.
    pub pool: Option<vendorhub_db::DbPool>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
