//! PostgreSQL storage for vendor contracts.
//!
//! - [`models`]: row structs and the snake_case ⇄ domain mapping.
//! - [`repositories`]: zero-sized repos taking `&PgPool`.
//! - [`store`]: [`ContractStore`](vendorhub_core::storage::ContractStore)
//!   and [`VendorDirectory`](vendorhub_core::vendor::VendorDirectory)
//!   implementations over those repos.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::{PgContractStore, PgVendorDirectory};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
