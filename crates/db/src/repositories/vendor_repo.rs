//! Repository for the `vendors` table (read-only here).

use sqlx::PgPool;

pub struct VendorRepo;

impl VendorRepo {
    /// All vendor display names, alphabetically.
    pub async fn list_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM vendors ORDER BY name")
            .fetch_all(pool)
            .await
    }
}
