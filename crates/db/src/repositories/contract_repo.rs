//! Repository for the `contracts` table.

use sqlx::PgPool;

use crate::models::contract::ContractRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, vendor_name, title, type, value, start_date, end_date, status, \
    scope, milestones, payment_terms, company_signer, vendor_signer, \
    vendor_signed, company_signed, pdf_file_name, pdf_url, audit_log, \
    created_at, updated_at";

/// Whole-record persistence for contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// List all contracts, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ContractRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts ORDER BY created_at DESC");
        sqlx::query_as::<_, ContractRow>(&query).fetch_all(pool).await
    }

    /// Insert a fully built row, including its id and timestamps.
    pub async fn create(pool: &PgPool, row: &ContractRow) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                     $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)"
        );
        sqlx::query(&query)
            .bind(&row.id)
            .bind(&row.vendor_name)
            .bind(&row.title)
            .bind(&row.contract_type)
            .bind(row.value)
            .bind(row.start_date)
            .bind(row.end_date)
            .bind(&row.status)
            .bind(&row.scope)
            .bind(&row.milestones)
            .bind(&row.payment_terms)
            .bind(&row.company_signer)
            .bind(&row.vendor_signer)
            .bind(row.vendor_signed)
            .bind(row.company_signed)
            .bind(&row.pdf_file_name)
            .bind(&row.pdf_url)
            .bind(&row.audit_log)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Overwrite every mutable column of an existing row. `created_at` is
    /// never touched.
    ///
    /// Returns `false` if no row with the given id exists.
    pub async fn update(pool: &PgPool, row: &ContractRow) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE contracts SET
                vendor_name = $2,
                title = $3,
                type = $4,
                value = $5,
                start_date = $6,
                end_date = $7,
                status = $8,
                scope = $9,
                milestones = $10,
                payment_terms = $11,
                company_signer = $12,
                vendor_signer = $13,
                vendor_signed = $14,
                company_signed = $15,
                pdf_file_name = $16,
                pdf_url = $17,
                audit_log = $18,
                updated_at = $19
             WHERE id = $1",
        )
        .bind(&row.id)
        .bind(&row.vendor_name)
        .bind(&row.title)
        .bind(&row.contract_type)
        .bind(row.value)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(&row.status)
        .bind(&row.scope)
        .bind(&row.milestones)
        .bind(&row.payment_terms)
        .bind(&row.company_signer)
        .bind(&row.vendor_signer)
        .bind(row.vendor_signed)
        .bind(row.company_signed)
        .bind(&row.pdf_file_name)
        .bind(&row.pdf_url)
        .bind(&row.audit_log)
        .bind(row.updated_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
