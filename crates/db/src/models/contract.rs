//! Contract row model and its mapping to the domain [`Contract`].

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::FromRow;
use vendorhub_core::audit::AuditLogEntry;
use vendorhub_core::contract::{Contract, ContractStatus, ContractType, DocumentRef};
use vendorhub_core::error::CoreError;
use vendorhub_core::storage::{ChangeKind, StoreChange};
use vendorhub_core::types::Timestamp;

/// A row from the `contracts` table.
///
/// Text columns that the domain treats as "empty by default" are nullable
/// here; `None` maps to an empty string.
#[derive(Debug, Clone, FromRow)]
pub struct ContractRow {
    pub id: String,
    pub vendor_name: String,
    pub title: String,
    #[sqlx(rename = "type")]
    pub contract_type: String,
    pub value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub scope: Option<String>,
    pub milestones: Option<String>,
    pub payment_terms: Option<String>,
    pub company_signer: Option<String>,
    pub vendor_signer: Option<String>,
    pub vendor_signed: bool,
    pub company_signed: bool,
    pub pdf_file_name: Option<String>,
    pub pdf_url: Option<String>,
    pub audit_log: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ContractRow> for Contract {
    type Error = CoreError;

    fn try_from(row: ContractRow) -> Result<Self, Self::Error> {
        let contract_type: ContractType = row
            .contract_type
            .parse()
            .map_err(|e: CoreError| corrupt(&row.id, e))?;
        let status: ContractStatus = row.status.parse().map_err(|e: CoreError| corrupt(&row.id, e))?;

        let audit_log: Vec<AuditLogEntry> = match row.audit_log {
            serde_json::Value::Null => Vec::new(),
            value => serde_json::from_value(value).map_err(|e| {
                CoreError::Storage(format!("Contract {} has an unreadable audit log: {e}", row.id))
            })?,
        };

        // Only a complete pair is a usable reference.
        let document = match (row.pdf_file_name, row.pdf_url) {
            (Some(file_name), Some(url)) => Some(DocumentRef { file_name, url }),
            _ => None,
        };

        Ok(Contract {
            id: row.id,
            vendor_name: row.vendor_name,
            title: row.title,
            contract_type,
            value: row.value,
            start_date: row.start_date,
            end_date: row.end_date,
            status,
            scope: row.scope.unwrap_or_default(),
            milestones: row.milestones.unwrap_or_default(),
            payment_terms: row.payment_terms.unwrap_or_default(),
            company_signer: row.company_signer.unwrap_or_default(),
            vendor_signer: row.vendor_signer.unwrap_or_default(),
            company_signed: row.company_signed,
            vendor_signed: row.vendor_signed,
            document,
            audit_log,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<&Contract> for ContractRow {
    type Error = CoreError;

    fn try_from(c: &Contract) -> Result<Self, Self::Error> {
        let audit_log = serde_json::to_value(&c.audit_log)
            .map_err(|e| CoreError::Internal(format!("Cannot encode audit log: {e}")))?;

        Ok(ContractRow {
            id: c.id.clone(),
            vendor_name: c.vendor_name.clone(),
            title: c.title.clone(),
            contract_type: c.contract_type.label().to_string(),
            value: c.value,
            start_date: c.start_date,
            end_date: c.end_date,
            status: c.status.label().to_string(),
            scope: Some(c.scope.clone()),
            milestones: Some(c.milestones.clone()),
            payment_terms: Some(c.payment_terms.clone()),
            company_signer: Some(c.company_signer.clone()),
            vendor_signer: Some(c.vendor_signer.clone()),
            vendor_signed: c.vendor_signed,
            company_signed: c.company_signed,
            pdf_file_name: c.document.as_ref().map(|d| d.file_name.clone()),
            pdf_url: c.document.as_ref().map(|d| d.url.clone()),
            audit_log,
            created_at: c.created_at,
            updated_at: c.updated_at,
        })
    }
}

fn corrupt(id: &str, err: CoreError) -> CoreError {
    CoreError::Storage(format!("Contract {id} has invalid stored data: {}", err.detail()))
}

// ---------------------------------------------------------------------------
// Change notifications
// ---------------------------------------------------------------------------

/// Payload sent by the `notify_contracts_changes` trigger.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractChangePayload {
    pub kind: String,
    pub id: Option<String>,
}

/// Parse a `contracts_changes` payload. Anything unreadable is still a
/// change, just one without details.
pub fn parse_change_payload(payload: &str) -> StoreChange {
    let Ok(parsed) = serde_json::from_str::<ContractChangePayload>(payload) else {
        return StoreChange::unknown();
    };
    let kind = match parsed.kind.as_str() {
        "insert" => Some(ChangeKind::Insert),
        "update" => Some(ChangeKind::Update),
        "delete" => Some(ChangeKind::Delete),
        _ => None,
    };
    StoreChange {
        kind,
        contract_id: parsed.id,
    }
}
