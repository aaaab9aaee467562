//! Contract audit trail entries and action labels.
//!
//! Every mutation of a contract appends exactly one [`AuditLogEntry`] to the
//! contract's own log. Entries are never edited or removed.

use serde::{Deserialize, Serialize};

use crate::contract::{ContractStatus, SignatureParty};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Action labels
// ---------------------------------------------------------------------------

/// Known action labels for contract audit entries.
pub mod actions {
    pub const CONTRACT_CREATED: &str = "Contract Created";
    pub const CONTRACT_UPDATED: &str = "Contract Updated";
    pub const COMPANY_SIGNED: &str = "Company Signed";
    pub const VENDOR_SIGNED: &str = "Vendor Signed";
    pub const DOCUMENT_ATTACHED: &str = "Document Attached";

    /// Prefix for manual status overrides, followed by the status label.
    pub const STATUS_CHANGED_PREFIX: &str = "Status changed to ";
}

/// Actor recorded when a caller does not identify itself.
pub const DEFAULT_ACTOR: &str = "Current User";

/// Audit label for a signature event.
pub fn signature_action(party: SignatureParty) -> &'static str {
    match party {
        SignatureParty::Company => actions::COMPANY_SIGNED,
        SignatureParty::Vendor => actions::VENDOR_SIGNED,
    }
}

/// Audit label for a manual status change, e.g. `"Status changed to Under Review"`.
pub fn status_change_action(status: ContractStatus) -> String {
    format!("{}{}", actions::STATUS_CHANGED_PREFIX, status.label())
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One immutable record of an action taken against a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub action: String,
    pub user: String,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Map<String, serde_json::Value>>,
}

impl AuditLogEntry {
    pub fn new(action: impl Into<String>, user: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            action: action.into(),
            user: user.into(),
            timestamp,
            meta: None,
        }
    }

    /// Attach a metadata mapping. Non-object values are ignored.
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = meta {
            self.meta = Some(map);
        }
        self
    }
}
