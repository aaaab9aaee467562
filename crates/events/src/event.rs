use chrono::NaiveDate;
use serde::Serialize;
use vendorhub_core::contract::{Contract, ContractStatus};
use vendorhub_core::types::{ContractId, Timestamp};

/// Kinds of contract activity worth telling someone about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractEventKind {
    Created,
    /// An operator asked for the client to be told about the contract.
    ClientNotified,
}

impl ContractEventKind {
    /// Dot-separated name used in logs.
    pub fn event_type(self) -> &'static str {
        match self {
            Self::Created => "contract.created",
            Self::ClientNotified => "contract.client_notified",
        }
    }
}

/// Snapshot of a contract at the moment something happened to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractEvent {
    pub kind: ContractEventKind,
    pub contract_id: ContractId,
    pub vendor_name: String,
    pub title: String,
    pub status: ContractStatus,
    pub value: f64,
    pub end_date: NaiveDate,
    pub actor: String,
    pub occurred_at: Timestamp,
}

impl ContractEvent {
    pub fn from_contract(
        kind: ContractEventKind,
        contract: &Contract,
        actor: impl Into<String>,
        occurred_at: Timestamp,
    ) -> Self {
        Self {
            kind,
            contract_id: contract.id.clone(),
            vendor_name: contract.vendor_name.clone(),
            title: contract.title.clone(),
            status: contract.status,
            value: contract.value,
            end_date: contract.end_date,
            actor: actor.into(),
            occurred_at,
        }
    }
}
