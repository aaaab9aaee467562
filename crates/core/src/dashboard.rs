//! Contract overview figures for the vendor dashboard.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::contract::{
    expiry_health, is_expiring, Contract, ContractStatus, ExpiryHealth, DEFAULT_EXPIRY_WINDOW_DAYS,
};

/// Aggregate counts and values over a set of contracts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSummary {
    pub total: usize,
    /// Count per status label. Every status is present, zero if unused.
    pub by_status: BTreeMap<&'static str, usize>,
    pub total_value: f64,
    pub active_value: f64,
    pub expiring_soon: usize,
    /// Count per expiry tier. Every tier is present, zero if unused.
    pub by_expiry: BTreeMap<&'static str, usize>,
    /// Non-terminal contracts that are expired or expiring soon.
    pub needs_attention: usize,
}

impl ContractSummary {
    pub fn from_contracts(contracts: &[Contract], today: NaiveDate) -> Self {
        let mut by_status: BTreeMap<&'static str, usize> =
            ContractStatus::ALL.iter().map(|s| (s.label(), 0)).collect();

        let mut total_value = 0.0;
        let mut active_value = 0.0;
        let mut expiring_soon = 0;
        let mut by_expiry: BTreeMap<&'static str, usize> =
            ExpiryHealth::ALL.iter().map(|h| (h.label(), 0)).collect();
        let mut needs_attention = 0;

        for contract in contracts {
            *by_status.entry(contract.status.label()).or_default() += 1;
            total_value += contract.value;
            if contract.status == ContractStatus::Active {
                active_value += contract.value;
            }
            if is_expiring(
                contract,
                DEFAULT_EXPIRY_WINDOW_DAYS,
                ContractStatus::Active,
                today,
            ) {
                expiring_soon += 1;
            }

            let health = expiry_health(contract, today);
            *by_expiry.entry(health.label()).or_default() += 1;
            if health.needs_attention() && !contract.status.is_terminal() {
                needs_attention += 1;
            }
        }

        Self {
            total: contracts.len(),
            by_status,
            total_value,
            active_value,
            expiring_soon,
            by_expiry,
            needs_attention,
        }
    }
}
