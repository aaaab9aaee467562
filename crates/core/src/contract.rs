//! Contract records, the status state machine, and expiry arithmetic.
//!
//! Everything here is pure: status derivation and expiry windows take the
//! current calendar day as an argument so they can be tested without a
//! clock, storage, or any I/O.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::audit::AuditLogEntry;
use crate::error::CoreError;
use crate::storage::DocumentUpload;
use crate::types::{ContractId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default look-ahead window for "expiring soon" contracts.
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 30;

/// Entity name used in `NotFound` errors.
pub const CONTRACT_ENTITY: &str = "Contract";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Contract lifecycle status.
///
/// Serialized with the display labels (`"Under Review"`), which are also
/// the persisted values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractStatus {
    #[default]
    Draft,
    #[serde(rename = "Under Review")]
    UnderReview,
    Signed,
    Active,
    Expired,
    Terminated,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 6] = [
        Self::Draft,
        Self::UnderReview,
        Self::Signed,
        Self::Active,
        Self::Expired,
        Self::Terminated,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::UnderReview => "Under Review",
            Self::Signed => "Signed",
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Terminated => "Terminated",
        }
    }

    /// Only a signed contract can be activated by an operator.
    pub fn can_activate(self) -> bool {
        self == Self::Signed
    }

    /// No further lifecycle work is expected on the contract.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Expired | Self::Terminated)
    }

    /// Badge severity used by list and detail views.
    pub fn badge(self) -> &'static str {
        match self {
            Self::Active | Self::Signed => "default",
            Self::Expired | Self::Terminated => "destructive",
            Self::UnderReview => "secondary",
            Self::Draft => "outline",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContractStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid contract status '{s}'. Must be one of: {}",
                    Self::ALL.map(Self::label).join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Type and signature party
// ---------------------------------------------------------------------------

/// Master service agreement or statement of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "MSA")]
    Msa,
    #[serde(rename = "SOW")]
    Sow,
}

impl ContractType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Msa => "MSA",
            Self::Sow => "SOW",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContractType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MSA" => Ok(Self::Msa),
            "SOW" => Ok(Self::Sow),
            other => Err(CoreError::Validation(format!(
                "Invalid contract type '{other}'. Must be one of: MSA, SOW"
            ))),
        }
    }
}

/// The two parties whose signatures a contract tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureParty {
    Company,
    Vendor,
}

impl FromStr for SignatureParty {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company" => Ok(Self::Company),
            "vendor" => Ok(Self::Vendor),
            other => Err(CoreError::Validation(format!(
                "Invalid signature party '{other}'. Must be one of: company, vendor"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Reference to an attached contract document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub file_name: String,
    pub url: String,
}

/// A vendor agreement tracked from drafting through signature to expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: ContractId,
    pub vendor_name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    pub value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ContractStatus,
    pub scope: String,
    pub milestones: String,
    pub payment_terms: String,
    pub company_signer: String,
    pub vendor_signer: String,
    pub company_signed: bool,
    pub vendor_signed: bool,
    pub document: Option<DocumentRef>,
    pub audit_log: Vec<AuditLogEntry>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Contract {
    pub fn fully_signed(&self) -> bool {
        self.company_signed && self.vendor_signed
    }

    pub fn is_signed_by(&self, party: SignatureParty) -> bool {
        match party {
            SignatureParty::Company => self.company_signed,
            SignatureParty::Vendor => self.vendor_signed,
        }
    }

    /// Days from `today` until the contract's end date.
    pub fn days_until_end(&self, today: NaiveDate) -> i64 {
        days_until(self.end_date, today)
    }
}

/// Input for creating a contract.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    #[serde(default)]
    pub vendor_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub contract_type: Option<ContractType>,
    #[serde(default)]
    pub value: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ContractStatus>,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub milestones: String,
    #[serde(default)]
    pub payment_terms: String,
    #[serde(default)]
    pub company_signer: String,
    #[serde(default)]
    pub vendor_signer: String,
    #[serde(default)]
    pub company_signed: bool,
    #[serde(default)]
    pub vendor_signed: bool,
    #[serde(skip)]
    pub document: Option<DocumentUpload>,
}

/// Partial update merged onto an existing contract.
///
/// `None` fields keep the current value. The document reference is kept
/// unless a new `document` upload is supplied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractPatch {
    pub vendor_name: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub contract_type: Option<ContractType>,
    pub value: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ContractStatus>,
    pub scope: Option<String>,
    pub milestones: Option<String>,
    pub payment_terms: Option<String>,
    pub company_signer: Option<String>,
    pub vendor_signer: Option<String>,
    pub company_signed: Option<bool>,
    pub vendor_signed: Option<bool>,
    #[serde(skip)]
    pub document: Option<DocumentUpload>,
}

impl ContractPatch {
    /// Merge every present field onto `contract`. The document is handled
    /// by the caller since it needs an upload first.
    pub fn merge_into(self, contract: &mut Contract) {
        if let Some(v) = self.vendor_name {
            contract.vendor_name = v;
        }
        if let Some(v) = self.title {
            contract.title = v;
        }
        if let Some(v) = self.contract_type {
            contract.contract_type = v;
        }
        if let Some(v) = self.value {
            contract.value = v;
        }
        if let Some(v) = self.start_date {
            contract.start_date = v;
        }
        if let Some(v) = self.end_date {
            contract.end_date = v;
        }
        if let Some(v) = self.status {
            contract.status = v;
        }
        if let Some(v) = self.scope {
            contract.scope = v;
        }
        if let Some(v) = self.milestones {
            contract.milestones = v;
        }
        if let Some(v) = self.payment_terms {
            contract.payment_terms = v;
        }
        if let Some(v) = self.company_signer {
            contract.company_signer = v;
        }
        if let Some(v) = self.vendor_signer {
            contract.vendor_signer = v;
        }
        if let Some(v) = self.company_signed {
            contract.company_signed = v;
        }
        if let Some(v) = self.vendor_signed {
            contract.vendor_signed = v;
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the fields required at create and edit time.
pub fn validate_contract_fields(
    vendor_name: &str,
    title: &str,
    value: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<(), CoreError> {
    if vendor_name.trim().is_empty() {
        return Err(CoreError::Validation("Please select a vendor".into()));
    }
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Contract title is required".into()));
    }
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "Contract value must be a non-negative amount, got {value}"
        )));
    }
    if start_date > end_date {
        return Err(CoreError::Validation(
            "Start date cannot be after end date".into(),
        ));
    }
    Ok(())
}

/// Re-check an already merged contract.
pub fn validate_contract(contract: &Contract) -> Result<(), CoreError> {
    validate_contract_fields(
        &contract.vendor_name,
        &contract.title,
        contract.value,
        contract.start_date,
        contract.end_date,
    )
}

impl NewContract {
    /// Validate and return the required `(type, start, end)` triple.
    pub fn validate(&self) -> Result<(ContractType, NaiveDate, NaiveDate), CoreError> {
        let contract_type = self
            .contract_type
            .ok_or_else(|| CoreError::Validation("Contract type is required".into()))?;
        let (Some(start), Some(end)) = (self.start_date, self.end_date) else {
            return Err(CoreError::Validation(
                "Please select start and end dates".into(),
            ));
        };
        validate_contract_fields(&self.vendor_name, &self.title, self.value, start, end)?;
        Ok((contract_type, start, end))
    }
}

// ---------------------------------------------------------------------------
// Status derivation
// ---------------------------------------------------------------------------

/// Status after a signature-affecting change.
///
/// With both signatures present the status is `Active` once the start date
/// has been reached and `Signed` before that. Otherwise the current,
/// operator-controlled status is kept.
pub fn derive_status(contract: &Contract, today: NaiveDate) -> ContractStatus {
    if !contract.fully_signed() {
        return contract.status;
    }
    if contract.start_date <= today {
        ContractStatus::Active
    } else {
        ContractStatus::Signed
    }
}

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

/// Whole calendar days from `today` to `date`. Negative once `date` has passed.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Whether a contract ends within `(0, within_days]` days and has `status`.
///
/// A contract ending today yields 0 days and is not "expiring".
pub fn is_expiring(
    contract: &Contract,
    within_days: i64,
    status: ContractStatus,
    today: NaiveDate,
) -> bool {
    let days = contract.days_until_end(today);
    contract.status == status && days > 0 && days <= within_days
}

/// Contracts expiring within the window, in input order.
pub fn list_expiring<'a>(
    contracts: &'a [Contract],
    within_days: i64,
    status: ContractStatus,
    today: NaiveDate,
) -> Vec<&'a Contract> {
    contracts
        .iter()
        .filter(|c| is_expiring(c, within_days, status, today))
        .collect()
}

/// Upper bound, in days, of the `ExpiringSoon` tier.
pub const EXPIRING_SOON_DAYS: i64 = 30;
/// Upper bound, in days, of the `Expiring` tier.
pub const EXPIRING_DAYS: i64 = 90;

/// How close a contract is to its end date, regardless of status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryHealth {
    /// End date has passed.
    Expired,
    /// Ends today or within [`EXPIRING_SOON_DAYS`].
    ExpiringSoon,
    /// Ends within [`EXPIRING_DAYS`].
    Expiring,
    Active,
}

impl ExpiryHealth {
    pub const ALL: [ExpiryHealth; 4] = [
        ExpiryHealth::Expired,
        ExpiryHealth::ExpiringSoon,
        ExpiryHealth::Expiring,
        ExpiryHealth::Active,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::ExpiringSoon => "expiring-soon",
            Self::Expiring => "expiring",
            Self::Active => "active",
        }
    }

    /// Tiers that call for an operator's attention.
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::Expired | Self::ExpiringSoon)
    }
}

pub fn expiry_health(contract: &Contract, today: NaiveDate) -> ExpiryHealth {
    match contract.days_until_end(today) {
        d if d < 0 => ExpiryHealth::Expired,
        d if d <= EXPIRING_SOON_DAYS => ExpiryHealth::ExpiringSoon,
        d if d <= EXPIRING_DAYS => ExpiryHealth::Expiring,
        _ => ExpiryHealth::Active,
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// List-view filter. Absent fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractFilter {
    pub status: Option<ContractStatus>,
    pub vendor: Option<String>,
    #[serde(rename = "type")]
    pub contract_type: Option<ContractType>,
    pub search: Option<String>,
}

impl ContractFilter {
    pub fn matches(&self, contract: &Contract) -> bool {
        if self.status.is_some_and(|s| s != contract.status) {
            return false;
        }
        if self
            .contract_type
            .is_some_and(|t| t != contract.contract_type)
        {
            return false;
        }
        if let Some(vendor) = &self.vendor {
            if contract.vendor_name != *vendor {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                let needle = search.to_lowercase();
                return contract.title.to_lowercase().contains(&needle)
                    || contract.vendor_name.to_lowercase().contains(&needle);
            }
        }
        true
    }

    pub fn apply<'a>(&self, contracts: &'a [Contract]) -> Vec<&'a Contract> {
        contracts.iter().filter(|c| self.matches(c)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
