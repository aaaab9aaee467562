use chrono::{NaiveDate, Utc};

/// Contract identifiers are opaque strings (`contract-<uuid>`).
pub type ContractId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Prefix for generated contract identifiers.
pub const CONTRACT_ID_PREFIX: &str = "contract-";

/// Generate a fresh contract identifier.
pub fn new_contract_id() -> ContractId {
    format!("{CONTRACT_ID_PREFIX}{}", uuid::Uuid::now_v7().simple())
}

/// Source of "now" for the lifecycle engine.
///
/// Status derivation and expiry windows compare against calendar days, so
/// the clock also exposes [`today`](Clock::today).
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant. Used in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
