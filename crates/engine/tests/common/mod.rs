//! Shared helpers for engine integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, TimeZone, Utc};
use vendorhub_core::contract::{ContractType, NewContract};
use vendorhub_core::types::{Clock, Timestamp};
use vendorhub_engine::memory::{MemoryContractStore, MemoryDocumentStore};
use vendorhub_engine::ContractEngine;

/// The fixed "today" all engine tests run at.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

pub fn noon_today() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + chrono::Duration::days(days)
}

/// A clock the test can move, including backwards.
pub struct ManualClock(Mutex<Timestamp>);

impl ManualClock {
    pub fn new(at: Timestamp) -> Self {
        Self(Mutex::new(at))
    }

    pub fn set(&self, at: Timestamp) {
        *self.0.lock().unwrap() = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.0.lock().unwrap()
    }
}

pub struct Harness {
    pub engine: ContractEngine,
    pub store: Arc<MemoryContractStore>,
    pub documents: Arc<MemoryDocumentStore>,
    pub clock: Arc<ManualClock>,
}

pub fn harness() -> Harness {
    harness_with_documents(MemoryDocumentStore::new())
}

pub fn harness_with_documents(documents: MemoryDocumentStore) -> Harness {
    let store = Arc::new(MemoryContractStore::new());
    let documents = Arc::new(documents);
    let clock = Arc::new(ManualClock::new(noon_today()));
    let engine = ContractEngine::new(store.clone(), documents.clone()).with_clock(clock.clone());
    Harness {
        engine,
        store,
        documents,
        clock,
    }
}

/// A valid draft contract input starting in the past.
pub fn new_contract() -> NewContract {
    NewContract {
        vendor_name: "Acme Staffing".into(),
        title: "Platform build-out".into(),
        contract_type: Some(ContractType::Sow),
        value: 48_000.0,
        start_date: Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
        end_date: Some(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()),
        status: None,
        scope: "Backend services".into(),
        milestones: "M1: design; M2: launch".into(),
        payment_terms: "Net 30".into(),
        company_signer: "J. Park".into(),
        vendor_signer: "R. Diaz".into(),
        company_signed: false,
        vendor_signed: false,
        document: None,
    }
}
