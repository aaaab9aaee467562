//! Vendor contract domain: records, lifecycle rules, and collaborator traits.
//!
//! This crate has no internal dependencies so it can be shared by the
//! storage layer, the lifecycle engine, and the API.

pub mod audit;
pub mod contract;
pub mod dashboard;
pub mod error;
pub mod storage;
pub mod types;
pub mod vendor;
