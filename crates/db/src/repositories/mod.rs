//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod contract_repo;
pub mod vendor_repo;

pub use contract_repo::ContractRepo;
pub use vendor_repo::VendorRepo;
