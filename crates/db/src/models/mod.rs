//! Row structs and mappings.
//!
//! Database columns use snake_case; the domain types in `vendorhub_core`
//! serialize as camelCase. Every conversion between the two goes through
//! this module.

pub mod contract;
