//! Domain model for travel-expense disclosures.
//!
//! # Responsibility
//! - Define the canonical record shape shared by storage, import and UI.
//! - Define the closed set of searchable columns.
//!
//! # Invariants
//! - Every record is identified by a non-empty `ref_number`.
//! - Searchable column names never come from free-form user text.

pub mod record;
pub mod search;
