//! One-time bulk population of the record table.
//!
//! # Responsibility
//! - Parse delimited sources into records.
//! - Insert rows whose key is not already stored.
//!
//! # Invariants
//! - Existing rows are never overwritten by an import.
//! - Each row is written independently; no multi-row transaction.

pub mod csv_import;
