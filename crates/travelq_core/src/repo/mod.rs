//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Record::validate()` before persistence.
//! - Missing keys on read are `Ok(None)`; missing keys on update/delete are
//!   reported as `WriteOutcome::NoMatch`, never as errors.

pub mod record_repo;
