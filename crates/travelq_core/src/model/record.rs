//! Disclosure record model.
//!
//! # Responsibility
//! - Define the six-field disclosure entry used across all layers.
//! - Validate the primary-key invariant at construction time.
//!
//! # Invariants
//! - `ref_number` is non-empty after trimming whitespace.
//! - Serialized field names match `travel_expenses` column names.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of positional fields in an import row.
pub const RECORD_FIELD_COUNT: usize = 6;

/// Validation error for record construction and persistence writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyRefNumber,
    FieldCount { expected: usize, actual: usize },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRefNumber => write!(f, "ref_number cannot be empty"),
            Self::FieldCount { expected, actual } => {
                write!(f, "expected {expected} fields, got {actual}")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// One travel-expense disclosure entry.
///
/// Instances are disposable snapshots; the persisted table owns the
/// authoritative copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Primary key.
    pub ref_number: String,
    pub disclosure_group: String,
    pub title_en: String,
    pub title_fr: String,
    /// Discloser's name.
    pub name: String,
    pub purpose_en: String,
}

/// Replacement values for every non-key field of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub disclosure_group: String,
    pub title_en: String,
    pub title_fr: String,
    pub name: String,
    pub purpose_en: String,
}

impl Record {
    /// Creates a record and validates the key invariant.
    ///
    /// # Errors
    /// - Returns `EmptyRefNumber` when `ref_number` is blank.
    pub fn new(
        ref_number: impl Into<String>,
        disclosure_group: impl Into<String>,
        title_en: impl Into<String>,
        title_fr: impl Into<String>,
        name: impl Into<String>,
        purpose_en: impl Into<String>,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            ref_number: ref_number.into(),
            disclosure_group: disclosure_group.into(),
            title_en: title_en.into(),
            title_fr: title_fr.into(),
            name: name.into(),
            purpose_en: purpose_en.into(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Builds a record from a positional row in schema column order.
    ///
    /// # Errors
    /// - Returns `FieldCount` unless exactly six fields are supplied.
    /// - Returns `EmptyRefNumber` when the first field is blank.
    pub fn from_fields(fields: &[&str]) -> Result<Self, RecordValidationError> {
        match fields {
            [ref_number, disclosure_group, title_en, title_fr, name, purpose_en] => Self::new(
                *ref_number,
                *disclosure_group,
                *title_en,
                *title_fr,
                *name,
                *purpose_en,
            ),
            _ => Err(RecordValidationError::FieldCount {
                expected: RECORD_FIELD_COUNT,
                actual: fields.len(),
            }),
        }
    }

    /// Re-checks the key invariant, e.g. after fields were mutated in place.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.ref_number.trim().is_empty() {
            return Err(RecordValidationError::EmptyRefNumber);
        }
        Ok(())
    }
}
