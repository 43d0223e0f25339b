//! Record use-case service.
//!
//! # Responsibility
//! - Provide CRUD, import and search entry points for the menu layer.
//! - Reject missing input before it reaches storage.
//! - Turn free-form search columns into the `SearchField` allow-list.
//!
//! # Invariants
//! - Empty search criteria never reach the repository.
//! - Service APIs never bypass repository validation.

use crate::import::csv_import::{bulk_import, ImportError, ImportReport};
use crate::model::record::{Record, RecordUpdate};
use crate::model::search::{SearchCriteria, SearchField};
use crate::repo::record_repo::{RecordRepository, RepoError, WriteOutcome};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for record use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// A required input was blank; carries the input's name.
    MissingInput(&'static str),
    /// Search was requested without any column/term pair.
    EmptyCriteria,
    /// Search column is not part of the record schema.
    InvalidSearchField(String),
    Import(ImportError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInput(name) => write!(f, "{name} is required"),
            Self::EmptyCriteria => write!(f, "No search criteria provided."),
            Self::InvalidSearchField(column) => write!(f, "Invalid search field: {column}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Import(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ImportError> for ServiceError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

/// Result of a multi-column search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// At least one record matched; storage order is preserved.
    Found(Vec<Record>),
    NoMatches,
}

/// Use-case service wrapper for record operations.
pub struct RecordService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads records from a CSV file, keeping rows that already exist.
    pub fn load_data(&self, source: impl AsRef<Path>) -> ServiceResult<ImportReport> {
        Ok(bulk_import(&self.repo, source)?)
    }

    /// Gets one record by reference number.
    pub fn show_record(&self, ref_number: &str) -> ServiceResult<Option<Record>> {
        let ref_number = require(ref_number, "reference number")?;
        Ok(self.repo.get_record(ref_number)?)
    }

    /// Lists every stored record in storage order.
    pub fn show_records(&self) -> ServiceResult<Vec<Record>> {
        Ok(self.repo.list_records()?)
    }

    /// Adds a new record.
    ///
    /// Returns `Repo(ConstraintViolation)` when the key is already stored.
    pub fn add_record(&self, record: &Record) -> ServiceResult<()> {
        require(&record.ref_number, "reference number")?;
        self.repo.create_record(record)?;
        info!(
            "event=record_create module=service status=ok ref_number={}",
            record.ref_number
        );
        Ok(())
    }

    /// Replaces all non-key fields of an existing record.
    ///
    /// A missing key yields `WriteOutcome::NoMatch` and leaves storage unchanged.
    pub fn edit_record(
        &self,
        ref_number: &str,
        update: &RecordUpdate,
    ) -> ServiceResult<WriteOutcome> {
        let ref_number = require(ref_number, "reference number")?;
        let outcome = self.repo.update_record(ref_number, update)?;
        log_write("record_update", ref_number, outcome);
        Ok(outcome)
    }

    /// Deletes a record by reference number.
    ///
    /// A missing key yields `WriteOutcome::NoMatch`.
    pub fn delete_record(&self, ref_number: &str) -> ServiceResult<WriteOutcome> {
        let ref_number = require(ref_number, "reference number")?;
        let outcome = self.repo.delete_record(ref_number)?;
        log_write("record_delete", ref_number, outcome);
        Ok(outcome)
    }

    /// Searches with free-form `(column, term)` pairs.
    ///
    /// # Errors
    /// - `InvalidSearchField` for a column outside the record schema.
    /// - `EmptyCriteria` when no pairs were supplied.
    pub fn search<I, C, T>(&self, pairs: I) -> ServiceResult<SearchOutcome>
    where
        I: IntoIterator<Item = (C, T)>,
        C: AsRef<str>,
        T: Into<String>,
    {
        let mut criteria = SearchCriteria::new();
        for (column, term) in pairs {
            let column = column.as_ref();
            let field = SearchField::parse(column).ok_or_else(|| {
                warn!("event=record_search module=service status=rejected reason=invalid_field");
                ServiceError::InvalidSearchField(column.trim().to_string())
            })?;
            criteria.insert(field, term);
        }

        self.search_criteria(&criteria)
    }

    /// Searches with already-validated criteria.
    pub fn search_criteria(&self, criteria: &SearchCriteria) -> ServiceResult<SearchOutcome> {
        if criteria.is_empty() {
            return Err(ServiceError::EmptyCriteria);
        }

        let records = self.repo.search_records(criteria)?;
        info!(
            "event=record_search module=service status=ok fields={} hits={}",
            criteria.len(),
            records.len()
        );

        if records.is_empty() {
            Ok(SearchOutcome::NoMatches)
        } else {
            Ok(SearchOutcome::Found(records))
        }
    }

    /// Returns how many records are stored.
    pub fn record_count(&self) -> ServiceResult<u64> {
        Ok(self.repo.count_records()?)
    }
}

fn require<'a>(value: &'a str, name: &'static str) -> ServiceResult<&'a str> {
    if value.trim().is_empty() {
        return Err(ServiceError::MissingInput(name));
    }
    Ok(value)
}

fn log_write(event: &str, ref_number: &str, outcome: WriteOutcome) {
    match outcome {
        WriteOutcome::Applied => {
            info!("event={event} module=service status=ok ref_number={ref_number}")
        }
        WriteOutcome::NoMatch => {
            info!("event={event} module=service status=no_match ref_number={ref_number}")
        }
    }
}
