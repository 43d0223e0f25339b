//! CSV import into `travel_expenses`.
//!
//! # Responsibility
//! - Skip the header line and map each six-field row onto a `Record`.
//! - Insert each record only when its `ref_number` is not yet stored.
//!
//! # Invariants
//! - Rows with the wrong field count or a blank key are skipped silently.
//! - A missing source aborts before any row is written.

use crate::model::record::Record;
use crate::repo::record_repo::{RecordRepository, RepoError};
use csv::ReaderBuilder;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type ImportResult<T> = Result<T, ImportError>;

/// Error that aborts a bulk import.
#[derive(Debug)]
pub enum ImportError {
    SourceNotFound(PathBuf),
    Io(io::Error),
    /// The source is not readable as UTF-8 CSV.
    Csv(csv::Error),
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceNotFound(path) => write!(f, "File not found: {}", path.display()),
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "invalid import source: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SourceNotFound(_) => None,
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Counts of rows written or left alone by an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows newly added to the table.
    pub inserted: usize,
    /// Well-formed rows whose key was already stored.
    pub already_present: usize,
}

/// Imports records from a CSV file on disk.
///
/// # Errors
/// - `SourceNotFound` when `source` does not exist.
/// - `Io` when the file exists but cannot be opened.
/// - `Csv` / `Repo` when reading or inserting a row fails; rows written
///   before the failure stay in place.
pub fn bulk_import<R>(repo: &R, source: impl AsRef<Path>) -> ImportResult<ImportReport>
where
    R: RecordRepository + ?Sized,
{
    let source = source.as_ref();
    let file = File::open(source).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            error!(
                "event=bulk_import module=import status=error error_code=source_not_found path={}",
                source.display()
            );
            ImportError::SourceNotFound(source.to_path_buf())
        } else {
            ImportError::Io(err)
        }
    })?;

    bulk_import_from_reader(repo, file)
}

/// Imports records from any CSV byte stream whose first line is a header.
pub fn bulk_import_from_reader<R, S>(repo: &R, source: S) -> ImportResult<ImportReport>
where
    R: RecordRepository + ?Sized,
    S: Read,
{
    let started_at = Instant::now();
    info!("event=bulk_import module=import status=start");

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);
    let mut report = ImportReport::default();

    for result in reader.records() {
        let row = result.map_err(|err| {
            error!("event=bulk_import module=import status=error error_code=csv_read error={err}");
            ImportError::from(err)
        })?;
        let fields = row.iter().collect::<Vec<_>>();

        let record = match Record::from_fields(&fields) {
            Ok(record) => record,
            Err(err) => {
                debug!(
                    "event=import_row module=import status=skipped line={} reason={}",
                    row.position().map_or(0, |pos| pos.line()),
                    err
                );
                continue;
            }
        };

        if repo.insert_if_absent(&record)? {
            report.inserted += 1;
            debug!(
                "event=import_row module=import status=inserted ref_number={}",
                record.ref_number
            );
        } else {
            report.already_present += 1;
        }
    }

    info!(
        "event=bulk_import module=import status=ok inserted={} already_present={} duration_ms={}",
        report.inserted,
        report.already_present,
        started_at.elapsed().as_millis()
    );
    Ok(report)
}
