//! Core domain logic for travelq.
//! This crate owns the disclosure record schema, its storage and its use-cases.

pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{ensure_schema, open_db, open_db_in_memory, DbError, DbResult};
pub use import::csv_import::{
    bulk_import, bulk_import_from_reader, ImportError, ImportReport, ImportResult,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::record::{Record, RecordUpdate, RecordValidationError, RECORD_FIELD_COUNT};
pub use model::search::{SearchCriteria, SearchField};
pub use repo::record_repo::{
    RecordRepository, RepoError, RepoResult, SqliteRecordRepository, WriteOutcome,
};
pub use service::record_service::{RecordService, SearchOutcome, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
