//! Table definition for disclosure records.

use super::DbResult;
use log::debug;
use rusqlite::Connection;

/// Name of the persisted record table.
pub const RECORDS_TABLE: &str = "travel_expenses";

const CREATE_RECORDS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS travel_expenses (
    ref_number TEXT PRIMARY KEY,
    disclosure_group TEXT,
    title_en TEXT,
    title_fr TEXT,
    name TEXT,
    purpose_en TEXT
);";

/// Creates the record table when it is absent.
///
/// Safe to call any number of times; existing rows are left untouched.
///
/// # Errors
/// - Returns `DbError::Sqlite` when the statement cannot be executed.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_RECORDS_TABLE_SQL)?;
    debug!("event=ensure_schema module=db status=ok table={RECORDS_TABLE}");
    Ok(())
}
