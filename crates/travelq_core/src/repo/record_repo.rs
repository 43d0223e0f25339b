//! Record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and multi-column search over `travel_expenses`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Record::validate()` before SQL mutations.
//! - Search binds every term as a parameter; identifiers come only from
//!   `SearchField`.
//! - `list_records` applies no ordering; rows come back in storage order.

use crate::db::DbError;
use crate::model::record::{Record, RecordUpdate, RecordValidationError};
use crate::model::search::SearchCriteria;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORD_SELECT_SQL: &str = "SELECT
    ref_number,
    disclosure_group,
    title_en,
    title_fr,
    name,
    purpose_en
FROM travel_expenses";

const LIKE_ESCAPE: char = '\\';

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    /// A row with this `ref_number` already exists.
    ConstraintViolation(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::ConstraintViolation(ref_number) => {
                write!(f, "record already exists: {ref_number}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::ConstraintViolation(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Effect of a keyed update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The keyed row existed and was changed.
    Applied,
    /// No row matched the key; storage is unchanged.
    NoMatch,
}

impl WriteOutcome {
    fn from_changed(changed: usize) -> Self {
        if changed == 0 {
            Self::NoMatch
        } else {
            Self::Applied
        }
    }
}

/// Repository interface for disclosure records.
pub trait RecordRepository {
    fn get_record(&self, ref_number: &str) -> RepoResult<Option<Record>>;
    fn list_records(&self) -> RepoResult<Vec<Record>>;
    fn create_record(&self, record: &Record) -> RepoResult<()>;
    /// Inserts unless the key is already taken; returns whether a row was added.
    fn insert_if_absent(&self, record: &Record) -> RepoResult<bool>;
    fn update_record(&self, ref_number: &str, update: &RecordUpdate) -> RepoResult<WriteOutcome>;
    fn delete_record(&self, ref_number: &str) -> RepoResult<WriteOutcome>;
    fn search_records(&self, criteria: &SearchCriteria) -> RepoResult<Vec<Record>>;
    fn count_records(&self) -> RepoResult<u64>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Wraps a connection whose schema was prepared by `open_db*` or
    /// `ensure_schema`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn get_record(&self, ref_number: &str) -> RepoResult<Option<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE ref_number = ?1;"))?;

        let mut rows = stmt.query([ref_number])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn list_records(&self) -> RepoResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(&format!("{RECORD_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn create_record(&self, record: &Record) -> RepoResult<()> {
        record.validate()?;

        let result = self.conn.execute(
            "INSERT INTO travel_expenses (
                ref_number,
                disclosure_group,
                title_en,
                title_fr,
                name,
                purpose_en
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                record.ref_number.as_str(),
                record.disclosure_group.as_str(),
                record.title_en.as_str(),
                record.title_fr.as_str(),
                record.name.as_str(),
                record.purpose_en.as_str(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_constraint_violation(&err) => {
                Err(RepoError::ConstraintViolation(record.ref_number.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn insert_if_absent(&self, record: &Record) -> RepoResult<bool> {
        record.validate()?;

        let changed = self.conn.execute(
            "INSERT INTO travel_expenses (
                ref_number,
                disclosure_group,
                title_en,
                title_fr,
                name,
                purpose_en
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(ref_number) DO NOTHING;",
            params![
                record.ref_number.as_str(),
                record.disclosure_group.as_str(),
                record.title_en.as_str(),
                record.title_fr.as_str(),
                record.name.as_str(),
                record.purpose_en.as_str(),
            ],
        )?;

        Ok(changed > 0)
    }

    fn update_record(&self, ref_number: &str, update: &RecordUpdate) -> RepoResult<WriteOutcome> {
        let changed = self.conn.execute(
            "UPDATE travel_expenses
             SET
                disclosure_group = ?1,
                title_en = ?2,
                title_fr = ?3,
                name = ?4,
                purpose_en = ?5
             WHERE ref_number = ?6;",
            params![
                update.disclosure_group.as_str(),
                update.title_en.as_str(),
                update.title_fr.as_str(),
                update.name.as_str(),
                update.purpose_en.as_str(),
                ref_number,
            ],
        )?;

        Ok(WriteOutcome::from_changed(changed))
    }

    fn delete_record(&self, ref_number: &str) -> RepoResult<WriteOutcome> {
        let changed = self.conn.execute(
            "DELETE FROM travel_expenses WHERE ref_number = ?1;",
            [ref_number],
        )?;

        Ok(WriteOutcome::from_changed(changed))
    }

    fn search_records(&self, criteria: &SearchCriteria) -> RepoResult<Vec<Record>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::with_capacity(criteria.len());

        for (field, term) in criteria.iter() {
            sql.push_str(&format!(
                " AND {} LIKE ? ESCAPE '{LIKE_ESCAPE}'",
                field.column()
            ));
            bind_values.push(Value::Text(like_contains_pattern(term)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn count_records(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM travel_expenses;", [], |row| {
                row.get::<_, i64>(0)
            })?;

        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let ref_number = row
        .get::<_, Option<String>>("ref_number")?
        .ok_or_else(|| RepoError::InvalidData("null ref_number in travel_expenses".to_string()))?;

    let record = Record {
        ref_number,
        disclosure_group: text_or_empty(row, "disclosure_group")?,
        title_en: text_or_empty(row, "title_en")?,
        title_fr: text_or_empty(row, "title_fr")?,
        name: text_or_empty(row, "name")?,
        purpose_en: text_or_empty(row, "purpose_en")?,
    };
    record.validate().map_err(|err| {
        RepoError::InvalidData(format!("invalid ref_number in travel_expenses: {err}"))
    })?;
    Ok(record)
}

// Non-key columns are nullable TEXT; NULL reads back as an empty field.
fn text_or_empty(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

fn like_contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::like_contains_pattern;

    #[test]
    fn like_pattern_wraps_term_with_wildcards() {
        assert_eq!(like_contains_pattern("Smith"), "%Smith%");
        assert_eq!(like_contains_pattern(""), "%%");
    }

    #[test]
    fn like_pattern_escapes_wildcards_and_escape_char() {
        assert_eq!(like_contains_pattern("50%"), "%50\\%%");
        assert_eq!(like_contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_contains_pattern("c:\\x"), "%c:\\\\x%");
    }
}
