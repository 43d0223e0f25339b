//! travelq interactive entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the database.
//! - Import the configured CSV once, then hand control to the menu.
//!
//! # Invariants
//! - One connection is opened per process and closed on every exit path.

mod config;
mod menu;

use config::AppConfig;
use log::{error, info, warn};
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use travelq_core::{
    init_logging, open_db, ImportError, RecordRepository, RecordService, ServiceError,
    SqliteRecordRepository,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("travelq: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    println!("travelq {}", travelq_core::core_version());
    let conn = open_db(&config.db_path)?;

    let session = {
        let service = RecordService::new(SqliteRecordRepository::new(&conn));
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        import_on_startup(&service, &config.csv_path, &mut out)
            .and_then(|()| menu::Menu::new(&service, stdin.lock(), out).run())
    };

    let closed = conn.close().map_err(|(_, err)| err);
    finish_session(session, closed)
}

/// Imports the startup CSV and reports how many records are stored.
fn import_on_startup<R, W>(
    service: &RecordService<R>,
    csv_path: &Path,
    out: &mut W,
) -> io::Result<()>
where
    R: RecordRepository,
    W: Write,
{
    match service.load_data(csv_path) {
        Ok(report) => writeln!(
            out,
            "Imported {} new records from {} ({} already present).",
            report.inserted,
            csv_path.display(),
            report.already_present
        )?,
        Err(ServiceError::Import(ImportError::SourceNotFound(path))) => {
            writeln!(out, "File not found: {}", path.display())?;
        }
        Err(err) => {
            warn!("event=startup_import module=cli status=error error={err}");
            writeln!(out, "An error occurred: {err}")?;
        }
    }

    match service.record_count() {
        Ok(count) => {
            info!("event=startup_import module=cli status=ok records={count}");
            writeln!(out, "{count} records stored.")?;
        }
        Err(err) => {
            warn!("event=startup_import module=cli status=error error_code=count_failed error={err}");
            writeln!(out, "An error occurred: {err}")?;
        }
    }
    Ok(())
}

/// Combines the menu result with the connection close result.
///
/// A menu I/O failure takes precedence; a close failure alongside it is
/// logged so neither is lost.
fn finish_session<E>(session: io::Result<()>, closed: Result<(), E>) -> Result<(), Box<dyn Error>>
where
    E: Error + 'static,
{
    match (session, closed) {
        (Ok(()), Ok(())) => {
            info!("event=app_exit module=cli status=ok");
            Ok(())
        }
        (Err(session_err), Ok(())) => Err(session_err.into()),
        (Ok(()), Err(close_err)) => {
            error!("event=db_close module=cli status=error error={close_err}");
            Err(close_err.into())
        }
        (Err(session_err), Err(close_err)) => {
            error!("event=db_close module=cli status=error error={close_err}");
            Err(session_err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{finish_session, import_on_startup};
    use std::fmt::{Display, Formatter};
    use std::fs;
    use std::io;
    use travelq_core::{open_db_in_memory, RecordService, SqliteRecordRepository};

    #[derive(Debug)]
    struct CloseFailed;

    impl Display for CloseFailed {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("database is locked")
        }
    }

    impl std::error::Error for CloseFailed {}

    #[test]
    fn startup_import_reports_stored_record_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("travelq.csv");
        fs::write(
            &path,
            "ref_number,disclosure_group,title_en,title_fr,name,purpose_en\nA1,G,T,T,N,P\nA2,G,T,T,N,P\n",
        )
        .unwrap();
        let conn = open_db_in_memory().unwrap();
        let service = RecordService::new(SqliteRecordRepository::new(&conn));
        let mut out = Vec::new();

        import_on_startup(&service, &path, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Imported 2 new records"));
        assert!(out.contains("2 records stored."));
    }

    #[test]
    fn missing_startup_csv_still_reports_count() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_db_in_memory().unwrap();
        let service = RecordService::new(SqliteRecordRepository::new(&conn));
        let mut out = Vec::new();

        import_on_startup(&service, &dir.path().join("absent.csv"), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("File not found:"));
        assert!(out.contains("0 records stored."));
    }

    #[test]
    fn session_error_wins_over_close_error() {
        let session = Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"));

        let err = finish_session(session, Err(CloseFailed)).unwrap_err();
        assert_eq!(err.to_string(), "stdout closed");
    }

    #[test]
    fn close_error_surfaces_after_clean_session() {
        let err = finish_session(Ok(()), Err(CloseFailed)).unwrap_err();
        assert_eq!(err.to_string(), "database is locked");

        assert!(finish_session::<CloseFailed>(Ok(()), Ok(())).is_ok());
    }
}
