//! Interactive text menu.
//!
//! # Responsibility
//! - Render the six-choice menu and collect field-by-field input.
//! - Forward each choice to `RecordService` and render its outcome.
//!
//! # Invariants
//! - Every failure prints a message and returns to the menu.
//! - Only choice 6 or end of input leaves the loop.

use log::error;
use std::io::{self, BufRead, Write};
use travelq_core::{
    Record, RecordRepository, RecordService, RecordUpdate, SearchField,
    SearchOutcome, ServiceError, WriteOutcome,
};

const SEARCH_SENTINEL: &str = "done";
const RECORD_SEPARATOR_WIDTH: usize = 30;

/// Menu loop bound to an input and output stream.
pub struct Menu<'svc, R, I, W>
where
    R: RecordRepository,
{
    service: &'svc RecordService<R>,
    input: I,
    output: W,
}

impl<'svc, R, I, W> Menu<'svc, R, I, W>
where
    R: RecordRepository,
    I: BufRead,
    W: Write,
{
    pub fn new(service: &'svc RecordService<R>, input: I, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs until the user exits or input ends.
    ///
    /// # Errors
    /// - Returns only terminal I/O failures; service errors are printed.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.show_menu()?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(());
            };

            let keep_going = match choice.as_str() {
                "1" => self.create_record()?,
                "2" => self.read_record()?,
                "3" => self.update_record()?,
                "4" => self.delete_record()?,
                "5" => self.search_records()?,
                "6" => {
                    writeln!(self.output, "BYE BYE")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    true
                }
            };

            if !keep_going {
                return Ok(());
            }
        }
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "Choose any one operation")?;
        writeln!(self.output, "1 - Create a Record")?;
        writeln!(self.output, "2 - Read a Record")?;
        writeln!(self.output, "3 - Update a Record")?;
        writeln!(self.output, "4 - Delete a Record")?;
        writeln!(self.output, "5 - Multiple Column Search")?;
        writeln!(self.output, "6 - Exit")
    }

    // Each action returns `Ok(false)` when input ended mid-dialog.

    fn create_record(&mut self) -> io::Result<bool> {
        writeln!(self.output, "Enter details to create new record:")?;
        let Some(ref_number) = self.prompt("Enter reference number: ")? else {
            return Ok(false);
        };
        let Some(fields) = self.prompt_fields("Enter")? else {
            return Ok(false);
        };

        let record = match Record::new(
            ref_number,
            fields.disclosure_group,
            fields.title_en,
            fields.title_fr,
            fields.name,
            fields.purpose_en,
        ) {
            Ok(record) => record,
            Err(err) => {
                writeln!(self.output, "Record not created: {err}")?;
                return Ok(true);
            }
        };

        match self.service.add_record(&record) {
            Ok(()) => writeln!(self.output, "Record CREATED Successfully")?,
            Err(err) => self.report_error(&err)?,
        }
        Ok(true)
    }

    fn read_record(&mut self) -> io::Result<bool> {
        writeln!(self.output, "Enter details to read record:")?;
        let Some(ref_number) = self.prompt("Enter reference number: ")? else {
            return Ok(false);
        };

        match self.service.show_record(&ref_number) {
            Ok(Some(record)) => {
                writeln!(self.output, "Record Details:")?;
                self.write_record(&record)?;
            }
            Ok(None) => writeln!(self.output, "Record not found.")?,
            Err(err) => self.report_error(&err)?,
        }
        Ok(true)
    }

    fn update_record(&mut self) -> io::Result<bool> {
        let Some(ref_number) = self.prompt("Enter reference number of the record to update: ")?
        else {
            return Ok(false);
        };
        writeln!(self.output, "Enter new details for the record:")?;
        let Some(update) = self.prompt_fields("Enter new")? else {
            return Ok(false);
        };

        match self.service.edit_record(&ref_number, &update) {
            Ok(WriteOutcome::Applied) => writeln!(self.output, "Record UPDATED Successfully")?,
            Ok(WriteOutcome::NoMatch) => writeln!(
                self.output,
                "No record with reference number {ref_number}; nothing was updated."
            )?,
            Err(err) => self.report_error(&err)?,
        }
        Ok(true)
    }

    fn delete_record(&mut self) -> io::Result<bool> {
        let Some(ref_number) = self.prompt("Enter reference number of the record to delete: ")?
        else {
            return Ok(false);
        };

        match self.service.delete_record(&ref_number) {
            Ok(WriteOutcome::Applied) => writeln!(self.output, "Record DELETED Successfully")?,
            Ok(WriteOutcome::NoMatch) => writeln!(
                self.output,
                "No record with reference number {ref_number}; nothing was deleted."
            )?,
            Err(err) => self.report_error(&err)?,
        }
        Ok(true)
    }

    fn search_records(&mut self) -> io::Result<bool> {
        writeln!(self.output, "Enter search criteria for multiple columns.")?;
        let mut pairs = Vec::new();
        let mut input_open = true;

        loop {
            let Some(column) = self.prompt("Enter column name (or type 'done' to finish): ")?
            else {
                input_open = false;
                break;
            };
            if column.eq_ignore_ascii_case(SEARCH_SENTINEL) {
                break;
            }
            let Some(term) = self.prompt_text(&format!("Enter search term for {column}: "))? else {
                input_open = false;
                break;
            };
            pairs.push((column, term));
        }

        match self.service.search(pairs) {
            Ok(SearchOutcome::Found(records)) => {
                writeln!(self.output, "List of Records:")?;
                for record in &records {
                    self.write_record(record)?;
                    writeln!(self.output, "{}", "-".repeat(RECORD_SEPARATOR_WIDTH))?;
                }
            }
            Ok(SearchOutcome::NoMatches) => writeln!(self.output, "No records found.")?,
            Err(ServiceError::InvalidSearchField(column)) => {
                let valid = SearchField::ALL
                    .iter()
                    .map(|field| field.column())
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(
                    self.output,
                    "Invalid search field: {column}. Valid fields: {valid}"
                )?;
            }
            Err(err) => self.report_error(&err)?,
        }
        Ok(input_open)
    }

    fn prompt_fields(&mut self, verb: &str) -> io::Result<Option<RecordUpdate>> {
        let mut values = Vec::with_capacity(5);
        for label in [
            "disclosure group",
            "title (English)",
            "title (French)",
            "name",
            "purpose (English)",
        ] {
            let Some(value) = self.prompt_text(&format!("{verb} {label}: "))? else {
                return Ok(None);
            };
            values.push(value);
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        Ok(Some(RecordUpdate {
            disclosure_group: next(),
            title_en: next(),
            title_fr: next(),
            name: next(),
            purpose_en: next(),
        }))
    }

    fn write_record(&mut self, record: &Record) -> io::Result<()> {
        writeln!(self.output, "Reference Number: {}", record.ref_number)?;
        writeln!(self.output, "Disclosure Group: {}", record.disclosure_group)?;
        writeln!(self.output, "Title (English): {}", record.title_en)?;
        writeln!(self.output, "Title (French): {}", record.title_fr)?;
        writeln!(self.output, "Name: {}", record.name)?;
        writeln!(self.output, "Purpose (English): {}", record.purpose_en)
    }

    fn report_error(&mut self, err: &ServiceError) -> io::Result<()> {
        match err {
            ServiceError::MissingInput(_) | ServiceError::EmptyCriteria => {
                writeln!(self.output, "{err}")
            }
            _ => {
                error!("event=menu_action module=cli status=error error={err}");
                writeln!(self.output, "Error: {err}")
            }
        }
    }

    /// Reads a choice, key or column name with surrounding whitespace removed.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        Ok(self
            .prompt_text(label)?
            .map(|line| line.trim().to_string()))
    }

    /// Prints `label`, then reads one line verbatim minus its terminator;
    /// `None` at end of input.
    fn prompt_text(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Menu;
    use std::io::Cursor;
    use travelq_core::{open_db_in_memory, RecordService, SqliteRecordRepository};

    fn run_session(script: &str) -> String {
        let conn = open_db_in_memory().unwrap();
        let service = RecordService::new(SqliteRecordRepository::new(&conn));
        let mut output = Vec::new();

        Menu::new(&service, Cursor::new(script.as_bytes()), &mut output)
            .run()
            .unwrap();

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn create_then_read_renders_all_fields() {
        let output = run_session("1\nA1\nTravel\nTEN\nTFR\nJane Smith\nConference\n2\nA1\n6\n");

        assert!(output.contains("Record CREATED Successfully"));
        assert!(output.contains("Record Details:"));
        assert!(output.contains("Reference Number: A1"));
        assert!(output.contains("Disclosure Group: Travel"));
        assert!(output.contains("Name: Jane Smith"));
        assert!(output.contains("Purpose (English): Conference"));
        assert!(output.trim_end().ends_with("BYE BYE"));
    }

    #[test]
    fn field_values_keep_surrounding_whitespace() {
        let conn = open_db_in_memory().unwrap();
        let service = RecordService::new(SqliteRecordRepository::new(&conn));
        let mut output = Vec::new();
        let script = concat!(
            "1\n  A1 \n  Travel \nT\nT\n Jane \nP\n",
            "3\nA1\n G2\nT\nT\n Jane  \nP \r\n",
            "5\n name \nJane  \r\ndone\n",
            "6\n",
        );

        Menu::new(&service, Cursor::new(script.as_bytes()), &mut output)
            .run()
            .unwrap();

        let stored = service.show_record("A1").unwrap().unwrap();
        assert_eq!(stored.ref_number, "A1");
        assert_eq!(stored.disclosure_group, " G2");
        assert_eq!(stored.name, " Jane  ");
        assert_eq!(stored.purpose_en, "P ");

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Record CREATED Successfully"));
        assert!(output.contains("Record UPDATED Successfully"));
        assert!(output.contains("Reference Number: A1"));
    }

    #[test]
    fn create_stores_padded_values_verbatim() {
        let conn = open_db_in_memory().unwrap();
        let service = RecordService::new(SqliteRecordRepository::new(&conn));
        let mut output = Vec::new();

        Menu::new(
            &service,
            Cursor::new("1\nA1\n  Travel \nT\nT\n Jane \nP\n6\n".as_bytes()),
            &mut output,
        )
        .run()
        .unwrap();

        let stored = service.show_record("A1").unwrap().unwrap();
        assert_eq!(stored.disclosure_group, "  Travel ");
        assert_eq!(stored.name, " Jane ");
    }

    #[test]
    fn read_missing_record_reports_not_found() {
        let output = run_session("2\nnope\n6\n");
        assert!(output.contains("Record not found."));
    }

    #[test]
    fn duplicate_create_is_reported_and_menu_continues() {
        let output = run_session("1\nA1\nG\nT\nT\nN\nP\n1\nA1\nG2\nT\nT\nN\nP\n6\n");

        assert!(output.contains("Error: record already exists: A1"));
        assert!(output.contains("BYE BYE"));
    }

    #[test]
    fn blank_reference_number_is_not_created() {
        let output = run_session("1\n   \nG\nT\nT\nN\nP\n6\n");
        assert!(output.contains("Record not created: ref_number cannot be empty"));
    }

    #[test]
    fn update_and_delete_of_missing_key_report_no_effect() {
        let output = run_session("3\nghost\nG\nT\nT\nN\nP\n4\nghost\n6\n");

        assert!(output.contains("No record with reference number ghost; nothing was updated."));
        assert!(output.contains("No record with reference number ghost; nothing was deleted."));
    }

    #[test]
    fn update_then_delete_existing_record() {
        let output = run_session(
            "1\nA1\nG\nT\nT\nN\nP\n3\nA1\nG2\nT2\nT2\nN2\nP2\n2\nA1\n4\nA1\n2\nA1\n6\n",
        );

        assert!(output.contains("Record UPDATED Successfully"));
        assert!(output.contains("Name: N2"));
        assert!(output.contains("Record DELETED Successfully"));
        assert!(output.contains("Record not found."));
    }

    #[test]
    fn search_lists_matches_and_handles_empty_and_invalid_criteria() {
        let output = run_session(concat!(
            "1\nA1\nTravel\nT\nT\nJohn Smith\nP\n",
            "1\nA2\nHospitality\nT\nT\nAnna Smith\nP\n",
            "5\nname\nSmith\nDisclosure_Group\nTravel\nDONE\n",
            "5\ndone\n",
            "5\namount\n10\ndone\n",
            "5\nname\nNobody\ndone\n",
            "6\n",
        ));

        assert!(output.contains("List of Records:"));
        assert!(output.contains("Reference Number: A1"));
        assert!(!output.contains("Reference Number: A2"));
        assert!(output.contains("No search criteria provided."));
        assert!(output.contains("Invalid search field: amount. Valid fields: ref_number,"));
        assert!(output.contains("No records found."));
    }

    #[test]
    fn unknown_choice_and_end_of_input_return_cleanly() {
        let output = run_session("9\n");

        assert!(output.contains("Invalid choice. Please try again."));
        assert!(!output.contains("BYE BYE"));
    }
}
