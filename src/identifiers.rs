//! Vacancy identifiers from the listing CSV.
//!
//! The listing file has a header row naming its columns; the identifier column
//! is located by name. Quoted fields are supported, and rows too short to
//! contain the identifier column are skipped with a warning. Blank lines never
//! produce an identifier; they are skipped and logged.

use crate::error::{Error, Result};
use crate::types::Identifier;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Position of `column` in `header`, if present
///
/// Names must match exactly (case and surrounding whitespace included).
pub fn column_index<I, S>(header: I, column: &str) -> Option<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    header.into_iter().position(|name| name.as_ref() == column)
}

/// Read identifiers from the listing file at `path`, in file order
///
/// # Errors
/// - `Error::Io` if the file cannot be opened
/// - `Error::ColumnNotFound` if the header has no `column`
/// - `Error::Csv` on an I/O failure while reading records
pub fn load_identifiers(path: impl AsRef<Path>, column: &str) -> Result<Vec<Identifier>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        Error::Io(io::Error::new(
            e.kind(),
            format!("Failed to open listing file '{}': {}", path.display(), e),
        ))
    })?;

    let identifiers = read_identifiers(file, column)?;
    info!(path = %path.display(), count = identifiers.len(), "identifiers loaded");
    Ok(identifiers)
}

/// Read identifiers from any CSV source; see [`load_identifiers`]
pub fn read_identifiers<R: io::Read>(source: R, column: &str) -> Result<Vec<Identifier>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let header = reader.headers()?.clone();
    debug!(header = ?header, "listing header");

    let index = column_index(&header, column).ok_or_else(|| Error::ColumnNotFound {
        column: column.to_string(),
    })?;

    let mut identifiers = Vec::new();
    let mut record = csv::StringRecord::new();
    // Line where the next record starts if no blank lines intervene
    let mut expected_line = reader.position().line();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(line = expected_line, error = %e, "unreadable listing record, skipping");
                expected_line = reader.position().line();
                continue;
            }
        }

        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or(expected_line);
        if line > expected_line {
            warn!(
                line,
                blank_lines = line - expected_line,
                "blank listing lines skipped"
            );
        }
        expected_line = reader.position().line();

        match record.get(index) {
            Some(value) => identifiers.push(Identifier::new(value)),
            None => warn!(
                line,
                fields = record.len(),
                column_index = index,
                "column index is out of range for record, skipping"
            ),
        }
    }

    Ok(identifiers)
}

/// Drop the first identifier of the sequence
///
/// The harvester has always discarded the first parsed identifier, treating it
/// as a stray header line; see [`InputConfig::skip_first_identifier`](crate::config::InputConfig).
pub fn skip_first(mut identifiers: Vec<Identifier>) -> Vec<Identifier> {
    if !identifiers.is_empty() {
        identifiers.remove(0);
    }
    identifiers
}
