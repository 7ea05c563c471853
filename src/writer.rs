//! CSV output for detail and listing records.

use crate::config::HeaderMode;
use crate::error::{Error, Result};
use crate::types::DetailRecord;
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Write `records` as CSV to `path`, creating parent directories as needed
///
/// The header is derived from the records according to `mode`. Rows follow the
/// order of `records`. Nothing is created on disk when `records` is empty.
///
/// # Errors
/// - `Error::EmptyRecordSet` if there is nothing to write
/// - `Error::Io` / `Error::Csv` if the file cannot be created or written
pub fn write_records(
    records: &[DetailRecord],
    path: impl AsRef<Path>,
    mode: HeaderMode,
) -> Result<()> {
    let path = path.as_ref();
    if records.is_empty() {
        return Err(Error::EmptyRecordSet {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path).map_err(|e| {
        Error::Io(io::Error::new(
            e.kind(),
            format!("Failed to create CSV file '{}': {}", path.display(), e),
        ))
    })?;
    let columns = write_to(file, records, mode)?;

    info!(
        path = %path.display(),
        rows = records.len(),
        columns,
        "CSV written"
    );
    Ok(())
}

/// Write `records` as CSV into any sink; returns the number of header columns
///
/// `csv::Writer` buffers internally. It is flushed explicitly on success and
/// flushed again when dropped on an early error return.
pub(crate) fn write_to<W: io::Write>(
    sink: W,
    records: &[DetailRecord],
    mode: HeaderMode,
) -> Result<usize> {
    if records.is_empty() {
        return Err(Error::Other("no records to write".to_string()));
    }

    let header = derive_header(records, mode);
    if mode == HeaderMode::FirstRecord {
        let divergent = records
            .iter()
            .filter(|record| record.keys().any(|key| !header.contains(key)))
            .count();
        if divergent > 0 {
            warn!(
                records = divergent,
                "records carry keys missing from the first record's header; extra fields dropped"
            );
        }
    }

    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(&header)?;
    for record in records {
        writer.write_record(header.iter().map(|key| stringify_value(record.get(key))))?;
    }
    writer.flush()?;

    Ok(header.len())
}

/// Column names for `records` under `mode`
pub fn derive_header(records: &[DetailRecord], mode: HeaderMode) -> Vec<String> {
    match mode {
        HeaderMode::FirstRecord => records
            .first()
            .map(|record| record.keys().cloned().collect())
            .unwrap_or_default(),
        HeaderMode::Union => {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut header = Vec::new();
            for key in records.iter().flat_map(|record| record.keys()) {
                if seen.insert(key.as_str()) {
                    header.push(key.clone());
                }
            }
            header
        }
    }
}

/// Render one cell
///
/// Strings pass through, numbers and booleans use their JSON text, null and
/// absent fields become empty cells, arrays and objects become compact JSON.
pub fn stringify_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(nested @ (Value::Array(_) | Value::Object(_))) => nested.to_string(),
    }
}
