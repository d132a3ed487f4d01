use crate::models::{PatientMatchOutput, PatientRow};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while persisting results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Write a file completely or not at all
///
/// Content goes to a temporary file beside `path`, which is synced and then
/// renamed over the destination.
pub fn write_atomically<P, F>(path: P, write: F) -> Result<(), OutputError>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<(), OutputError>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path)?;

    Ok(())
}

/// Serialize to pretty JSON with four-space indentation
pub fn to_pretty_json<T: Serialize + ?Sized, W: Write>(writer: W, value: &T) -> Result<(), OutputError> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}

/// Persist the match document
pub fn write_matches_json<P: AsRef<Path>>(path: P, matches: &[PatientMatchOutput]) -> Result<(), OutputError> {
    let path = path.as_ref();
    write_atomically(path, |writer| to_pretty_json(writer, matches))?;

    info!("Wrote {} patient match records to {}", matches.len(), path.display());
    Ok(())
}

/// Persist the processed patient table
pub fn write_patient_table<P: AsRef<Path>>(path: P, rows: &[PatientRow]) -> Result<(), OutputError> {
    let path = path.as_ref();
    write_atomically(path, |writer| {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    })?;

    info!("Wrote {} processed patients to {}", rows.len(), path.display());
    Ok(())
}
