use crate::core::filters::parse_condition_list;
use crate::models::{Gender, Patient, PatientRow, Trial, TrialRow};
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a table load
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },
}

/// Why a single row was left out of the loaded population
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("missing identifier")]
    MissingId,

    #[error("{0}")]
    Gender(#[from] crate::models::UnknownGender),

    #[error("unusable age '{0}'")]
    Age(String),

    #[error("no active conditions")]
    NoActiveConditions,
}

/// Fail when any required column is absent from the header row
pub fn ensure_columns(
    headers: &csv::StringRecord,
    table: &'static str,
    required: &[&str],
) -> Result<(), TableError> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(TableError::MissingColumn {
                table,
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Open a CSV table and check its schema before any row is read
pub(crate) fn open_table(
    path: &Path,
    table: &'static str,
    required: &[&str],
) -> Result<csv::Reader<File>, TableError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    ensure_columns(&headers, table, required)?;

    debug!("Opened {} table {} ({} columns)", table, path.display(), headers.len());
    Ok(reader)
}

/// Parse an age cell, accepting whole-valued decimals such as `45.0`
pub fn parse_age_cell(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    if let Ok(age) = cell.parse::<u32>() {
        return Some(age);
    }

    let value = cell.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}

fn parse_flag(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Convert a processed patient row into a matchable patient
pub fn patient_from_row(row: PatientRow) -> Result<Patient, SkipReason> {
    if row.id.trim().is_empty() {
        return Err(SkipReason::MissingId);
    }

    let gender: Gender = row.gender.as_deref().unwrap_or_default().parse()?;

    let age_cell = row.age.unwrap_or_default();
    let age = parse_age_cell(&age_cell).ok_or(SkipReason::Age(age_cell))?;

    let conditions_cell = row.conditions.as_deref().unwrap_or_default();
    if conditions_cell.trim().is_empty() {
        return Err(SkipReason::NoActiveConditions);
    }
    let conditions = parse_condition_list(conditions_cell);

    Ok(Patient {
        id: row.id,
        gender,
        age,
        conditions,
        previous_conditions: parse_condition_list(row.previous_conditions.as_deref().unwrap_or_default()),
    })
}

/// Convert a scraped trial row; empty cells become empty criteria
pub fn trial_from_row(row: TrialRow) -> Trial {
    Trial {
        trial_id: row.trial_id,
        title: row.trial_title.unwrap_or_default(),
        age_criteria: row.age_criteria.unwrap_or_default(),
        sex_criteria: row.sex_criteria.unwrap_or_default(),
        inclusion_criteria: row.inclusion_criteria.unwrap_or_default(),
        exclusion_criteria: row.exclusion_criteria.unwrap_or_default(),
        healthy_volunteers_allowed: row.healthy_volunteers_allowed.as_deref().and_then(parse_flag),
    }
}

/// Load the processed patient table, keeping file order
///
/// Rows that cannot be matched are skipped and logged; only a broken file or
/// a missing column is an error.
pub fn load_patients<P: AsRef<Path>>(path: P) -> Result<Vec<Patient>, TableError> {
    let path = path.as_ref();
    let mut reader = open_table(path, "patient", PatientRow::REQUIRED_COLUMNS)?;

    let mut patients = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in reader.deserialize::<PatientRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping unreadable patient row {}: {}", index + 1, e);
                skipped += 1;
                continue;
            }
        };

        let id = row.id.clone();
        match patient_from_row(row) {
            Ok(patient) => patients.push(patient),
            Err(SkipReason::NoActiveConditions) => {
                debug!("Skipping patient {}: no active conditions", id);
                skipped += 1;
            }
            Err(reason) => {
                warn!("Skipping patient row {} ({}): {}", index + 1, id, reason);
                skipped += 1;
            }
        }
    }

    info!("Loaded {} patients from {} ({} skipped)", patients.len(), path.display(), skipped);
    Ok(patients)
}

/// Load the scraped trial table, keeping file order
pub fn load_trials<P: AsRef<Path>>(path: P) -> Result<Vec<Trial>, TableError> {
    let path = path.as_ref();
    let mut reader = open_table(path, "trial", TrialRow::REQUIRED_COLUMNS)?;

    let mut trials = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in reader.deserialize::<TrialRow>().enumerate() {
        match row {
            Ok(row) if row.trial_id.trim().is_empty() => {
                warn!("Skipping trial row {}: missing trial id", index + 1);
                skipped += 1;
            }
            Ok(row) => trials.push(trial_from_row(row)),
            Err(e) => {
                warn!("Skipping unreadable trial row {}: {}", index + 1, e);
                skipped += 1;
            }
        }
    }

    info!("Loaded {} trials from {} ({} skipped)", trials.len(), path.display(), skipped);
    Ok(trials)
}
