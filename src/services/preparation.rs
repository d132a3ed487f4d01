//! Derive the processed patient table from raw EHR exports.
//!
//! The raw directory holds a `patients.csv` (demographics) and a
//! `conditions.csv` (one row per diagnosis, with an optional `STOP` date).
//! Living patients get an age from their birth year and two condition
//! strings: those still active and those already resolved.

use crate::core::filters::CONDITION_DELIMITER;
use crate::models::{PatientRow, RawConditionRow, RawPatientRow};
use crate::services::tables::{open_table, TableError};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

pub const PATIENTS_FILE: &str = "patients.csv";
pub const CONDITIONS_FILE: &str = "conditions.csv";

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default)]
struct ConditionHistory {
    active: Vec<String>,
    previous: Vec<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Age in whole years from the birth year alone
pub fn age_from_birth_date(birth_date: &str, current_year: i32) -> Option<u32> {
    let born = NaiveDate::parse_from_str(birth_date.trim(), BIRTH_DATE_FORMAT).ok()?;
    u32::try_from(current_year - born.year()).ok()
}

/// Build processed patient rows from the raw export directory
///
/// Deceased patients and patients without an active condition are dropped.
/// Output follows the order of `patients.csv`; condition strings follow the
/// order of `conditions.csv`.
pub fn prepare_patients<P: AsRef<Path>>(
    raw_dir: P,
    current_year: i32,
) -> Result<Vec<PatientRow>, TableError> {
    let raw_dir = raw_dir.as_ref();
    let histories = load_condition_histories(&raw_dir.join(CONDITIONS_FILE))?;

    let patients_path = raw_dir.join(PATIENTS_FILE);
    let mut reader = open_table(&patients_path, "raw patient", RawPatientRow::REQUIRED_COLUMNS)?;

    let mut rows = Vec::new();
    let mut deceased = 0usize;
    let mut without_conditions = 0usize;

    for (index, raw) in reader.deserialize::<RawPatientRow>().enumerate() {
        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping unreadable raw patient row {}: {}", index + 1, e);
                continue;
            }
        };

        if !is_blank(&raw.death_date) {
            deceased += 1;
            continue;
        }

        let (conditions, previous_conditions) = match histories.get(&raw.id) {
            Some(history) if !history.active.is_empty() => (
                history.active.join(CONDITION_DELIMITER),
                history.previous.join(CONDITION_DELIMITER),
            ),
            _ => {
                without_conditions += 1;
                continue;
            }
        };

        let age = raw
            .birth_date
            .as_deref()
            .and_then(|birth| age_from_birth_date(birth, current_year));
        if age.is_none() {
            warn!("Patient {} has an unusable birth date {:?}", raw.id, raw.birth_date);
        }

        rows.push(PatientRow {
            id: raw.id,
            prefix: raw.prefix,
            first: raw.first,
            last: raw.last,
            gender: raw.gender,
            age: age.map(|a| a.to_string()),
            conditions: Some(conditions),
            previous_conditions: Some(previous_conditions).filter(|p| !p.is_empty()),
        });
    }

    info!(
        "Prepared {} patients from {} ({} deceased, {} without active conditions)",
        rows.len(),
        raw_dir.display(),
        deceased,
        without_conditions
    );
    Ok(rows)
}

fn load_condition_histories(path: &Path) -> Result<HashMap<String, ConditionHistory>, TableError> {
    let mut reader = open_table(path, "raw condition", RawConditionRow::REQUIRED_COLUMNS)?;
    let mut histories: HashMap<String, ConditionHistory> = HashMap::new();

    for (index, row) in reader.deserialize::<RawConditionRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping unreadable condition row {}: {}", index + 1, e);
                continue;
            }
        };

        let Some(description) = row.description.filter(|d| !d.trim().is_empty()) else {
            continue;
        };

        let history = histories.entry(row.patient).or_default();
        if is_blank(&row.stop) {
            history.active.push(description);
        } else {
            history.previous.push(description);
        }
    }

    Ok(histories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_raw_dir(patients: &str, conditions: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PATIENTS_FILE), patients).unwrap();
        fs::write(dir.path().join(CONDITIONS_FILE), conditions).unwrap();
        dir
    }

    #[test]
    fn test_age_uses_year_only() {
        assert_eq!(age_from_birth_date("1980-12-31", 2025), Some(45));
        assert_eq!(age_from_birth_date("1980-01-01", 2025), Some(45));
        assert_eq!(age_from_birth_date("31/12/1980", 2025), None);
        assert_eq!(age_from_birth_date("2030-01-01", 2025), None);
    }

    #[test]
    fn test_prepare_patients() {
        let dir = write_raw_dir(
            "Id,BIRTHDATE,DEATHDATE,PREFIX,FIRST,LAST,GENDER\n\
             a,1980-05-01,,Mrs.,Ann,Lee,F\n\
             b,1950-02-02,2020-01-01,Mr.,Bob,Ray,M\n\
             c,1990-07-07,,Mr.,Cal,Fox,M\n\
             d,2000-01-01,,Ms.,Dee,Kim,F\n",
            "START,STOP,PATIENT,ENCOUNTER,CODE,DESCRIPTION\n\
             2010-01-01,,a,e1,1,Diabetes\n\
             2011-01-01,2012-01-01,a,e2,2,Acute bronchitis\n\
             2013-01-01,,a,e3,3,Hypertension\n\
             2010-01-01,,b,e4,1,Diabetes\n\
             2015-01-01,2016-01-01,c,e5,2,Sprain\n\
             2018-01-01,,d,e6,4,Obesity\n",
        );

        let rows = prepare_patients(dir.path(), 2025).unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
        assert_eq!(rows[0].age.as_deref(), Some("45"));
        assert_eq!(rows[0].conditions.as_deref(), Some("Diabetes - Hypertension"));
        assert_eq!(rows[0].previous_conditions.as_deref(), Some("Acute bronchitis"));
        assert_eq!(rows[1].previous_conditions, None);
        assert_eq!(rows[1].first.as_deref(), Some("Dee"));
    }

    #[test]
    fn test_prepare_requires_conditions_schema() {
        let dir = write_raw_dir(
            "Id,BIRTHDATE,GENDER\na,1980-05-01,F\n",
            "PATIENT,DESCRIPTION\na,Diabetes\n",
        );

        assert!(matches!(
            prepare_patients(dir.path(), 2025),
            Err(TableError::MissingColumn { table: "raw condition", .. })
        ));
    }
}
