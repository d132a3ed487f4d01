use serde::{Deserialize, Serialize};

/// Processed patient table row
///
/// This is both what `prepare` writes and what `match` reads. Name columns
/// are optional so tables produced elsewhere only need the matching columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRow {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "PREFIX", default)]
    pub prefix: Option<String>,
    #[serde(rename = "FIRST", default)]
    pub first: Option<String>,
    #[serde(rename = "LAST", default)]
    pub last: Option<String>,
    #[serde(rename = "GENDER")]
    pub gender: Option<String>,
    /// Kept as text: dataframe exports write whole numbers as `45.0`
    #[serde(rename = "AGE")]
    pub age: Option<String>,
    #[serde(rename = "CONDITIONS")]
    pub conditions: Option<String>,
    #[serde(rename = "PREVIOUS_CONDITIONS")]
    pub previous_conditions: Option<String>,
}

impl PatientRow {
    pub const REQUIRED_COLUMNS: &'static [&'static str] =
        &["Id", "GENDER", "AGE", "CONDITIONS", "PREVIOUS_CONDITIONS"];
}

/// Scraped trial table row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialRow {
    #[serde(rename = "trialId")]
    pub trial_id: String,
    #[serde(rename = "trialTitle")]
    pub trial_title: Option<String>,
    #[serde(rename = "inclusionCriteria")]
    pub inclusion_criteria: Option<String>,
    #[serde(rename = "exclusionCriteria")]
    pub exclusion_criteria: Option<String>,
    pub age_criteria: Option<String>,
    pub sex_criteria: Option<String>,
    pub healthy_volunteers_allowed: Option<String>,
}

impl TrialRow {
    pub const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "trialId",
        "trialTitle",
        "inclusionCriteria",
        "exclusionCriteria",
        "age_criteria",
        "sex_criteria",
        "healthy_volunteers_allowed",
    ];
}

/// Row of a raw EHR `patients.csv` export
#[derive(Debug, Clone, Deserialize)]
pub struct RawPatientRow {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "BIRTHDATE")]
    pub birth_date: Option<String>,
    #[serde(rename = "DEATHDATE", default)]
    pub death_date: Option<String>,
    #[serde(rename = "PREFIX", default)]
    pub prefix: Option<String>,
    #[serde(rename = "FIRST", default)]
    pub first: Option<String>,
    #[serde(rename = "LAST", default)]
    pub last: Option<String>,
    #[serde(rename = "GENDER")]
    pub gender: Option<String>,
}

impl RawPatientRow {
    pub const REQUIRED_COLUMNS: &'static [&'static str] = &["Id", "BIRTHDATE", "GENDER"];
}

/// Row of a raw EHR `conditions.csv` export
#[derive(Debug, Clone, Deserialize)]
pub struct RawConditionRow {
    #[serde(rename = "PATIENT")]
    pub patient: String,
    #[serde(rename = "STOP")]
    pub stop: Option<String>,
    #[serde(rename = "DESCRIPTION")]
    pub description: Option<String>,
}

impl RawConditionRow {
    pub const REQUIRED_COLUMNS: &'static [&'static str] = &["PATIENT", "STOP", "DESCRIPTION"];
}
