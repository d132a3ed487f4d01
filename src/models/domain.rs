use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Patient sex as recorded in the source system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Full word used when testing a trial's sex criteria
    pub fn as_word(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_word())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGender(pub String);

impl fmt::Display for UnknownGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised gender code '{}'", self.0)
    }
}

impl std::error::Error for UnknownGender {}

impl FromStr for Gender {
    type Err = UnknownGender;

    /// Accepts `M`/`F`/`Male`/`Female` in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            _ => Err(UnknownGender(s.to_string())),
        }
    }
}

/// A patient snapshot ready for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: String,
    pub gender: Gender,
    /// Whole years, derived from the birth year only
    pub age: u32,
    /// Conditions still active at export time
    pub conditions: BTreeSet<String>,
    /// Resolved conditions, kept for reference and never matched against
    pub previous_conditions: BTreeSet<String>,
}

impl Patient {
    /// A patient with no active conditions is never matched
    pub fn is_matchable(&self) -> bool {
        !self.conditions.is_empty()
    }
}

/// A registry trial listing with its free-text criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    pub trial_id: String,
    pub title: String,
    pub age_criteria: String,
    pub sex_criteria: String,
    /// Conditions separated by `" - "`
    pub inclusion_criteria: String,
    /// Conditions separated by `" - "`
    pub exclusion_criteria: String,
    pub healthy_volunteers_allowed: Option<bool>,
}

/// Outcome of evaluating one patient against one trial
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibilityVerdict {
    pub is_eligible: bool,
    pub reasons: Vec<String>,
}

impl EligibilityVerdict {
    pub fn ineligible() -> Self {
        Self::default()
    }
}

/// One trial a patient qualified for, with the checks that passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleTrial {
    pub trial_id: String,
    pub trial_title: String,
    pub criteria_met: Vec<String>,
}

/// All trials a single patient qualified for, in trial input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub patient_id: String,
    pub eligible_trials: Vec<EligibleTrial>,
}
