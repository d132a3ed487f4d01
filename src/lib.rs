//! Trial Match - rule-based clinical-trial eligibility matching
//!
//! This library matches patient records against the free-text eligibility
//! criteria of registry trial listings. Age and sex gate each trial, then the
//! patient's active conditions are checked against the inclusion and
//! exclusion lists, and every passing check is recorded as a reason.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use self::core::{assemble_output, evaluate, match_all, parse_age_eligibility, parse_sex_eligibility, Matcher};
pub use models::{EligibilityVerdict, Gender, MatchRecord, Patient, PatientMatchOutput, Trial};
