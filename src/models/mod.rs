// Model exports
pub mod domain;
pub mod responses;
pub mod rows;

pub use domain::{EligibilityVerdict, EligibleTrial, Gender, MatchRecord, Patient, Trial, UnknownGender};
pub use responses::{PatientMatchOutput, TrialMatchOutput};
pub use rows::{PatientRow, RawConditionRow, RawPatientRow, TrialRow};
