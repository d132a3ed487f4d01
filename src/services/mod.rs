// Service exports
pub mod output;
pub mod preparation;
pub mod tables;

pub use output::{write_matches_json, write_patient_table, OutputError};
pub use preparation::prepare_patients;
pub use tables::{load_patients, load_trials, SkipReason, TableError};
