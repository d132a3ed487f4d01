use crate::models::{MatchRecord, PatientMatchOutput, TrialMatchOutput};

/// Shape match records into the persisted document schema
pub fn assemble_output(records: Vec<MatchRecord>) -> Vec<PatientMatchOutput> {
    records
        .into_iter()
        .map(|record| PatientMatchOutput {
            patient_id: record.patient_id,
            eligible_trials: record
                .eligible_trials
                .into_iter()
                .map(|trial| TrialMatchOutput {
                    trial_id: trial.trial_id,
                    trial_name: trial.trial_title,
                    eligibility_criteria_met: trial.criteria_met,
                })
                .collect(),
        })
        .collect()
}
