use serde::{Deserialize, Serialize};

/// Persisted match document entry, one per patient with at least one trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientMatchOutput {
    #[serde(rename = "patientId")]
    pub patient_id: String,
    #[serde(rename = "eligibleTrials")]
    pub eligible_trials: Vec<TrialMatchOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialMatchOutput {
    #[serde(rename = "trialId")]
    pub trial_id: String,
    #[serde(rename = "trialName")]
    pub trial_name: String,
    #[serde(rename = "eligibilityCriteriaMet")]
    pub eligibility_criteria_met: Vec<String>,
}
