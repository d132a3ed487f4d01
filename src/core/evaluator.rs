use crate::core::filters::{
    avoids_exclusion, meets_inclusion, parse_age_eligibility, parse_condition_list,
    parse_sex_eligibility,
};
use crate::models::{EligibilityVerdict, Patient, Trial};
use std::collections::BTreeSet;

pub const REASON_AGE_MET: &str = "age criteria met";
pub const REASON_GENDER_MET: &str = "gender criteria met";
pub const REASON_INCLUSION_MET: &str = "inclusion criteria met";
pub const REASON_NO_EXCLUSION_MATCHED: &str = "no exclusion criteria matched";

/// Which optional reasons the evaluator reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Prefix condition reasons with the age and gender confirmations
    pub report_demographic_reasons: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            report_demographic_reasons: true,
        }
    }
}

/// A trial's condition lists, split once so they can be reused for every patient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialCriteria {
    pub inclusion: BTreeSet<String>,
    pub exclusion: BTreeSet<String>,
}

impl TrialCriteria {
    pub fn from_trial(trial: &Trial) -> Self {
        Self {
            inclusion: parse_condition_list(&trial.inclusion_criteria),
            exclusion: parse_condition_list(&trial.exclusion_criteria),
        }
    }
}

/// Evaluate one patient against one trial with default options
pub fn evaluate(patient: &Patient, trial: &Trial) -> EligibilityVerdict {
    evaluate_with(patient, trial, &TrialCriteria::from_trial(trial), EvaluationOptions::default())
}

/// Evaluate one patient against one trial using pre-split criteria
///
/// Age and sex gate the trial; when either fails nothing else is checked and no
/// reasons are recorded. Otherwise the trial is eligible when the inclusion check
/// or the exclusion check passes. An empty inclusion list never passes, and an
/// empty exclusion list always does.
pub fn evaluate_with(
    patient: &Patient,
    trial: &Trial,
    criteria: &TrialCriteria,
    options: EvaluationOptions,
) -> EligibilityVerdict {
    if !parse_age_eligibility(patient.age, &trial.age_criteria)
        || !parse_sex_eligibility(patient.gender, &trial.sex_criteria)
    {
        return EligibilityVerdict::ineligible();
    }

    let mut condition_reasons = Vec::with_capacity(2);
    if meets_inclusion(&patient.conditions, &criteria.inclusion) {
        condition_reasons.push(REASON_INCLUSION_MET.to_string());
    }
    if avoids_exclusion(&patient.conditions, &criteria.exclusion) {
        condition_reasons.push(REASON_NO_EXCLUSION_MATCHED.to_string());
    }

    if condition_reasons.is_empty() {
        return EligibilityVerdict::ineligible();
    }

    let mut reasons = Vec::with_capacity(4);
    if options.report_demographic_reasons {
        reasons.push(REASON_AGE_MET.to_string());
        reasons.push(REASON_GENDER_MET.to_string());
    }
    reasons.extend(condition_reasons);

    EligibilityVerdict {
        is_eligible: true,
        reasons,
    }
}
