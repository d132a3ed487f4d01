use crate::core::evaluator::{evaluate_with, EvaluationOptions, TrialCriteria};
use crate::models::{EligibleTrial, MatchRecord, Patient, Trial};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub records: Vec<MatchRecord>,
    pub total_patients: usize,
    pub total_trials: usize,
    pub eligible_pairs: usize,
}

/// Main matching orchestrator
///
/// Every patient is evaluated against every trial. Output keeps the patient
/// input order, and each patient's trials keep the trial input order. Patients
/// with no eligible trial are left out.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    options: EvaluationOptions,
}

impl Matcher {
    pub fn new(options: EvaluationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> EvaluationOptions {
        self.options
    }

    /// Match every patient against every trial
    ///
    /// # Arguments
    /// * `patients` - Patient snapshots, in output order
    /// * `trials` - Trial listings, in per-patient output order
    pub fn find_matches(&self, patients: &[Patient], trials: &[Trial]) -> MatchResult {
        // Split condition lists once per trial rather than once per pair
        let compiled: Vec<(&Trial, TrialCriteria)> = trials
            .iter()
            .map(|trial| (trial, TrialCriteria::from_trial(trial)))
            .collect();

        let records: Vec<MatchRecord> = patients
            .iter()
            .filter(|patient| patient.is_matchable())
            .filter_map(|patient| {
                let eligible_trials: Vec<EligibleTrial> = compiled
                    .iter()
                    .filter_map(|(trial, criteria)| {
                        let verdict = evaluate_with(patient, trial, criteria, self.options);
                        tracing::trace!(
                            patient_id = %patient.id,
                            trial_id = %trial.trial_id,
                            eligible = verdict.is_eligible,
                            "evaluated pair"
                        );

                        verdict.is_eligible.then(|| EligibleTrial {
                            trial_id: trial.trial_id.clone(),
                            trial_title: trial.title.clone(),
                            criteria_met: verdict.reasons,
                        })
                    })
                    .collect();

                if eligible_trials.is_empty() {
                    None
                } else {
                    Some(MatchRecord {
                        patient_id: patient.id.clone(),
                        eligible_trials,
                    })
                }
            })
            .collect();

        let eligible_pairs = records.iter().map(|r| r.eligible_trials.len()).sum();

        MatchResult {
            records,
            total_patients: patients.len(),
            total_trials: trials.len(),
            eligible_pairs,
        }
    }
}

/// Match with default evaluation options
pub fn match_all(patients: &[Patient], trials: &[Trial]) -> Vec<MatchRecord> {
    Matcher::default().find_matches(patients, trials).records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use std::collections::BTreeSet;

    fn create_patient(id: &str, age: u32, gender: Gender, conditions: &[&str]) -> Patient {
        Patient {
            id: id.to_string(),
            gender,
            age,
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
            previous_conditions: BTreeSet::new(),
        }
    }

    fn create_trial(id: &str, age: &str, sex: &str, inclusion: &str, exclusion: &str) -> Trial {
        Trial {
            trial_id: id.to_string(),
            title: format!("Trial {}", id),
            age_criteria: age.to_string(),
            sex_criteria: sex.to_string(),
            inclusion_criteria: inclusion.to_string(),
            exclusion_criteria: exclusion.to_string(),
            healthy_volunteers_allowed: None,
        }
    }

    #[test]
    fn test_find_matches_basic() {
        let patients = vec![
            create_patient("1", 45, Gender::Female, &["Diabetes"]),
            create_patient("2", 10, Gender::Female, &["Diabetes"]), // Too young
            create_patient("3", 45, Gender::Male, &["Diabetes"]),   // Wrong sex
        ];
        let trials = vec![create_trial("T1", "18 Years and older", "Female", "Diabetes", "")];

        let result = Matcher::default().find_matches(&patients, &trials);

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].patient_id, "1");
        assert_eq!(result.total_patients, 3);
        assert_eq!(result.total_trials, 1);
        assert_eq!(result.eligible_pairs, 1);
    }

    #[test]
    fn test_preserves_input_order() {
        let patients = vec![
            create_patient("z", 30, Gender::Male, &["Asthma"]),
            create_patient("a", 30, Gender::Male, &["Asthma"]),
        ];
        let trials = vec![
            create_trial("T9", "18", "All", "Asthma", ""),
            create_trial("T1", "18", "All", "", ""),
        ];

        let records = match_all(&patients, &trials);

        let patient_ids: Vec<&str> = records.iter().map(|r| r.patient_id.as_str()).collect();
        assert_eq!(patient_ids, vec!["z", "a"]);
        let trial_ids: Vec<&str> = records[0].eligible_trials.iter().map(|t| t.trial_id.as_str()).collect();
        assert_eq!(trial_ids, vec!["T9", "T1"]);
    }

    #[test]
    fn test_patients_without_conditions_skipped() {
        let patients = vec![create_patient("1", 30, Gender::Male, &[])];
        let trials = vec![create_trial("T1", "18", "All", "", "")];

        assert!(match_all(&patients, &trials).is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(match_all(&[], &[]).is_empty());
        let patients = vec![create_patient("1", 30, Gender::Male, &["Asthma"])];
        assert!(match_all(&patients, &[]).is_empty());
    }
}
