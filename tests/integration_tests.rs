// Integration tests for Trial Match

use std::fs;
use trial_match::core::{assemble_output, match_all, EvaluationOptions, Matcher};
use trial_match::models::PatientMatchOutput;
use trial_match::services::{
    load_patients, load_trials, prepare_patients, write_matches_json, write_patient_table, TableError,
};

const TRIALS_CSV: &str = "trialId,trialTitle,inclusionCriteria,exclusionCriteria,age_criteria,sex_criteria,healthy_volunteers_allowed\n\
NCT001,Insulin study,Diabetes - Hypertension,,18 Years and older,All,No\n\
NCT002,Women's heart study,Hypertension,Pregnancy,18 Years to 65 Years,Female,No\n\
NCT003,Pediatric asthma,Asthma,,5 Years to 17 Years,All,Yes\n\
NCT004,No criteria,,Diabetes,Child,All,No\n";

const PATIENTS_CSV: &str = "Id,GENDER,AGE,CONDITIONS,PREVIOUS_CONDITIONS\n\
p1,F,45,Diabetes,\n\
p2,M,70,Hypertension - Obesity,Sprain\n\
p3,M,10,Asthma,\n\
p4,F,30,,Asthma\n";

#[test]
fn test_integration_end_to_end_matching() {
    let dir = tempfile::tempdir().unwrap();
    let patients_path = dir.path().join("patients.csv");
    let trials_path = dir.path().join("trials.csv");
    let output_path = dir.path().join("out").join("matched_patients.json");
    fs::write(&patients_path, PATIENTS_CSV).unwrap();
    fs::write(&trials_path, TRIALS_CSV).unwrap();

    let patients = load_patients(&patients_path).unwrap();
    let trials = load_trials(&trials_path).unwrap();
    assert_eq!(patients.len(), 3, "patient without active conditions is dropped");
    assert_eq!(trials.len(), 4);

    let output = assemble_output(match_all(&patients, &trials));
    write_matches_json(&output_path, &output).unwrap();

    let written: Vec<PatientMatchOutput> =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written, output);

    let ids: Vec<&str> = written.iter().map(|r| r.patient_id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);

    // p1: adult female with diabetes
    let p1_trials: Vec<&str> = written[0].eligible_trials.iter().map(|t| t.trial_id.as_str()).collect();
    assert_eq!(p1_trials, vec!["NCT001", "NCT002"]);
    assert_eq!(
        written[0].eligible_trials[0].eligibility_criteria_met,
        vec![
            "age criteria met",
            "gender criteria met",
            "inclusion criteria met",
            "no exclusion criteria matched"
        ]
    );
    // NCT002 matched on exclusion alone
    assert_eq!(
        written[0].eligible_trials[1].eligibility_criteria_met,
        vec!["age criteria met", "gender criteria met", "no exclusion criteria matched"]
    );

    // p2: too old for NCT002, wrong sex anyway
    let p2_trials: Vec<&str> = written[1].eligible_trials.iter().map(|t| t.trial_id.as_str()).collect();
    assert_eq!(p2_trials, vec!["NCT001"]);

    // p3: child, only the pediatric range fits
    let p3_trials: Vec<&str> = written[2].eligible_trials.iter().map(|t| t.trial_id.as_str()).collect();
    assert_eq!(p3_trials, vec!["NCT003"]);
    assert_eq!(written[2].eligible_trials[0].trial_name, "Pediatric asthma");
}

#[test]
fn test_integration_without_demographic_reasons() {
    let dir = tempfile::tempdir().unwrap();
    let patients_path = dir.path().join("patients.csv");
    let trials_path = dir.path().join("trials.csv");
    fs::write(&patients_path, PATIENTS_CSV).unwrap();
    fs::write(&trials_path, TRIALS_CSV).unwrap();

    let matcher = Matcher::new(EvaluationOptions {
        report_demographic_reasons: false,
    });
    let result = matcher.find_matches(
        &load_patients(&patients_path).unwrap(),
        &load_trials(&trials_path).unwrap(),
    );

    assert_eq!(result.total_patients, 3);
    assert_eq!(result.total_trials, 4);
    assert_eq!(result.eligible_pairs, 4);
    assert_eq!(
        result.records[0].eligible_trials[0].criteria_met,
        vec!["inclusion criteria met", "no exclusion criteria matched"]
    );
}

#[test]
fn test_integration_prepare_then_match() {
    let dir = tempfile::tempdir().unwrap();
    let raw_dir = dir.path().join("raw");
    fs::create_dir_all(&raw_dir).unwrap();
    fs::write(
        raw_dir.join("patients.csv"),
        "Id,BIRTHDATE,DEATHDATE,PREFIX,FIRST,LAST,GENDER\n\
         a,1980-03-04,,Mrs.,Ann,Lee,F\n\
         b,1960-01-01,2019-05-05,Mr.,Bob,Ray,M\n",
    )
    .unwrap();
    fs::write(
        raw_dir.join("conditions.csv"),
        "START,STOP,PATIENT,ENCOUNTER,CODE,DESCRIPTION\n\
         2015-01-01,,a,e1,44054006,Diabetes\n\
         2001-01-01,2002-01-01,a,e2,10509002,Acute bronchitis\n\
         2010-01-01,,b,e3,44054006,Diabetes\n",
    )
    .unwrap();
    fs::write(dir.path().join("trials.csv"), TRIALS_CSV).unwrap();

    let rows = prepare_patients(&raw_dir, 2025).unwrap();
    let processed = dir.path().join("patient_processed.csv");
    write_patient_table(&processed, &rows).unwrap();

    let patients = load_patients(&processed).unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].age, 45);
    assert!(patients[0].previous_conditions.contains("Acute bronchitis"));

    let records = match_all(&patients, &load_trials(dir.path().join("trials.csv")).unwrap());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].eligible_trials[0].trial_id, "NCT001");
}

#[test]
fn test_integration_missing_column_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let trials_path = dir.path().join("trials.csv");
    fs::write(&trials_path, "trialId,trialTitle,age_criteria\nNCT1,Study,18\n").unwrap();

    let err = load_trials(&trials_path).unwrap_err();
    assert!(matches!(err, TableError::MissingColumn { .. }));
    assert!(err.to_string().contains("inclusionCriteria"));
}
