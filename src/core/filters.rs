use crate::models::Gender;
use std::collections::BTreeSet;

/// Sentinel the registry uses for trials open to every sex
pub const ALL_SEXES: &str = "All";

/// Delimiter between condition names in criteria and patient columns
pub const CONDITION_DELIMITER: &str = " - ";

/// Code points of the digit zero in each non-ASCII decimal digit block
///
/// Every block is ten contiguous code points, zero through nine.
const DIGIT_ZEROS: &[u32] = &[
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0,
    0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0, 0xA9F0,
    0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x11066, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
];

/// Value of a decimal digit in any script (ASCII, full-width, Arabic-Indic, ...)
pub fn decimal_digit_value(ch: char) -> Option<u64> {
    if let Some(digit) = ch.to_digit(10) {
        return Some(u64::from(digit));
    }

    let code = u32::from(ch);
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&code))
        .map(|&zero| u64::from(code - zero))
}

/// Extract every maximal run of decimal digits as an integer, left to right
///
/// Values saturate at `u64::MAX`, which is still above any patient age.
pub fn extract_integers(text: &str) -> Vec<u64> {
    let mut numbers = Vec::new();
    let mut current: Option<u64> = None;

    for ch in text.chars() {
        match (decimal_digit_value(ch), current) {
            (Some(digit), value) => {
                current = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            }
            (None, Some(value)) => {
                numbers.push(value);
                current = None;
            }
            (None, None) => {}
        }
    }
    numbers.extend(current);

    numbers
}

/// Check whether a patient's age satisfies a free-text age criterion
///
/// - no numbers: not eligible
/// - one number `x`: eligible iff `age >= x`
/// - two numbers `x, y`: eligible iff `x <= age <= y` (reversed bounds are not corrected)
/// - more than two: not eligible
#[inline]
pub fn parse_age_eligibility(patient_age: u32, age_criteria: &str) -> bool {
    let age = u64::from(patient_age);

    match extract_integers(age_criteria).as_slice() {
        [min] => age >= *min,
        [min, max] => *min <= age && age <= *max,
        _ => false,
    }
}

/// Check whether a patient's sex satisfies a trial's sex criterion
///
/// The literal word is matched case-sensitively, so `"Female"` does not admit males.
#[inline]
pub fn parse_sex_eligibility(patient_gender: Gender, sex_criteria: &str) -> bool {
    if sex_criteria == ALL_SEXES {
        return true;
    }

    sex_criteria.contains(patient_gender.as_word())
}

/// Split a dash-delimited condition list into a set of names
///
/// No trimming or case folding is applied.
pub fn parse_condition_list(criteria: &str) -> BTreeSet<String> {
    if criteria.is_empty() {
        return BTreeSet::new();
    }

    criteria
        .split(CONDITION_DELIMITER)
        .map(str::to_string)
        .collect()
}

/// Inclusion passes when the two sets share at least one condition
#[inline]
pub fn meets_inclusion(patient_conditions: &BTreeSet<String>, inclusion: &BTreeSet<String>) -> bool {
    !patient_conditions.is_disjoint(inclusion)
}

/// Exclusion passes when the two sets share nothing
#[inline]
pub fn avoids_exclusion(patient_conditions: &BTreeSet<String>, exclusion: &BTreeSet<String>) -> bool {
    patient_conditions.is_disjoint(exclusion)
}
