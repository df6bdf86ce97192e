//! Harmonized covariate derivation
//!
//! Each covariate is derived independently from its own raw field; a country
//! whose source lacks the field gets an all-unknown column, never an abort.
//! Country-specific fields (caste, religion, insurance, ...) are left on the
//! table untouched — the pass-through is implicit because derivation only
//! ever adds columns.

use surveypool_core::Table;

use crate::fields::raw;
use crate::params::DeriveParams;

/// Years of schooling → 4-level ordinal: 0 none, 1 primary, 2 secondary,
/// 3 higher. Negative year counts are coding noise and stay unknown.
pub fn derive_education(table: &Table, params: &DeriveParams) -> Vec<Option<i64>> {
    let years = table.resolve_i64(raw::EDUCATION_YEARS);
    years
        .values
        .iter()
        .map(|v| match v {
            Some(y) if *y == 0 => Some(0),
            Some(y) if (1..params.education_secondary_min).contains(y) => Some(1),
            Some(y) if (params.education_secondary_min..params.education_higher_min).contains(y) => {
                Some(2)
            }
            Some(y) if *y >= params.education_higher_min => Some(3),
            _ => None,
        })
        .collect()
}

/// Residence code → urban flag. Codes other than the two known ones are
/// unknown, not guessed.
pub fn derive_is_urban(table: &Table, params: &DeriveParams) -> Vec<Option<bool>> {
    let residence = table.resolve_i64(raw::RESIDENCE_TYPE);
    residence
        .values
        .iter()
        .map(|v| match v {
            Some(c) if *c == params.urban_code => Some(true),
            Some(c) if *c == params.rural_code => Some(false),
            _ => None,
        })
        .collect()
}

/// Wealth factor score standardized to mean 0 / SD 1 **within this country**.
///
/// Cross-country wealth scores are not comparable in absolute terms; only
/// within-country rank/spread carries meaning, so the mean and SD come from
/// the table being processed and nothing else. Degenerate inputs (fewer than
/// two non-null scores, or zero spread) yield all-unknown rather than
/// infinities.
pub fn derive_wealth_z(table: &Table) -> Vec<Option<f64>> {
    let score = table.resolve_f64(raw::WEALTH_SCORE);
    let non_null: Vec<f64> = score.values.iter().flatten().copied().collect();
    if non_null.len() < 2 {
        return vec![None; score.values.len()];
    }

    let n = non_null.len() as f64;
    let mean = non_null.iter().sum::<f64>() / n;
    let variance = non_null.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let sd = variance.sqrt();
    if sd == 0.0 {
        return vec![None; score.values.len()];
    }

    score
        .values
        .iter()
        .map(|v| v.map(|x| (x - mean) / sd))
        .collect()
}

/// Stored BMI has two implied decimal digits; values at or above the
/// sentinel mark non-collection (pregnant respondents, flagged cases).
pub fn derive_bmi(table: &Table, params: &DeriveParams) -> Vec<Option<f64>> {
    let bmi_raw = table.resolve_f64(raw::BMI_RAW);
    bmi_raw
        .values
        .iter()
        .map(|v| match v {
            Some(x) if *x >= params.bmi_sentinel_raw => None,
            Some(x) => Some(x / params.bmi_scale),
            None => None,
        })
        .collect()
}

/// Composite tobacco indicator → boolean; anything but the two known codes
/// stays unknown, and so does a country missing the question.
pub fn derive_tobacco(table: &Table, params: &DeriveParams) -> Vec<Option<bool>> {
    let tobacco = table.resolve_i64(raw::USES_TOBACCO);
    tobacco
        .values
        .iter()
        .map(|v| match v {
            Some(c) if *c == params.yes_code => Some(true),
            Some(0) => Some(false),
            _ => None,
        })
        .collect()
}
