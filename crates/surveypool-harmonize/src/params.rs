//! Derivation parameters
//!
//! Every numeric constant the derivers use, gathered into one struct so the
//! pool configuration can override them per study instead of the pipeline
//! carrying process-wide globals. Defaults match the standard coding of the
//! source surveys.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeriveParams {
    /// "Yes" code shared by the amenorrhea, pregnancy, and surgery indicators.
    pub yes_code: i64,

    /// Recent band for months-since-period: [0, recent_months_max] ⇒ outcome false.
    pub recent_months_max: i64,
    /// Long-elapsed band: [long_elapsed_min, long_elapsed_max] ⇒ outcome true.
    /// Codes above the band (996+, "never menstruated" and friends) stay unknown.
    pub long_elapsed_min: i64,
    pub long_elapsed_max: i64,

    /// Education bin edges in completed years: 0 ⇒ level 0, then
    /// [1, secondary_min) ⇒ 1, [secondary_min, higher_min) ⇒ 2, higher_min+ ⇒ 3.
    pub education_secondary_min: i64,
    pub education_higher_min: i64,

    /// Residence codes.
    pub urban_code: i64,
    pub rural_code: i64,

    /// BMI is stored with two implied decimals; raw values at or above the
    /// sentinel mark non-collection (pregnant respondents etc.).
    pub bmi_scale: f64,
    pub bmi_sentinel_raw: f64,

    /// Analysis-sample age inclusion band, inclusive.
    pub sample_age_min: i64,
    pub sample_age_max: i64,
}

impl Default for DeriveParams {
    fn default() -> Self {
        Self {
            yes_code: 1,
            recent_months_max: 11,
            long_elapsed_min: 12,
            long_elapsed_max: 360,
            education_secondary_min: 6,
            education_higher_min: 12,
            urban_code: 1,
            rural_code: 2,
            bmi_scale: 100.0,
            bmi_sentinel_raw: 9000.0,
            sample_age_min: 35,
            sample_age_max: 49,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_disjoint_by_default() {
        let p = DeriveParams::default();
        assert!(p.recent_months_max < p.long_elapsed_min);
    }

    #[test]
    fn partial_toml_override_keeps_other_defaults() {
        // serde(default) lets pool.toml override a single constant
        let p: DeriveParams = toml::from_str("sample_age_min = 30").unwrap();
        assert_eq!(p.sample_age_min, 30);
        assert_eq!(p.sample_age_max, 49);
        assert_eq!(p.yes_code, 1);
    }
}
