//! Canonical field names for raw and derived columns.
//!
//! Raw names are what the per-country extracts use after export; derived
//! names are the output contract with downstream modeling and must not
//! change without coordinating with consumers.

/// Raw source fields (each optionally absent in any given country).
pub mod raw {
    /// Months since last menstrual period (numeric, special codes above 360).
    pub const MONTHS_SINCE_PERIOD: &str = "months_since_period";
    /// Currently amenorrheic (coded yes/no).
    pub const AMENORRHEIC: &str = "amenorrheic";
    /// Currently pregnant (coded yes/no).
    pub const CURRENTLY_PREGNANT: &str = "currently_pregnant";
    /// Period stopped by surgery, e.g. hysterectomy (coded yes/no).
    pub const PERIOD_REMOVED_SURGERY: &str = "period_removed_surgery";
    /// Completed years of schooling.
    pub const EDUCATION_YEARS: &str = "education_years";
    /// Residence type code (1 urban, 2 rural).
    pub const RESIDENCE_TYPE: &str = "residence_type";
    /// Wealth index factor score (country-specific scale).
    pub const WEALTH_SCORE: &str = "wealth_score";
    /// Body mass index with two implied decimal digits.
    pub const BMI_RAW: &str = "bmi_raw";
    /// Composite tobacco-use indicator (0 no, 1 yes).
    pub const USES_TOBACCO: &str = "uses_tobacco";
}

/// Standardized/derived fields — the pooled output contract.
pub mod derived {
    pub const COUNTRY_CODE: &str = "country_code";
    pub const COUNTRY_ID: &str = "country_id";
    pub const AGE_YEARS: &str = "age_years";
    pub const AGE_GROUP: &str = "age_group";
    pub const OUTCOME_ANY: &str = "outcome_any";
    pub const OUTCOME_EXCL_CAUSE: &str = "outcome_excl_cause";
    pub const CAUSE_FLAG: &str = "cause_flag";
    pub const EDUCATION_LEVEL: &str = "education_level";
    pub const IS_URBAN: &str = "is_urban";
    pub const WEALTH_Z: &str = "wealth_z";
    pub const BMI: &str = "bmi";
    pub const TOBACCO_USER: &str = "tobacco_user";
    pub const SAMPLE_FLAG: &str = "sample_flag";
}
