//! Per-country processing pass
//!
//! Load → tag with country code → outcomes → covariates → sample flag.
//! Every originally-present source column stays on the table for
//! provenance/audit; harmonization only adds (or overwrites its own
//! standardized) columns.

use std::path::PathBuf;

use serde::Deserialize;
use surveypool_core::{Column, Result, Table, read_parquet};

use crate::covariate;
use crate::fields::derived;
use crate::outcome::derive_outcomes;
use crate::params::DeriveParams;
use crate::sample::derive_sample_flag;

/// One configured (country code, raw extract) pair.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CountrySource {
    pub code: String,
    pub path: PathBuf,
}

/// Run the full harmonization pass for one country.
///
/// A load failure is fatal for this country only; the caller decides whether
/// siblings continue. Derivation itself cannot fail on missing fields — that
/// is the resolvers' contract.
pub fn process_country(source: &CountrySource, params: &DeriveParams) -> Result<Table> {
    let table = read_parquet(&source.path)?;
    log::info!(
        "{}: loaded {} rows, {} columns from {}",
        source.code,
        table.num_rows(),
        table.num_columns(),
        source.path.display()
    );
    harmonize(table, &source.code, params)
}

/// Harmonize an already-loaded table. Split out so tests and re-derivation
/// over in-memory fixtures skip the filesystem.
pub fn harmonize(mut table: Table, code: &str, params: &DeriveParams) -> Result<Table> {
    let n = table.num_rows();
    table.set_column(
        derived::COUNTRY_CODE,
        Column::Utf8(vec![Some(code.to_string()); n]),
    )?;

    let outcomes = derive_outcomes(&table, params);
    table.set_column(derived::CAUSE_FLAG, Column::Boolean(outcomes.cause))?;
    table.set_column(derived::OUTCOME_ANY, Column::Boolean(outcomes.any))?;
    table.set_column(
        derived::OUTCOME_EXCL_CAUSE,
        Column::Boolean(outcomes.excl_cause),
    )?;

    let education = covariate::derive_education(&table, params);
    table.set_column(derived::EDUCATION_LEVEL, Column::Int64(education))?;
    let is_urban = covariate::derive_is_urban(&table, params);
    table.set_column(derived::IS_URBAN, Column::Boolean(is_urban))?;
    let wealth_z = covariate::derive_wealth_z(&table);
    table.set_column(derived::WEALTH_Z, Column::Float64(wealth_z))?;
    let bmi = covariate::derive_bmi(&table, params);
    table.set_column(derived::BMI, Column::Float64(bmi))?;
    let tobacco = covariate::derive_tobacco(&table, params);
    table.set_column(derived::TOBACCO_USER, Column::Boolean(tobacco))?;

    // Last: needs outcome_excl_cause on the table
    let flag = derive_sample_flag(&table, params);
    table.set_column(derived::SAMPLE_FLAG, Column::Boolean(flag))?;

    Ok(table)
}
