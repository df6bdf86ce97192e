//! Core extract projection
//!
//! The lean analysis table: a fixed column allowlist over the full pooled
//! table, every row kept. The allowlist is a contract with downstream
//! modeling — a missing column signals upstream corruption and must abort
//! loudly, unlike the tolerant per-field resolution inside harmonization.

use std::path::Path;

use surveypool_core::{PipelineError, Result, Table, write_table};

/// Columns the downstream modeling client is promised, in output order.
/// Country-specific provenance fields are deliberately not part of this.
pub const CORE_COLUMNS: [&str; 13] = [
    "country_code",
    "country_id",
    "age_years",
    "age_group",
    "outcome_any",
    "outcome_excl_cause",
    "cause_flag",
    "education_level",
    "is_urban",
    "wealth_z",
    "bmi",
    "tobacco_user",
    "sample_flag",
];

/// Project the pooled table onto [`CORE_COLUMNS`].
pub fn core_extract(pooled: &Table) -> Result<Table> {
    let mut extract = Table::with_rows(pooled.num_rows());
    for name in CORE_COLUMNS {
        let column = pooled.column(name).ok_or_else(|| {
            PipelineError::Schema(format!("pooled table is missing core column {name}"))
        })?;
        extract.set_column(name, column.clone())?;
    }
    Ok(extract)
}

/// Project and persist in one go. Returns the row count.
pub fn write_core_extract(pooled: &Table, path: &Path, zstd_level: i32) -> Result<usize> {
    let extract = core_extract(pooled)?;
    write_table(&extract, path, zstd_level)
}
