//! Pool build orchestration
//!
//! Drives every configured country through the harmonization pass
//! (optionally in parallel), tracks a per-country state machine, and turns
//! the survivors into the pooled artifact. A country that fails to load is
//! skipped and reported; it never takes its siblings down with it.

use std::fmt;
use std::fs;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use surveypool_core::{
    Column, PipelineError, ProgressContext, Table, cleanup_tmp_files, write_table,
};
use surveypool_harmonize::fields::derived;
use surveypool_harmonize::{CountrySource, DeriveParams, process_country};

use crate::config::PoolConfig;
use crate::union::concat_union;

/// Per-country lifecycle during one build.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CountryState {
    Pending,
    Loaded,
    Appended,
    Failed(String),
}

impl fmt::Display for CountryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Loaded => write!(f, "LOADED"),
            Self::Appended => write!(f, "APPENDED"),
            Self::Failed(_) => write!(f, "FAILED"),
        }
    }
}

/// Final per-country outcome, as reported in the build summary.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CountryOutcome {
    Appended {
        code: String,
        rows: usize,
        country_id: i64,
    },
    Failed {
        code: String,
        reason: String,
    },
}

impl CountryOutcome {
    pub fn code(&self) -> &str {
        match self {
            Self::Appended { code, .. } | Self::Failed { code, .. } => code,
        }
    }
}

/// Build summary — the caller-facing report and the JSON sidecar written
/// next to the pooled artifact. Carries the country_code ↔ country_id
/// mapping, which is run-scoped and not portable across config changes.
#[derive(Debug, Serialize)]
pub struct BuildSummary {
    pub countries: Vec<CountryOutcome>,
    pub total_rows: usize,
    pub artifact: std::path::PathBuf,
    pub built_at: DateTime<Utc>,
}

impl BuildSummary {
    pub fn appended(&self) -> impl Iterator<Item = &CountryOutcome> {
        self.countries
            .iter()
            .filter(|c| matches!(c, CountryOutcome::Appended { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &CountryOutcome> {
        self.countries
            .iter()
            .filter(|c| matches!(c, CountryOutcome::Failed { .. }))
    }
}

fn run_one(
    source: &CountrySource,
    params: &DeriveParams,
    progress: &ProgressContext,
) -> std::result::Result<Table, PipelineError> {
    let line = progress.country_line(&source.code);
    line.set_message(format!("harmonizing {}", source.path.display()));
    let result = process_country(source, params);
    match &result {
        Ok(table) => line.finish_with_message(format!("{} rows", table.num_rows())),
        Err(e) => line.finish_with_message(format!("failed: {e}")),
    }
    result
}

/// Run the whole pool build: validate, harmonize every country, concatenate
/// with schema union, encode `country_id`, persist atomically.
///
/// Succeeds iff at least one country reached `APPENDED`. Load failures are
/// isolated per country; schema/config/IO failures abort.
pub fn build_pool(config: &PoolConfig, progress: &ProgressContext) -> Result<BuildSummary> {
    config.validate()?;
    fs::create_dir_all(&config.output)
        .with_context(|| format!("failed to create output dir: {}", config.output.display()))?;
    cleanup_tmp_files(&config.output)?;

    let workers = match config.workers {
        Some(1) => 1,
        Some(0) | None => rayon::current_num_threads(),
        Some(n) => n,
    };

    // Per-country passes are independent; results are collected in config
    // order so nothing downstream depends on completion order.
    let mut states: Vec<CountryState> = vec![CountryState::Pending; config.countries.len()];
    let results: Vec<std::result::Result<Table, PipelineError>> = if workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .context("failed to build worker pool")?;
        pool.install(|| {
            config
                .countries
                .par_iter()
                .map(|c| run_one(c, &config.params, progress))
                .collect()
        })
    } else {
        config
            .countries
            .iter()
            .map(|c| run_one(c, &config.params, progress))
            .collect()
    };

    let mut tables: Vec<Table> = Vec::new();
    for (i, result) in results.into_iter().enumerate() {
        let code = &config.countries[i].code;
        match result {
            Ok(table) => {
                states[i] = CountryState::Loaded;
                log::info!("{code}: {} ({} rows)", states[i], table.num_rows());
                tables.push(table);
                states[i] = CountryState::Appended;
            }
            Err(e) if !e.is_fatal() => {
                log::warn!("{code}: skipped, {e}");
                states[i] = CountryState::Failed(e.to_string());
            }
            Err(e) => return Err(e).with_context(|| format!("{code}: fatal error")),
        }
    }

    if tables.is_empty() {
        bail!(
            "all {} configured countries failed to load, nothing to pool",
            config.countries.len()
        );
    }

    let mut pooled = concat_union(&tables)?;

    // country_id: distinct codes actually present, first-seen-in-config
    // order. Run-scoped by design; the mapping travels with the summary.
    let id_map: Vec<(String, i64)> = config
        .countries
        .iter()
        .zip(&states)
        .filter(|(_, s)| **s == CountryState::Appended)
        .enumerate()
        .map(|(id, (c, _))| (c.code.clone(), id as i64))
        .collect();
    let codes = pooled.resolve_str(derived::COUNTRY_CODE);
    let ids: Vec<Option<i64>> = codes
        .values
        .iter()
        .map(|code| {
            code.as_deref().and_then(|code| {
                id_map
                    .iter()
                    .find(|(c, _)| c == code)
                    .map(|(_, id)| *id)
            })
        })
        .collect();
    pooled.set_column(derived::COUNTRY_ID, Column::Int64(ids))?;

    let artifact = config.pooled_path();
    let total_rows = write_table(&pooled, &artifact, config.compression_level)
        .with_context(|| format!("failed to persist {}", artifact.display()))?;
    log::info!(
        "pooled {} countries, {} rows -> {}",
        id_map.len(),
        total_rows,
        artifact.display()
    );

    let countries = config
        .countries
        .iter()
        .zip(&states)
        .map(|(c, state)| match state {
            CountryState::Appended => {
                let (_, country_id) = id_map
                    .iter()
                    .find(|(code, _)| *code == c.code)
                    .expect("appended country is in the id map");
                let rows = codes
                    .values
                    .iter()
                    .filter(|v| v.as_deref() == Some(c.code.as_str()))
                    .count();
                CountryOutcome::Appended {
                    code: c.code.clone(),
                    rows,
                    country_id: *country_id,
                }
            }
            CountryState::Failed(reason) => CountryOutcome::Failed {
                code: c.code.clone(),
                reason: reason.clone(),
            },
            // All countries are terminal by now
            other => CountryOutcome::Failed {
                code: c.code.clone(),
                reason: format!("internal: non-terminal state {other}"),
            },
        })
        .collect();

    let summary = BuildSummary {
        countries,
        total_rows,
        artifact,
        built_at: Utc::now(),
    };

    let summary_json =
        serde_json::to_string_pretty(&summary).context("failed to serialize build summary")?;
    fs::write(config.summary_path(), summary_json)
        .with_context(|| format!("failed to write {}", config.summary_path().display()))?;

    Ok(summary)
}
