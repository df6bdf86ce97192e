//! surveypool-pool: pooled dataset builder
//!
//! Runs the per-country harmonization passes over a configured country list,
//! concatenates the results into one schema-union pooled table, encodes the
//! integer country id, persists the artifact atomically, and projects the
//! fixed-column core extract for downstream modeling.

pub mod builder;
pub mod config;
pub mod extract;
pub mod union;

pub use builder::{BuildSummary, CountryOutcome, build_pool};
pub use config::PoolConfig;
pub use extract::{CORE_COLUMNS, core_extract, write_core_extract};
pub use union::concat_union;
