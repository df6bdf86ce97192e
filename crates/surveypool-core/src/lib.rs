//! Surveypool Core - Common infrastructure for survey harmonization pipelines
//!
//! This crate provides the in-memory column/table model, field-presence
//! resolution, Parquet I/O, and logging/progress plumbing shared by the
//! harmonization and pooling crates.

pub mod column;
pub mod error;
pub mod logging;
pub mod progress;
pub mod read;
pub mod sink;
pub mod table;

// Re-exports for convenience
pub use column::{Column, ColumnType};
pub use error::{PipelineError, Result};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::ProgressContext;
pub use read::read_parquet;
pub use sink::{ParquetSink, cleanup_tmp_files, is_valid_parquet, write_table};
pub use table::{Resolved, Table};
