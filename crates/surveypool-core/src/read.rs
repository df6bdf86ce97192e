//! Raw source loading — one Parquet file per country

use std::fs::File;
use std::path::Path;

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{PipelineError, Result};
use crate::table::Table;

/// Read one raw per-country Parquet extract into a [`Table`].
///
/// Any failure here is a [`PipelineError::Load`]: fatal for this country
/// only, recoverable at the pool boundary.
pub fn read_parquet(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| PipelineError::load(path, e.to_string()))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| PipelineError::load(path, format!("not a readable parquet file: {e}")))?;
    let schema = builder.schema().clone();

    let reader = builder
        .build()
        .map_err(|e| PipelineError::load(path, format!("parquet reader: {e}")))?;

    let mut batches = Vec::new();
    for batch in reader {
        let batch =
            batch.map_err(|e| PipelineError::load(path, format!("record batch: {e}")))?;
        batches.push(batch);
    }

    let table = Table::from_record_batches(&schema, &batches);
    log::debug!(
        "loaded {}: {} rows, {} columns",
        path.display(),
        table.num_rows(),
        table.num_columns()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_load_error() {
        let err = read_parquet(Path::new("/nonexistent/xx.parquet")).unwrap_err();
        assert!(matches!(err, PipelineError::Load { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn garbage_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.parquet");
        std::fs::write(&path, b"not parquet at all").unwrap();
        let err = read_parquet(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Load { .. }));
    }
}
