//! Parquet artifact writer with atomic tmp→rename

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::datatypes::Schema;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;

use crate::error::{PipelineError, Result};
use crate::table::Table;

/// Buffered parquet writer. Writes to `{name}.tmp` and renames on
/// [`ParquetSink::finalize`], so an interrupted build never leaves a
/// truncated artifact where a valid one is expected.
pub struct ParquetSink {
    writer: ArrowWriter<File>,
    tmp_path: PathBuf,
    final_path: PathBuf,
    row_count: usize,
}

impl std::fmt::Debug for ParquetSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParquetSink")
            .field("final_path", &self.final_path)
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

impl ParquetSink {
    /// Create a sink that will atomically replace `path` on finalize.
    pub fn new(path: &Path, schema: &Schema, zstd_level: i32) -> Result<Self> {
        let final_path = path.to_path_buf();
        let mut tmp_name = final_path
            .file_name()
            .ok_or_else(|| PipelineError::Config(format!("bad artifact path: {}", path.display())))?
            .to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = final_path.with_file_name(tmp_name);

        // Stale tmp from an interrupted run
        if tmp_path.exists() {
            fs::remove_file(&tmp_path)?;
        }

        let file = File::create(&tmp_path)?;
        let level = ZstdLevel::try_new(zstd_level)
            .map_err(|e| PipelineError::Config(format!("zstd level: {e}")))?;
        let props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(level))
            .build();

        let writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))
            .map_err(|e| PipelineError::Io(std::io::Error::other(e)))?;

        Ok(Self {
            writer,
            tmp_path,
            final_path,
            row_count: 0,
        })
    }

    /// Write a record batch
    pub fn write_batch(&mut self, batch: &RecordBatch) -> Result<()> {
        self.row_count += batch.num_rows();
        self.writer
            .write(batch)
            .map_err(|e| PipelineError::Io(std::io::Error::other(e)))
    }

    /// Finalize: flush footer and atomically rename tmp → final
    pub fn finalize(self) -> Result<usize> {
        let row_count = self.row_count;
        self.writer
            .close()
            .map_err(|e| PipelineError::Io(std::io::Error::other(e)))?;
        fs::rename(&self.tmp_path, &self.final_path)?;
        Ok(row_count)
    }
}

/// Persist a whole table as one Parquet artifact. Returns the row count.
pub fn write_table(table: &Table, path: &Path, zstd_level: i32) -> Result<usize> {
    let batch = table.to_record_batch()?;
    let mut sink = ParquetSink::new(path, &batch.schema(), zstd_level)?;
    sink.write_batch(&batch)?;
    sink.finalize()
}

/// Check if a completed parquet file exists and has a valid footer
pub fn is_valid_parquet(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };
    parquet::file::reader::SerializedFileReader::new(file).is_ok()
}

/// Remove stale .tmp files left behind by an interrupted build
pub fn cleanup_tmp_files(output_dir: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "tmp") {
            log::warn!("Removing stale tmp file: {}", path.display());
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::read::read_parquet;

    fn sample_table() -> Table {
        let mut t = Table::with_rows(2);
        t.set_column("age_years", Column::Int64(vec![Some(35), None]))
            .unwrap();
        t.set_column("wealth_z", Column::Float64(vec![Some(-1.0), Some(1.0)]))
            .unwrap();
        t
    }

    #[test]
    fn write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pooled.parquet");
        let rows = write_table(&sample_table(), &path, 3).unwrap();
        assert_eq!(rows, 2);
        assert!(is_valid_parquet(&path));

        let back = read_parquet(&path).unwrap();
        assert_eq!(back.num_rows(), 2);
        assert_eq!(
            back.column("age_years"),
            Some(&Column::Int64(vec![Some(35), None]))
        );
    }

    #[test]
    fn no_tmp_file_left_after_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pooled.parquet");
        write_table(&sample_table(), &path, 3).unwrap();
        assert!(!dir.path().join("pooled.parquet.tmp").exists());
    }

    #[test]
    fn overwrites_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pooled.parquet");
        write_table(&sample_table(), &path, 3).unwrap();

        let mut smaller = Table::with_rows(1);
        smaller
            .set_column("age_years", Column::Int64(vec![Some(40)]))
            .unwrap();
        write_table(&smaller, &path, 3).unwrap();

        let back = read_parquet(&path).unwrap();
        assert_eq!(back.num_rows(), 1);
    }

    #[test]
    fn cleanup_removes_stale_tmp() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pooled.parquet.tmp"), b"stale").unwrap();
        cleanup_tmp_files(dir.path()).unwrap();
        assert!(!dir.path().join("pooled.parquet.tmp").exists());
    }

    #[test]
    fn invalid_parquet_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.parquet");
        std::fs::write(&path, b"junk").unwrap();
        assert!(!is_valid_parquet(&path));
        assert!(!is_valid_parquet(&dir.path().join("missing.parquet")));
    }
}
