//! Column-ordered table with presence-tolerant field resolution
//!
//! A [`Table`] is the unit of work for one country: every source column plus
//! the standardized derived columns, all the same length. Derivation code
//! never touches columns directly; it goes through the typed resolvers
//! ([`Table::resolve_i64`] and friends), which report absence as a normal
//! outcome instead of an error.

use std::sync::Arc;

use arrow::datatypes::{Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::column::Column;
use crate::error::{PipelineError, Result};

/// Result of resolving one field against a table.
///
/// `values` always has one entry per row. When the field is absent (or its
/// type is incompatible with the request), `present` is `false` and every
/// value is `None` — derivation then leaves the target unknown for the whole
/// country without special-casing.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub present: bool,
    pub values: Vec<Option<T>>,
}

impl<T: Clone> Resolved<T> {
    fn absent(len: usize) -> Self {
        Self {
            present: false,
            values: vec![None; len],
        }
    }

    fn present(values: Vec<Option<T>>) -> Self {
        Self {
            present: true,
            values,
        }
    }

    /// Value at `row`; `None` both for a null cell and for an absent field.
    pub fn get(&self, row: usize) -> Option<&T> {
        self.values.get(row).and_then(|v| v.as_ref())
    }
}

/// In-memory table: ordered named columns of equal length.
#[derive(Debug, Clone, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    index: FxHashMap<String, usize>,
    num_rows: usize,
}

impl Table {
    /// Empty table with a fixed row count and no columns yet.
    pub fn with_rows(num_rows: usize) -> Self {
        Self {
            num_rows,
            ..Self::default()
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order (source order, then derived fields).
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field Presence Resolver, untyped form: `None` means the field does not
    /// exist in this source. Never an error.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Insert or replace a column. The column must match the table's row
    /// count; a mismatch means a deriver produced a malformed column and is
    /// surfaced as a schema error.
    pub fn set_column(&mut self, name: &str, column: Column) -> Result<()> {
        if column.len() != self.num_rows {
            return Err(PipelineError::Schema(format!(
                "column {name} has {} rows, table has {}",
                column.len(),
                self.num_rows
            )));
        }
        match self.index.get(name) {
            Some(&i) => self.columns[i] = column,
            None => {
                self.index.insert(name.to_string(), self.columns.len());
                self.names.push(name.to_string());
                self.columns.push(column);
            }
        }
        Ok(())
    }

    /// Resolve a field as integers. Float columns qualify when every non-null
    /// value is integral (some sources store coded answers as floats).
    pub fn resolve_i64(&self, name: &str) -> Resolved<i64> {
        match self.column(name) {
            Some(Column::Int64(v)) => Resolved::present(v.clone()),
            Some(Column::Float64(v)) => {
                let integral = v
                    .iter()
                    .flatten()
                    .all(|x| x.fract() == 0.0 && x.abs() < i64::MAX as f64);
                if integral {
                    Resolved::present(v.iter().map(|x| x.map(|f| f as i64)).collect())
                } else {
                    log::warn!("field {name} holds non-integral floats, treating as absent");
                    Resolved::absent(self.num_rows)
                }
            }
            Some(other) => {
                log::warn!(
                    "field {name} is {}, expected integer, treating as absent",
                    other.column_type()
                );
                Resolved::absent(self.num_rows)
            }
            None => Resolved::absent(self.num_rows),
        }
    }

    /// Resolve a field as floats; integer columns are widened.
    pub fn resolve_f64(&self, name: &str) -> Resolved<f64> {
        match self.column(name) {
            Some(Column::Float64(v)) => Resolved::present(v.clone()),
            Some(Column::Int64(v)) => {
                Resolved::present(v.iter().map(|x| x.map(|i| i as f64)).collect())
            }
            Some(other) => {
                log::warn!(
                    "field {name} is {}, expected numeric, treating as absent",
                    other.column_type()
                );
                Resolved::absent(self.num_rows)
            }
            None => Resolved::absent(self.num_rows),
        }
    }

    /// Resolve a field as strings.
    pub fn resolve_str(&self, name: &str) -> Resolved<String> {
        match self.column(name) {
            Some(Column::Utf8(v)) => Resolved::present(v.clone()),
            Some(other) => {
                log::warn!(
                    "field {name} is {}, expected utf8, treating as absent",
                    other.column_type()
                );
                Resolved::absent(self.num_rows)
            }
            None => Resolved::absent(self.num_rows),
        }
    }

    /// Build a table from the record batches of one Parquet file. Columns
    /// with Arrow types outside the supported scalar set are skipped with a
    /// warning.
    pub fn from_record_batches(schema: &SchemaRef, batches: &[RecordBatch]) -> Self {
        let num_rows = batches.iter().map(RecordBatch::num_rows).sum();
        let mut table = Self::with_rows(num_rows);

        for (field_idx, field) in schema.fields().iter().enumerate() {
            let mut column: Option<Column> = None;
            let mut supported = true;
            for batch in batches {
                match Column::from_arrow(batch.column(field_idx)) {
                    Some(part) => match column.as_mut() {
                        Some(col) => {
                            // Same file, same schema: types cannot diverge.
                            col.extend_from(&part).expect("uniform batch types");
                        }
                        None => column = Some(part),
                    },
                    None => {
                        supported = false;
                        break;
                    }
                }
            }
            if !supported {
                log::warn!(
                    "column {} has unsupported type {}, skipping",
                    field.name(),
                    field.data_type()
                );
                continue;
            }
            if let Some(col) = column {
                table
                    .set_column(field.name(), col)
                    .expect("batch parts sum to table rows");
            }
        }
        table
    }

    /// Convert the whole table into a single Arrow record batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields: Vec<Field> = self
            .names
            .iter()
            .zip(&self.columns)
            .map(|(name, col)| Field::new(name, col.arrow_type(), true))
            .collect();
        let arrays = self.columns.iter().map(Column::to_arrow).collect();
        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
            .map_err(|e| PipelineError::Schema(format!("record batch conversion: {e}")))
    }
}
