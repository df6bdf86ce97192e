//! Typed nullable columns — the in-memory unit of the table model
//!
//! A column is a `Vec<Option<T>>`; `None` is the tri-state "unknown" and is
//! never conflated with `false` or `0`. Arrow arrays appear only at the I/O
//! edges, via [`Column::from_arrow`] and [`Column::to_arrow`].

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;

use crate::error::{PipelineError, Result};

/// Logical column type. Narrower source types are widened losslessly on load
/// (i32 → i64, f32 → f64) so that the same survey field compares equal across
/// countries that stored it at different widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Float64,
    Utf8,
    Boolean,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Utf8 => "utf8",
            Self::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// One typed, nullable column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Utf8(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Self::Int64(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Utf8(v) => v.len(),
            Self::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Int64(_) => ColumnType::Int64,
            Self::Float64(_) => ColumnType::Float64,
            Self::Utf8(_) => ColumnType::Utf8,
            Self::Boolean(_) => ColumnType::Boolean,
        }
    }

    /// All-null column of the given type, used when a source lacks a field
    /// that other sources in the pool carry.
    pub fn nulls(column_type: ColumnType, len: usize) -> Self {
        match column_type {
            ColumnType::Int64 => Self::Int64(vec![None; len]),
            ColumnType::Float64 => Self::Float64(vec![None; len]),
            ColumnType::Utf8 => Self::Utf8(vec![None; len]),
            ColumnType::Boolean => Self::Boolean(vec![None; len]),
        }
    }

    /// Append `n` nulls.
    pub fn push_nulls(&mut self, n: usize) {
        match self {
            Self::Int64(v) => v.extend(std::iter::repeat_n(None, n)),
            Self::Float64(v) => v.extend(std::iter::repeat_n(None, n)),
            Self::Utf8(v) => v.extend(std::iter::repeat_n(None, n)),
            Self::Boolean(v) => v.extend(std::iter::repeat_n(None, n)),
        }
    }

    /// Append the contents of another column of the same type.
    pub fn extend_from(&mut self, other: &Column) -> Result<()> {
        match (self, other) {
            (Self::Int64(a), Self::Int64(b)) => a.extend(b.iter().copied()),
            (Self::Float64(a), Self::Float64(b)) => a.extend(b.iter().copied()),
            (Self::Utf8(a), Self::Utf8(b)) => a.extend(b.iter().cloned()),
            (Self::Boolean(a), Self::Boolean(b)) => a.extend(b.iter().copied()),
            (a, b) => {
                return Err(PipelineError::Schema(format!(
                    "cannot extend {} column with {} values",
                    a.column_type(),
                    b.column_type()
                )));
            }
        }
        Ok(())
    }

    /// Convert an Arrow array into a `Column`, widening lossless numeric
    /// types. Returns `None` for unsupported Arrow types (nested lists and
    /// the like); callers log and skip those.
    pub fn from_arrow(array: &ArrayRef) -> Option<Self> {
        let target = match array.data_type() {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32 => DataType::Int64,
            DataType::Float16 | DataType::Float32 | DataType::Float64 => DataType::Float64,
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => DataType::Utf8,
            DataType::Boolean => DataType::Boolean,
            _ => return None,
        };
        let array = cast(array, &target).ok()?;
        let column = match target {
            DataType::Int64 => {
                let typed = array.as_any().downcast_ref::<Int64Array>()?;
                Self::Int64(typed.iter().collect())
            }
            DataType::Float64 => {
                let typed = array.as_any().downcast_ref::<Float64Array>()?;
                Self::Float64(typed.iter().collect())
            }
            DataType::Utf8 => {
                let typed = array.as_any().downcast_ref::<StringArray>()?;
                Self::Utf8(typed.iter().map(|s| s.map(str::to_string)).collect())
            }
            DataType::Boolean => {
                let typed = array.as_any().downcast_ref::<BooleanArray>()?;
                Self::Boolean(typed.iter().collect())
            }
            _ => return None,
        };
        Some(column)
    }

    /// Convert to an Arrow array for persistence.
    pub fn to_arrow(&self) -> ArrayRef {
        match self {
            Self::Int64(v) => Arc::new(Int64Array::from(v.clone())),
            Self::Float64(v) => Arc::new(Float64Array::from(v.clone())),
            Self::Utf8(v) => Arc::new(StringArray::from(v.clone())),
            Self::Boolean(v) => Arc::new(BooleanArray::from(v.clone())),
        }
    }

    /// Arrow type this column persists as.
    pub fn arrow_type(&self) -> DataType {
        match self.column_type() {
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Float64 => DataType::Float64,
            ColumnType::Utf8 => DataType::Utf8,
            ColumnType::Boolean => DataType::Boolean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Int32Array;

    #[test]
    fn nulls_have_requested_length_and_type() {
        let col = Column::nulls(ColumnType::Float64, 3);
        assert_eq!(col.len(), 3);
        assert_eq!(col.column_type(), ColumnType::Float64);
        assert_eq!(col, Column::Float64(vec![None, None, None]));
    }

    #[test]
    fn extend_same_type() {
        let mut col = Column::Int64(vec![Some(1), None]);
        col.extend_from(&Column::Int64(vec![Some(2)])).unwrap();
        assert_eq!(col, Column::Int64(vec![Some(1), None, Some(2)]));
    }

    #[test]
    fn extend_type_mismatch_errors() {
        let mut col = Column::Int64(vec![Some(1)]);
        let err = col
            .extend_from(&Column::Utf8(vec![Some("x".to_string())]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn push_nulls_appends() {
        let mut col = Column::Boolean(vec![Some(true)]);
        col.push_nulls(2);
        assert_eq!(col, Column::Boolean(vec![Some(true), None, None]));
    }

    #[test]
    fn from_arrow_widens_int32() {
        let array: ArrayRef = Arc::new(Int32Array::from(vec![Some(7), None]));
        let col = Column::from_arrow(&array).unwrap();
        assert_eq!(col, Column::Int64(vec![Some(7), None]));
    }

    #[test]
    fn from_arrow_rejects_unsupported() {
        use arrow::array::ListBuilder;
        let mut builder = ListBuilder::new(arrow::array::Int64Builder::new());
        builder.append(true);
        let array: ArrayRef = Arc::new(builder.finish());
        assert!(Column::from_arrow(&array).is_none());
    }

    #[test]
    fn arrow_round_trip_preserves_nulls() {
        let col = Column::Utf8(vec![Some("urban".to_string()), None]);
        let back = Column::from_arrow(&col.to_arrow()).unwrap();
        assert_eq!(back, col);
    }
}
