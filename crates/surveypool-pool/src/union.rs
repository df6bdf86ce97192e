//! Schema-union concatenation of per-country tables
//!
//! The pooled schema is the union, not the intersection: a field present in
//! only some countries appears null-filled (unknown) in the rows of the
//! others. Column order is first-seen order across the input tables, which
//! for the pool build means config order.

use surveypool_core::{Column, ColumnType, PipelineError, Result, Table};

/// Concatenate tables into one, null-filling columns a table lacks.
///
/// The same column name must carry the same type everywhere it appears;
/// a conflict means the sources disagree about a field and is a fatal
/// schema error rather than something to coerce silently.
pub fn concat_union(tables: &[Table]) -> Result<Table> {
    let total_rows = tables.iter().map(Table::num_rows).sum();
    let mut pooled = Table::with_rows(total_rows);

    // Union of column names, first-seen order, with the agreed type.
    let mut union: Vec<(String, ColumnType)> = Vec::new();
    for table in tables {
        for name in table.column_names() {
            let column_type = table
                .column(name)
                .map(Column::column_type)
                .expect("name came from this table");
            match union.iter().find(|(n, _)| n == name) {
                Some((_, seen)) if *seen != column_type => {
                    return Err(PipelineError::Schema(format!(
                        "column {name} is {seen} in one country and {column_type} in another"
                    )));
                }
                Some(_) => {}
                None => union.push((name.to_string(), column_type)),
            }
        }
    }

    for (name, column_type) in union {
        let mut pooled_column = Column::nulls(column_type, 0);
        for table in tables {
            match table.column(&name) {
                Some(col) => pooled_column.extend_from(col)?,
                None => pooled_column.push_nulls(table.num_rows()),
            }
        }
        pooled.set_column(&name, pooled_column)?;
    }

    Ok(pooled)
}
