//! Missing value handling for analysis columns
//!
//! Regression uses case-wise deletion: a row is kept only when every selected
//! column holds a value. Nulls and NaNs both count as missing.

use anyhow::Result;
use polars::prelude::*;

/// Extract a numeric column as `f64`, with `None` for null and NaN entries.
pub fn numeric_values(column: &Column) -> Result<Vec<Option<f64>>> {
    let float_col = column.cast(&DataType::Float64)?;
    let values = float_col
        .f64()?
        .iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Indices of rows where every column has a value.
///
/// All columns must have the same length.
pub fn complete_rows(columns: &[Vec<Option<f64>>]) -> Vec<usize> {
    let height = columns.first().map(Vec::len).unwrap_or(0);
    (0..height)
        .filter(|&row| columns.iter().all(|col| col[row].is_some()))
        .collect()
}

/// Count of missing entries per column, in the order given.
pub fn missing_counts(names: &[String], columns: &[Vec<Option<f64>>]) -> Vec<(String, usize)> {
    names
        .iter()
        .zip(columns)
        .map(|(name, col)| (name.clone(), col.iter().filter(|v| v.is_none()).count()))
        .collect()
}
