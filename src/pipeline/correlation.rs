//! Pairwise Pearson correlation between numeric columns

use anyhow::Result;
use faer::Mat;
use polars::prelude::*;

use super::missing::numeric_values;

/// Square correlation matrix with its column names
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Mat<f64>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Correlation between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.values[(i, j)])
    }

    /// Render as a table: a `Variable` column followed by one column per variable
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.len() + 1);
        columns.push(Column::new("Variable".into(), self.names.clone()));
        for (j, name) in self.names.iter().enumerate() {
            let values: Vec<f64> = (0..self.len()).map(|i| self.values[(i, j)]).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Names of the numeric columns of `df`, in dataset order
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(|col| col.name().to_string())
        .collect()
}

/// Correlation matrix over all numeric columns of `df`.
///
/// Each pair uses the rows where both values are present. Pairs with fewer
/// than two such rows or with zero variance are NaN.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let names = numeric_columns(df);
    let columns: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| numeric_values(df.column(name)?))
        .collect::<Result<_>>()?;

    let k = names.len();
    let mut values = Mat::<f64>::zeros(k, k);
    for i in 0..k {
        for j in i..k {
            let r = pearson_correlation(&columns[i], &columns[j]).unwrap_or(f64::NAN);
            values[(i, j)] = r;
            values[(j, i)] = r;
        }
    }

    tracing::debug!(columns = k, "correlation matrix computed");
    Ok(CorrelationMatrix { names, values })
}

/// Pearson correlation over pairwise-complete observations using a
/// single-pass Welford update.
pub fn pearson_correlation(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    if xs.len() != ys.len() {
        return None;
    }

    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut m2_x = 0.0;
    let mut m2_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            m2_x += dx * (x - mean_x);
            m2_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2.0 || m2_x == 0.0 || m2_y == 0.0 {
        return None;
    }

    Some((cov_xy / (m2_x * m2_y).sqrt()).clamp(-1.0, 1.0))
}
