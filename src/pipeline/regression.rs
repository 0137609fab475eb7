//! Ordinary least squares regression over encoded survey columns
//!
//! Each [`RegressionSpec`] names predictor columns and one outcome column.
//! Rows with a missing value in any of them are dropped, an intercept is
//! added, and the model is fit in closed form through the normal equations
//! of the mean-centred data.

use std::path::Path;

use anyhow::{Context, Result};
use faer::Mat;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::missing::{complete_rows, missing_counts, numeric_values};
use super::stats::students_t_two_sided_p;

/// Name used for the intercept term in coefficient tables
pub const INTERCEPT_NAME: &str = "const";

/// Pivots of the equilibrated Gram matrix below this are treated as zero
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Relative spread below which a column counts as constant
const CONSTANT_TOLERANCE: f64 = 1e-12;

/// A model to fit: predictors, outcome and a descriptive label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSpec {
    pub label: String,
    pub predictors: Vec<String>,
    pub outcome: String,
}

impl RegressionSpec {
    pub fn new(label: &str, predictors: &[&str], outcome: &str) -> Self {
        Self {
            label: label.to_string(),
            predictors: predictors.iter().map(|p| p.to_string()).collect(),
            outcome: outcome.to_string(),
        }
    }

    /// Predictors followed by the outcome
    pub fn selected_columns(&self) -> Vec<String> {
        let mut cols = self.predictors.clone();
        cols.push(self.outcome.clone());
        cols
    }
}

/// The three survey models: engagement, mental health and usage stoppage
pub fn builtin_specs() -> Vec<RegressionSpec> {
    vec![
        RegressionSpec::new(
            "Model 1: Engagement Factors",
            &[
                "Engaging (Short Videos)_Code",
                "Engaging (Long Videos)_Code",
                "Engaging (Stories)_Code",
                "Engaging (Private Messaging)_Code",
                "Engaging (Interactive Features)_Code",
            ],
            "Social Media Use_Code",
        ),
        RegressionSpec::new(
            "Model 2: Mental Health Impact",
            &[
                "Emotional Impact_Code",
                "Connected_Code",
                "Overwhelmed_Code",
                "Affects Sleep_Code",
                "Break_Code",
            ],
            "Social Media Use_Code",
        ),
        RegressionSpec::new(
            "Model 3: Usage Stoppage Reasons",
            &[
                "Reason 1 (Interest)_Code",
                "Reason 2 (Access)_Code",
                "Reason 3 (Privacy)_Code",
                "Reason 4 (Offline Interations)_Code",
            ],
            "Used Then Stopped_Code",
        ),
    ]
}

/// Load model definitions from a JSON file holding a list of
/// `{ "label", "predictors", "outcome" }` objects.
pub fn load_specs(path: &Path) -> Result<Vec<RegressionSpec>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;
    let specs: Vec<RegressionSpec> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse model file: {}", path.display()))?;

    if specs.is_empty() {
        anyhow::bail!("Model file {} defines no models", path.display());
    }
    if let Some(spec) = specs.iter().find(|s| s.predictors.is_empty()) {
        anyhow::bail!("Model '{}' has no predictors", spec.label);
    }

    Ok(specs)
}

/// Failures local to a single model; other models in the same run continue.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegressionError {
    #[error("Column not found in dataset: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Column '{column}' is not numeric (found {dtype})")]
    NonNumericColumn { column: String, dtype: String },

    #[error("Not enough observations: {observations} complete row(s) for {parameters} parameter(s)")]
    InsufficientObservations {
        observations: usize,
        parameters: usize,
    },

    #[error("Outcome '{0}' is constant across complete rows; R Square is undefined")]
    ConstantOutcome(String),

    #[error("Design matrix is singular: '{0}' is a linear combination of the other terms")]
    SingularDesign(String),
}

/// Complete-case data for one model
#[derive(Debug, Clone)]
pub struct DesignData {
    pub predictors: Vec<String>,
    pub outcome: String,
    /// One vector per predictor, all of length `y.len()`
    pub columns: Vec<Vec<f64>>,
    pub y: Vec<f64>,
    /// Rows removed by case-wise deletion
    pub dropped_rows: usize,
    /// Missing entries per selected column, before deletion
    pub missing_by_column: Vec<(String, usize)>,
}

/// Select a model's columns and drop incomplete rows.
pub fn select_complete_cases(
    df: &DataFrame,
    spec: &RegressionSpec,
) -> Result<DesignData, RegressionError> {
    let selected = spec.selected_columns();

    let available: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    let absent: Vec<String> = selected
        .iter()
        .filter(|c| !available.contains(c))
        .cloned()
        .collect();
    if !absent.is_empty() {
        return Err(RegressionError::MissingColumns(absent));
    }

    let mut raw: Vec<Vec<Option<f64>>> = Vec::with_capacity(selected.len());
    for name in &selected {
        let non_numeric = || RegressionError::NonNumericColumn {
            column: name.clone(),
            dtype: df
                .column(name)
                .map(|c| c.dtype().to_string())
                .unwrap_or_default(),
        };
        let column = df.column(name).map_err(|_| non_numeric())?;
        if !column.dtype().is_primitive_numeric() {
            return Err(non_numeric());
        }
        raw.push(numeric_values(column).map_err(|_| non_numeric())?);
    }

    let keep = complete_rows(&raw);
    let dropped_rows = df.height() - keep.len();
    let missing_by_column = missing_counts(&selected, &raw);

    let mut columns: Vec<Vec<f64>> = raw
        .iter()
        .map(|col| keep.iter().filter_map(|&row| col[row]).collect())
        .collect();
    let y = columns.pop().unwrap_or_default();

    tracing::debug!(
        model = %spec.label,
        kept = keep.len(),
        dropped = dropped_rows,
        "case-wise deletion"
    );

    Ok(DesignData {
        predictors: spec.predictors.clone(),
        outcome: spec.outcome.clone(),
        columns,
        y,
        dropped_rows,
        missing_by_column,
    })
}

/// One row of the coefficient table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    pub variable: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
}

/// Fitted OLS model with summary statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OlsFit {
    pub observations: usize,
    pub dropped_rows: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// √R²; carries no sign
    pub multiple_r: f64,
    /// Residual standard error, √(SS_res / df_resid)
    pub std_error: f64,
    pub df_resid: usize,
    /// Intercept first, then predictors in model order
    pub coefficients: Vec<Coefficient>,
}

/// Fit OLS with an intercept on complete-case data.
///
/// Predictors and outcome are centred before the normal equations are formed,
/// so the slopes come from the covariance structure alone and a large common
/// offset in a predictor does not inflate the condition number. The intercept
/// and its standard error are recovered from the means afterwards.
pub fn fit_ols(design: &DesignData) -> Result<OlsFit, RegressionError> {
    let n = design.y.len();
    let p = design.columns.len();
    let k = p + 1;

    if n <= k {
        return Err(RegressionError::InsufficientObservations {
            observations: n,
            parameters: k,
        });
    }

    let mean = |values: &[f64]| values.iter().sum::<f64>() / n as f64;
    let mean_y = mean(design.y.as_slice());
    let means_x: Vec<f64> = design.columns.iter().map(|c| mean(c.as_slice())).collect();

    if is_constant(&design.y, mean_y) {
        return Err(RegressionError::ConstantOutcome(design.outcome.clone()));
    }
    for (j, column) in design.columns.iter().enumerate() {
        if is_constant(column, means_x[j]) {
            return Err(RegressionError::SingularDesign(design.predictors[j].clone()));
        }
    }

    let xc = Mat::<f64>::from_fn(n, p, |i, j| design.columns[j][i] - means_x[j]);
    let yc = Mat::<f64>::from_fn(n, 1, |i, _| design.y[i] - mean_y);

    let gram = xc.transpose() * &xc;
    let xty = xc.transpose() * &yc;
    let gram_inv = invert_gram(&gram, &design.predictors)?;
    let slopes = &gram_inv * &xty;
    let fitted = &xc * &slopes;

    let ss_tot: f64 = (0..n).map(|i| yc[(i, 0)].powi(2)).sum();
    let ss_res: f64 = (0..n).map(|i| (yc[(i, 0)] - fitted[(i, 0)]).powi(2)).sum();

    let df_resid = n - k;
    let r_squared = 1.0 - ss_res / ss_tot;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / df_resid as f64;
    let mse = ss_res / df_resid as f64;

    let intercept = mean_y - (0..p).map(|j| slopes[(j, 0)] * means_x[j]).sum::<f64>();
    // Var(b0) = mse * (1/n + x̄ᵀ (XcᵀXc)⁻¹ x̄)
    let leverage: f64 = (0..p)
        .flat_map(|a| (0..p).map(move |b| (a, b)))
        .map(|(a, b)| means_x[a] * gram_inv[(a, b)] * means_x[b])
        .sum();

    let mut terms = Vec::with_capacity(k);
    terms.push((INTERCEPT_NAME.to_string(), intercept, 1.0 / n as f64 + leverage));
    for (j, name) in design.predictors.iter().enumerate() {
        terms.push((name.clone(), slopes[(j, 0)], gram_inv[(j, j)]));
    }

    let coefficients = terms
        .into_iter()
        .map(|(variable, estimate, variance_factor)| {
            let std_error = (mse * variance_factor).max(0.0).sqrt();
            let t_value = estimate / std_error;
            Coefficient {
                variable,
                estimate,
                std_error,
                t_value,
                p_value: students_t_two_sided_p(t_value, df_resid as f64),
            }
        })
        .collect();

    Ok(OlsFit {
        observations: n,
        dropped_rows: design.dropped_rows,
        r_squared,
        adj_r_squared,
        multiple_r: r_squared.max(0.0).sqrt(),
        std_error: mse.sqrt(),
        df_resid,
        coefficients,
    })
}

/// True when every value equals the mean up to rounding in the last bits.
fn is_constant(values: &[f64], mean: f64) -> bool {
    let scale = values.iter().fold(mean.abs(), |acc, v| acc.max(v.abs()));
    let spread = values.iter().fold(0.0f64, |acc, v| acc.max((v - mean).abs()));
    spread <= CONSTANT_TOLERANCE * scale
}

/// Invert a Gram matrix `XᵀX` (here, of the centred predictors).
///
/// The matrix is scaled to unit diagonal before Gauss-Jordan elimination with
/// partial pivoting, so the pivot tolerance does not depend on column units.
fn invert_gram(gram: &Mat<f64>, names: &[String]) -> Result<Mat<f64>, RegressionError> {
    let k = gram.nrows();
    let scale: Vec<f64> = (0..k).map(|i| gram[(i, i)].sqrt()).collect();
    if let Some(i) = scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
        return Err(RegressionError::SingularDesign(names[i].clone()));
    }

    let mut a = Mat::<f64>::from_fn(k, k, |i, j| gram[(i, j)] / (scale[i] * scale[j]));
    let mut inv = Mat::<f64>::from_fn(k, k, |i, j| if i == j { 1.0 } else { 0.0 });

    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&r1, &r2| {
                a[(r1, col)]
                    .abs()
                    .partial_cmp(&a[(r2, col)].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        let pivot_abs = a[(pivot_row, col)].abs();
        if pivot_abs.is_nan() || pivot_abs < SINGULAR_TOLERANCE {
            return Err(RegressionError::SingularDesign(names[col].clone()));
        }

        if pivot_row != col {
            for j in 0..k {
                let tmp = a[(col, j)];
                a[(col, j)] = a[(pivot_row, j)];
                a[(pivot_row, j)] = tmp;
                let tmp = inv[(col, j)];
                inv[(col, j)] = inv[(pivot_row, j)];
                inv[(pivot_row, j)] = tmp;
            }
        }

        let pivot = a[(col, col)];
        for j in 0..k {
            a[(col, j)] /= pivot;
            inv[(col, j)] /= pivot;
        }

        for r in 0..k {
            if r == col {
                continue;
            }
            let factor = a[(r, col)];
            if factor == 0.0 {
                continue;
            }
            for j in 0..k {
                let da = factor * a[(col, j)];
                let di = factor * inv[(col, j)];
                a[(r, j)] -= da;
                inv[(r, j)] -= di;
            }
        }
    }

    Ok(Mat::<f64>::from_fn(k, k, |i, j| inv[(i, j)] / (scale[i] * scale[j])))
}

/// Select complete cases and fit one model.
pub fn run_regression(df: &DataFrame, spec: &RegressionSpec) -> Result<OlsFit, RegressionError> {
    let design = select_complete_cases(df, spec)?;
    fit_ols(&design)
}

/// Outcome of one model in a batch run
#[derive(Debug, Clone)]
pub struct ModelOutcome {
    pub spec: RegressionSpec,
    pub result: Result<OlsFit, RegressionError>,
}

/// Fit every model in order. A failing model never stops the ones after it.
pub fn run_all(df: &DataFrame, specs: &[RegressionSpec]) -> Vec<ModelOutcome> {
    specs
        .iter()
        .map(|spec| {
            let result = run_regression(df, spec);
            if let Err(e) = &result {
                tracing::warn!(model = %spec.label, error = %e, "model skipped");
            }
            ModelOutcome {
                spec: spec.clone(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(k: usize) -> Vec<String> {
        (0..k).map(|i| format!("v{}", i)).collect()
    }

    #[test]
    fn inverts_diagonal_matrix() {
        let g = Mat::<f64>::from_fn(2, 2, |i, j| if i == j { (i + 1) as f64 * 2.0 } else { 0.0 });
        let inv = invert_gram(&g, &names(2)).unwrap();
        assert!((inv[(0, 0)] - 0.5).abs() < 1e-12);
        assert!((inv[(1, 1)] - 0.25).abs() < 1e-12);
        assert!(inv[(0, 1)].abs() < 1e-12);
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let g = Mat::<f64>::from_fn(3, 3, |i, j| match (i, j) {
            (0, 0) => 4.0,
            (1, 1) => 5.0,
            (2, 2) => 6.0,
            (0, 1) | (1, 0) => 1.0,
            (1, 2) | (2, 1) => 2.0,
            _ => 0.5,
        });
        let inv = invert_gram(&g, &names(3)).unwrap();
        let prod = &g * &inv;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((prod[(i, j)] - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn rank_deficient_matrix_is_rejected() {
        // Second row/column is twice the first
        let g = Mat::<f64>::from_fn(2, 2, |i, j| ((i + 1) * (j + 1)) as f64);
        let err = invert_gram(&g, &names(2)).unwrap_err();
        assert_eq!(err, RegressionError::SingularDesign("v1".to_string()));
    }

    #[test]
    fn selected_columns_end_with_outcome() {
        let spec = RegressionSpec::new("m", &["a", "b"], "y");
        assert_eq!(spec.selected_columns(), vec!["a", "b", "y"]);
    }

    #[test]
    fn builtin_specs_are_in_report_order() {
        let specs = builtin_specs();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].outcome, "Social Media Use_Code");
        assert_eq!(specs[1].predictors.len(), 5);
        assert_eq!(specs[2].outcome, "Used Then Stopped_Code");
    }
}
