//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Small survey-shaped DataFrame
///
/// - `Device`: text, one missing value
/// - `Social Media Use`: text, no missing values
/// - `Age`: integer, untouched by encoding
/// - `Hours`: float with one missing value
pub fn create_survey_dataframe() -> DataFrame {
    df! {
        "Device" => [Some("Phone"), Some("Laptop"), None, Some("Tablet"), Some("Phone"), Some("Laptop")],
        "Social Media Use" => ["Daily", "Weekly", "Daily", "Never", "Daily", "Weekly"],
        "Age" => [21i64, 34, 19, 45, 28, 52],
        "Hours" => [Some(3.5f64), Some(1.0), Some(4.0), None, Some(2.5), Some(0.5)],
    }
    .unwrap()
}

/// Exact linear relation `y = 2*x1 + 3*x2 + 1`, no noise
pub fn create_linear_dataframe() -> DataFrame {
    let x1: Vec<f64> = (1..=10).map(|v| v as f64).collect();
    let x2 = vec![3.0f64, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0];
    let y: Vec<f64> = x1
        .iter()
        .zip(x2.iter())
        .map(|(a, b)| 2.0 * a + 3.0 * b + 1.0)
        .collect();

    df! {
        "x1" => x1,
        "x2" => x2,
        "y" => y,
    }
    .unwrap()
}

/// Textbook simple regression: slope 0.6, intercept 2.2, R² = 0.6
pub fn create_simple_regression_dataframe() -> DataFrame {
    df! {
        "x" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "y" => [2.0f64, 4.0, 5.0, 4.0, 5.0],
    }
    .unwrap()
}

/// Noisy regression data: `signal` drives `y`, `noise` is unrelated
pub fn create_noisy_regression_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let signal: Vec<f64> = (0..rows).map(|_| rng.gen_range(1..=5) as f64).collect();
    let noise: Vec<f64> = (0..rows).map(|_| rng.gen_range(1..=5) as f64).collect();
    let y: Vec<f64> = signal
        .iter()
        .map(|s| 1.5 * s + 0.5 + rng.gen_range(-1.0..1.0))
        .collect();

    df! {
        "signal" => signal,
        "noise" => noise,
        "y" => y,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Codes of an encoded column as `u32` values
pub fn code_column(df: &DataFrame, name: &str) -> Vec<u32> {
    df.column(name)
        .unwrap()
        .cast(&DataType::UInt32)
        .unwrap()
        .u32()
        .unwrap()
        .iter()
        .map(|v| v.unwrap())
        .collect()
}

/// Text values of a column, `None` for missing
pub fn text_column(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert two floats agree within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (actual - expected).abs() < tol,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}
