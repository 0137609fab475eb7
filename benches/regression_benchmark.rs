//! Benchmarks for the survey pipeline: encoding, correlation and OLS fitting
//!
//! Run with: cargo bench --bench regression_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use smsurvey::pipeline::{correlation_matrix, encode_dataset, run_regression, RegressionSpec};

const ANSWERS: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly Agree",
];

/// Survey-shaped frame: `n_questions` Likert text columns plus one outcome
/// that depends on the first question. About 2% of answers are missing.
fn generate_survey(n_rows: usize, n_questions: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut columns: Vec<Column> = Vec::with_capacity(n_questions + 1);

    let answers: Vec<Vec<usize>> = (0..n_questions)
        .map(|_| (0..n_rows).map(|_| rng.gen_range(0..ANSWERS.len())).collect())
        .collect();

    for (q, picks) in answers.iter().enumerate() {
        let values: Vec<Option<&str>> = picks
            .iter()
            .map(|&i| {
                if rng.gen::<f64>() < 0.02 {
                    None
                } else {
                    Some(ANSWERS[i])
                }
            })
            .collect();
        columns.push(Column::new(format!("Question {}", q + 1).into(), values));
    }

    let outcome: Vec<f64> = answers[0]
        .iter()
        .map(|&i| i as f64 * 0.8 + rng.gen::<f64>() * 2.0)
        .collect();
    columns.push(Column::new("Usage Score".into(), outcome));

    DataFrame::new(columns).expect("Failed to create DataFrame")
}

fn question_codes(n_questions: usize) -> Vec<String> {
    (1..=n_questions)
        .map(|q| format!("Question {}_Code", q))
        .collect()
}

/// Encoding cost as the number of text columns grows
fn benchmark_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding_by_columns");
    group.sample_size(30);

    let n_rows = 10_000;
    for n_questions in [5, 20, 50] {
        let df = generate_survey(n_rows, n_questions, 42);
        group.throughput(Throughput::Elements((n_rows * n_questions) as u64));

        group.bench_with_input(BenchmarkId::new("encode", n_questions), &df, |b, df| {
            b.iter(|| {
                let _ = encode_dataset(black_box(df));
            });
        });
    }

    group.finish();
}

/// OLS fit cost for varying predictor counts
fn benchmark_regression(c: &mut Criterion) {
    let mut group = c.benchmark_group("ols_by_predictors");
    group.sample_size(30);

    let n_rows = 10_000;
    for n_predictors in [2, 5, 10, 25] {
        let df = generate_survey(n_rows, n_predictors, 7);
        let encoded = encode_dataset(&df).expect("encoding failed").frame;

        let predictors = question_codes(n_predictors);
        let predictor_refs: Vec<&str> = predictors.iter().map(String::as_str).collect();
        let spec = RegressionSpec::new("bench", &predictor_refs, "Usage Score");

        group.bench_with_input(
            BenchmarkId::new("fit", n_predictors),
            &(&encoded, &spec),
            |b, (df, spec)| {
                b.iter(|| {
                    let _ = run_regression(black_box(*df), black_box(*spec));
                });
            },
        );
    }

    group.finish();
}

/// Correlation matrix cost over the encoded code columns
fn benchmark_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_by_columns");
    group.sample_size(20);

    let n_rows = 10_000;
    for n_questions in [10, 25, 50] {
        let df = generate_survey(n_rows, n_questions, 11);
        let encoded = encode_dataset(&df).expect("encoding failed").frame;
        let codes = encoded
            .select(question_codes(n_questions))
            .expect("code columns missing");

        group.throughput(Throughput::Elements(
            ((n_questions * (n_questions - 1)) / 2) as u64,
        ));
        group.bench_with_input(
            BenchmarkId::new("pearson", n_questions),
            &codes,
            |b, codes| {
                b.iter(|| {
                    let _ = correlation_matrix(black_box(codes));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_encoding,
    benchmark_regression,
    benchmark_correlation
);
criterion_main!(benches);
