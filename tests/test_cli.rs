//! Tests for CLI argument parsing and end-to-end runs of the binary

use assert_cmd::Command;
use clap::Parser;
use predicates::prelude::*;
use smsurvey::cli::{
    Cli, Commands, DEFAULT_CORRELATION_TABLE, DEFAULT_ENCODED_DATA, DEFAULT_LEGEND,
    DEFAULT_RAW_DATA,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RAW_SURVEY: &str = "\
Social Media Use,Break,Affects Sleep,Age
Daily,Yes,Often,21
Weekly,No,Never,34
Daily,Yes,Sometimes,19
Rarely,No,Never,45
Daily,No,Often,28
Weekly,Yes,Sometimes,52
Rarely,No,Never,39
Daily,Yes,Often,23
Weekly,No,Sometimes,31
Daily,Yes,Never,26
";

const MODELS: &str = r#"[
    {
        "label": "Model A: Habits",
        "predictors": ["Break_Code", "Affects Sleep_Code"],
        "outcome": "Social Media Use_Code"
    },
    {
        "label": "Model B: Unavailable",
        "predictors": ["Missing_Code"],
        "outcome": "Social Media Use_Code"
    }
]"#;

fn smsurvey() -> Command {
    Command::cargo_bin("smsurvey").unwrap()
}

fn write_raw_survey(dir: &Path) -> PathBuf {
    let path = dir.join("raw.csv");
    std::fs::write(&path, RAW_SURVEY).unwrap();
    path
}

#[test]
fn test_cli_encode_defaults() {
    let cli = Cli::parse_from(["smsurvey", "encode"]);

    match cli.command {
        Commands::Encode {
            input,
            output,
            legend,
        } => {
            assert_eq!(input, PathBuf::from(DEFAULT_RAW_DATA));
            assert_eq!(output, PathBuf::from(DEFAULT_ENCODED_DATA));
            assert_eq!(legend, PathBuf::from(DEFAULT_LEGEND));
        }
        other => panic!("unexpected command: {:?}", other),
    }
    assert_eq!(cli.verbose, 0);
    assert_eq!(
        cli.infer_schema_length, 10000,
        "Default schema inference should be 10000"
    );
}

#[test]
fn test_cli_correlate_and_regress_defaults() {
    let cli = Cli::parse_from(["smsurvey", "correlate"]);
    match cli.command {
        Commands::Correlate { input, output } => {
            assert_eq!(input, PathBuf::from(DEFAULT_CORRELATION_TABLE));
            assert!(output.is_none());
        }
        other => panic!("unexpected command: {:?}", other),
    }

    let cli = Cli::parse_from(["smsurvey", "regress"]);
    match cli.command {
        Commands::Regress {
            input,
            models,
            export_json,
        } => {
            assert_eq!(input, PathBuf::from(DEFAULT_ENCODED_DATA));
            assert!(models.is_none());
            assert!(export_json.is_none());
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_cli_global_flags_after_subcommand() {
    let cli = Cli::parse_from([
        "smsurvey",
        "regress",
        "-i",
        "encoded.parquet",
        "-vv",
        "--infer-schema-length",
        "0",
    ]);

    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.infer_schema_length, 0);
}

#[test]
fn test_cli_rejects_invalid_schema_length() {
    let result = Cli::try_parse_from(["smsurvey", "encode", "--infer-schema-length", "-5"]);
    assert!(result.is_err(), "Negative schema length should be rejected");

    let result = Cli::try_parse_from(["smsurvey", "encode", "--infer-schema-length", "many"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["smsurvey"]).is_err());
}

#[test]
fn test_encode_regress_legend_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let raw = write_raw_survey(temp_dir.path());
    let encoded = temp_dir.path().join("processed").join("encoded.csv");
    let legend = temp_dir.path().join("metadata").join("legend.zip");
    let models = temp_dir.path().join("models.json");
    let export = temp_dir.path().join("results").join("regression.json");
    std::fs::write(&models, MODELS).unwrap();

    smsurvey()
        .arg("encode")
        .arg("-i")
        .arg(&raw)
        .arg("-o")
        .arg(&encoded)
        .arg("-l")
        .arg(&legend)
        .assert()
        .success()
        .stdout(predicate::str::contains("Encoding"));

    assert!(encoded.exists());
    assert!(legend.exists());
    let header = std::fs::read_to_string(&encoded).unwrap();
    assert!(header
        .lines()
        .next()
        .unwrap()
        .ends_with("Social Media Use_Code,Break_Code,Affects Sleep_Code"));

    smsurvey()
        .arg("regress")
        .arg("-i")
        .arg(&encoded)
        .arg("-m")
        .arg(&models)
        .arg("--export-json")
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("RUNNING: Model A: Habits"))
        .stdout(predicate::str::contains("Summary Stats"))
        .stdout(predicate::str::contains("Observations      : 10"))
        .stdout(predicate::str::contains("RUNNING: Model B: Unavailable"))
        .stdout(predicate::str::contains(
            "Error: Column not found in dataset: Missing_Code",
        ));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(json["metadata"]["models_fitted"], 1);
    assert_eq!(json["metadata"]["models_skipped"], 1);

    smsurvey()
        .arg("legend")
        .arg("-l")
        .arg(&legend)
        .arg("-c")
        .arg("Affects Sleep")
        .assert()
        .success()
        .stdout(predicate::str::contains("Affects Sleep_Code"))
        .stdout(predicate::str::contains("Sometimes"))
        .stdout(predicate::str::contains("Break").not());
}

#[test]
fn test_correlate_writes_matrix() {
    let temp_dir = TempDir::new().unwrap();
    let table = temp_dir.path().join("numeric.csv");
    let output = temp_dir.path().join("out").join("matrix.csv");
    std::fs::write(&table, "a,b,c\n1,2,9\n2,4,7\n3,5,8\n4,8,1\n").unwrap();

    smsurvey()
        .arg("correlate")
        .arg("-i")
        .arg(&table)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Correlation Heatmap"));

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("Variable,a,b,c"));
    assert_eq!(written.lines().count(), 4);
}

#[test]
fn test_regress_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();

    smsurvey()
        .arg("regress")
        .arg("-i")
        .arg(temp_dir.path().join("absent.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_legend_unknown_column_fails() {
    let temp_dir = TempDir::new().unwrap();
    let raw = write_raw_survey(temp_dir.path());
    let legend = temp_dir.path().join("legend.zip");

    smsurvey()
        .arg("encode")
        .arg("-i")
        .arg(&raw)
        .arg("-o")
        .arg(temp_dir.path().join("encoded.csv"))
        .arg("-l")
        .arg(&legend)
        .assert()
        .success();

    smsurvey()
        .arg("legend")
        .arg("-l")
        .arg(&legend)
        .arg("-c")
        .arg("Nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in legend"));
}
