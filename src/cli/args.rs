//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_RAW_DATA: &str = "data/raw/social_media_raw.csv";
pub const DEFAULT_ENCODED_DATA: &str = "data/processed/social_media_encoded.csv";
pub const DEFAULT_LEGEND: &str = "data/metadata/encoding_legend.zip";
pub const DEFAULT_CORRELATION_TABLE: &str = "results/data/correlation_matrix.csv";

/// smsurvey - Encode social media survey responses, explore correlations and fit OLS models
#[derive(Parser, Debug)]
#[command(name = "smsurvey")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase diagnostic log verbosity (-v info, -vv debug, -vvv trace).
    /// RUST_LOG overrides this when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for a full table scan.
    #[arg(long, default_value = "10000", global = true, value_parser = validate_infer_schema_length)]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assign integer codes to every text column and write the code legend
    Encode {
        /// Raw survey dataset (CSV or Parquet)
        #[arg(short, long, default_value = DEFAULT_RAW_DATA)]
        input: PathBuf,

        /// Encoded dataset output (CSV or Parquet, determined by extension)
        #[arg(short, long, default_value = DEFAULT_ENCODED_DATA)]
        output: PathBuf,

        /// Legend bundle output (zip archive, one CSV table per text column)
        #[arg(short, long, default_value = DEFAULT_LEGEND)]
        legend: PathBuf,
    },

    /// Compute pairwise correlations of numeric columns and draw a heatmap
    Correlate {
        /// Numeric table (CSV or Parquet)
        #[arg(short, long, default_value = DEFAULT_CORRELATION_TABLE)]
        input: PathBuf,

        /// Optional CSV/Parquet file to write the correlation matrix to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fit OLS models on the encoded dataset and print their reports
    Regress {
        /// Encoded dataset (CSV or Parquet)
        #[arg(short, long, default_value = DEFAULT_ENCODED_DATA)]
        input: PathBuf,

        /// JSON file with model definitions; defaults to the three built-in survey models
        #[arg(short, long)]
        models: Option<PathBuf>,

        /// Write fitted results to a JSON file
        #[arg(long)]
        export_json: Option<PathBuf>,
    },

    /// Print the tables of a legend bundle
    Legend {
        /// Legend bundle to read
        #[arg(short, long, default_value = DEFAULT_LEGEND)]
        legend: PathBuf,

        /// Only show the table for this column (original name or table name)
        #[arg(short, long)]
        column: Option<String>,
    },
}

/// Validator for infer_schema_length; rejects negative and non-integer input
fn validate_infer_schema_length(s: &str) -> Result<usize, String> {
    s.parse::<usize>()
        .map_err(|_| format!("'{}' is not a valid row count", s))
}
