//! smsurvey: social media survey analysis CLI
//!
//! Three independent batch stages (encode, correlate, regress) plus a legend
//! viewer. Every stage runs with built-in default paths when given no flags.

use anyhow::Result;
use clap::Parser;

use smsurvey::cli::{correlate, encode, legend, regress, Cli, Commands};
use smsurvey::utils::{init_logging, print_banner};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    if !matches!(cli.command, Commands::Legend { .. }) {
        print_banner(env!("CARGO_PKG_VERSION"));
    }

    match &cli.command {
        Commands::Encode {
            input,
            output,
            legend,
        } => encode::run_encode(input, output, legend, cli.infer_schema_length),
        Commands::Correlate { input, output } => {
            correlate::run_correlate(input, output.as_deref(), cli.infer_schema_length)
        }
        Commands::Regress {
            input,
            models,
            export_json,
        } => regress::run_regress(
            input,
            models.as_deref(),
            export_json.as_deref(),
            cli.infer_schema_length,
        ),
        Commands::Legend {
            legend: bundle,
            column,
        } => legend::run_legend(bundle, column.as_deref()),
    }
}
