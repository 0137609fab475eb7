//! `regress` command: fit every model and print its report

use std::path::Path;

use anyhow::Result;
use console::style;

use crate::pipeline::{builtin_specs, load_dataset, load_specs, run_all, RegressionSpec};
use crate::report::{export_results, render_failure, render_report};
use crate::utils::{
    create_spinner, finish_with_failure, finish_with_success, print_completion, print_info,
    print_paths, print_success, print_warning,
};

/// Run the regression reporter stage.
///
/// A model that cannot be fit is reported and skipped; only I/O failures
/// abort the stage.
pub fn run_regress(
    input: &Path,
    models: Option<&Path>,
    export_json: Option<&Path>,
    infer_schema_length: usize,
) -> Result<()> {
    let mut entries = vec![("Input", input)];
    if let Some(path) = models {
        entries.push(("Models", path));
    }
    if let Some(path) = export_json {
        entries.push(("Export", path));
    }
    print_paths("Regression models", &entries);

    let specs: Vec<RegressionSpec> = match models {
        Some(path) => load_specs(path)?,
        None => builtin_specs(),
    };

    println!();
    let spinner = create_spinner("Reading encoded dataset...");
    let df = match load_dataset(input, infer_schema_length) {
        Ok(df) => df,
        Err(e) => {
            finish_with_failure(&spinner);
            return Err(e);
        }
    };
    finish_with_success(
        &spinner,
        &format!("Loaded {} rows × {} columns", df.height(), df.width()),
    );
    print_info(&format!("Fitting {} model(s)", specs.len()));

    let outcomes = run_all(&df, &specs);

    for outcome in &outcomes {
        match &outcome.result {
            Ok(fit) => {
                print!("{}", render_report(&outcome.spec.label, fit));
                if fit.dropped_rows > 0 {
                    println!(
                        "{}",
                        style(format!(
                            "({} incomplete row(s) dropped)",
                            fit.dropped_rows
                        ))
                        .dim()
                    );
                }
                println!();
            }
            Err(e) => {
                print!("{}", render_failure(&outcome.spec.label, e));
                println!();
            }
        }
    }

    let skipped = outcomes.iter().filter(|o| o.result.is_err()).count();
    if skipped > 0 {
        print_warning(&format!("{} of {} model(s) skipped", skipped, outcomes.len()));
    }

    if let Some(path) = export_json {
        export_results(path, &input.display().to_string(), &outcomes)?;
        print_success(&format!("Results exported to {}", path.display()));
    }

    print_completion("Regression");
    Ok(())
}
