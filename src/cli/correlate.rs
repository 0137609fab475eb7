//! `correlate` command: correlation matrix and terminal heatmap

use std::path::Path;

use anyhow::Result;

use crate::pipeline::{correlation_matrix, load_dataset, save_dataset};
use crate::report::render_heatmap;
use crate::utils::{
    create_spinner, finish_with_failure, finish_with_success, print_completion, print_paths,
    print_success, print_warning,
};

/// Run the correlation visualizer stage
pub fn run_correlate(input: &Path, output: Option<&Path>, infer_schema_length: usize) -> Result<()> {
    let mut entries = vec![("Input", input)];
    if let Some(path) = output {
        entries.push(("Output", path));
    }
    print_paths("Correlation heatmap", &entries);

    println!();
    let spinner = create_spinner("Reading table...");
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

    let matrix = correlation_matrix(&df)?;
    if matrix.len() < 2 {
        print_warning("Fewer than two numeric columns; nothing to correlate");
    }

    println!();
    print!("{}", render_heatmap(&matrix));

    if let Some(path) = output {
        let mut frame = matrix.to_frame()?;
        save_dataset(&mut frame, path)?;
        print_success(&format!("Correlation matrix saved to {}", path.display()));
    }

    print_completion("Correlation");
    Ok(())
}
