//! `encode` command: code every text column and write the legend bundle

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::pipeline::{encode_dataset, load_dataset, save_dataset, write_legend, MISSING_CODE};
use crate::report::EncodingSummary;
use crate::utils::{
    create_spinner, finish_with_failure, finish_with_success, print_completion, print_count,
    print_info, print_paths, print_step_header,
};

/// Run the encoder stage.
///
/// The input is read once and never modified; the encoded copy and the legend
/// are written to their own destinations.
pub fn run_encode(
    input: &Path,
    output: &Path,
    legend: &Path,
    infer_schema_length: usize,
) -> Result<()> {
    print_paths(
        "Encode survey responses",
        &[("Input", input), ("Output", output), ("Legend", legend)],
    );

    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...");
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
    tracing::debug!(elapsed_ms = step_start.elapsed().as_millis() as u64, "load step");

    print_step_header(2, "Encode Text Columns");
    let encoded = encode_dataset(&df)?;
    let mut summary = EncodingSummary::new(df.height(), df.width());

    if encoded.codebooks.is_empty() {
        print_info("No text columns found; the dataset is written unchanged");
    } else {
        print_count("text column(s)", encoded.codebooks.len(), None);
    }

    for codebook in &encoded.codebooks {
        let missing = encoded
            .frame
            .column(&codebook.code_column_name())?
            .u32()?
            .iter()
            .filter(|code| *code == Some(MISSING_CODE))
            .count();
        summary.add_column(codebook, missing);
    }

    let mut frame = encoded.frame;
    summary.set_output_columns(frame.width());

    print_step_header(3, "Save Results");
    let spinner = create_spinner("Writing legend...");
    if let Err(e) = write_legend(legend, &encoded.codebooks) {
        finish_with_failure(&spinner);
        return Err(e);
    }
    finish_with_success(&spinner, &format!("Legend saved to {}", legend.display()));

    let spinner = create_spinner("Writing encoded dataset...");
    if let Err(e) = save_dataset(&mut frame, output) {
        finish_with_failure(&spinner);
        return Err(e);
    }
    finish_with_success(&spinner, &format!("Saved to {}", output.display()));

    summary.display();
    print_completion("Encoding");

    Ok(())
}
