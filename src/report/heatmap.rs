//! Terminal heatmap for a correlation matrix

use console::style;

use crate::pipeline::CorrelationMatrix;

/// 256-color ramp for negative correlations, weakest first
const NEGATIVE_RAMP: [u8; 5] = [153, 117, 75, 33, 21];
/// 256-color ramp for positive correlations, weakest first
const POSITIVE_RAMP: [u8; 5] = [224, 217, 210, 203, 160];
const NEUTRAL: u8 = 255;
const UNDEFINED: u8 = 244;

const LABEL_WIDTH: usize = 24;
const CELL_WIDTH: usize = 7;

/// Background color for a correlation value (coolwarm-style diverging scale)
pub fn heat_color(r: f64) -> u8 {
    if r.is_nan() {
        return UNDEFINED;
    }
    let magnitude = r.abs().min(1.0);
    if magnitude < 0.1 {
        return NEUTRAL;
    }
    let bucket = (((magnitude - 0.1) / 0.9) * NEGATIVE_RAMP.len() as f64) as usize;
    let bucket = bucket.min(NEGATIVE_RAMP.len() - 1);
    if r < 0.0 {
        NEGATIVE_RAMP[bucket]
    } else {
        POSITIVE_RAMP[bucket]
    }
}

/// Render the heatmap: one row per variable, columns numbered to keep the
/// grid narrow, followed by a key mapping numbers to variable names.
pub fn render_heatmap(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    out.push_str(&format!("    {}\n\n", style("Correlation Heatmap").white().bold()));

    if matrix.is_empty() {
        out.push_str("    (no numeric columns)\n");
        return out;
    }

    out.push_str(&format!("    {:<width$}", "", width = LABEL_WIDTH + 6));
    for j in 0..matrix.len() {
        out.push_str(&format!("{:>width$}", format!("[{}]", j + 1), width = CELL_WIDTH));
    }
    out.push('\n');

    for (i, name) in matrix.names.iter().enumerate() {
        out.push_str(&format!(
            "    {:>4} {:<width$} ",
            format!("[{}]", i + 1),
            fit_label(name, LABEL_WIDTH),
            width = LABEL_WIDTH
        ));
        for j in 0..matrix.len() {
            let r = matrix.values[(i, j)];
            let text = if r.is_nan() {
                format!("{:>width$}", "nan", width = CELL_WIDTH)
            } else {
                format!("{:>width$.2}", r, width = CELL_WIDTH)
            };
            out.push_str(&style(text).black().on_color256(heat_color(r)).to_string());
        }
        out.push('\n');
    }

    out
}

fn fit_label(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let head: String = name.chars().take(width - 1).collect();
        format!("{}…", head)
    }
}
