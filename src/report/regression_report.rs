//! Plain-text regression reports
//!
//! A report is a labeled header, a summary-statistics block and a
//! coefficients table with the intercept first.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};

use crate::pipeline::{OlsFit, RegressionError};

/// p-values below this are shown as `< 0.001`
pub const P_VALUE_FLOOR: f64 = 0.001;

/// Conventional significance level, used only to highlight rows
const SIGNIFICANCE: f64 = 0.05;

/// Format a coefficient or standard error with 4 decimals
pub fn format_coefficient(value: f64) -> String {
    let formatted = format!("{:.4}", value);
    // Rounding a tiny negative value to 4 decimals must not print a sign
    if formatted == "-0.0000" {
        "0.0000".to_string()
    } else {
        formatted
    }
}

/// Format a p-value: `< 0.001` below the floor, 4 decimals otherwise
pub fn format_p_value(p: f64) -> String {
    if p.is_nan() {
        "NaN".to_string()
    } else if p < P_VALUE_FLOOR {
        "< 0.001".to_string()
    } else {
        format!("{:.4}", p)
    }
}

/// Header line announcing a model
pub fn render_header(label: &str) -> String {
    format!("{} RUNNING: {} {}", "=".repeat(20), label, "=".repeat(20))
}

/// Summary statistics block
pub fn render_summary(fit: &OlsFit) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} Summary Stats {}\n", "=".repeat(5), "=".repeat(6)));
    out.push_str(&format!("Multiple R        : {:.4}\n", fit.multiple_r));
    out.push_str(&format!("R Square          : {:.4}\n", fit.r_squared));
    out.push_str(&format!("Adjusted R Square : {:.4}\n", fit.adj_r_squared));
    out.push_str(&format!("Standard Error    : {:.4}\n", fit.std_error));
    out.push_str(&format!("Observations      : {}\n", fit.observations));
    out
}

/// Coefficients table: Variable, Coefficient, Std Error, P-Value
pub fn coefficient_table(fit: &OlsFit) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Variable").add_attribute(Attribute::Bold),
        Cell::new("Coefficient").add_attribute(Attribute::Bold),
        Cell::new("Std Error").add_attribute(Attribute::Bold),
        Cell::new("P-Value").add_attribute(Attribute::Bold),
    ]);

    for coef in &fit.coefficients {
        let p_cell = Cell::new(format_p_value(coef.p_value));
        let p_cell = if coef.p_value < SIGNIFICANCE {
            p_cell.fg(Color::Green)
        } else {
            p_cell
        };
        table.add_row(vec![
            Cell::new(&coef.variable),
            Cell::new(format_coefficient(coef.estimate)),
            Cell::new(format_coefficient(coef.std_error)),
            p_cell,
        ]);
    }

    for idx in 1..=3 {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table
}

/// Full report for a fitted model
pub fn render_report(label: &str, fit: &OlsFit) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&render_header(label));
    out.push_str("\n\n");
    out.push_str(&render_summary(fit));
    out.push('\n');
    out.push_str(&format!(
        "{} Coefficients Table {}\n",
        "=".repeat(24),
        "=".repeat(24)
    ));
    out.push_str(&coefficient_table(fit).to_string());
    out.push('\n');
    out
}

/// Report for a model that could not be fit
pub fn render_failure(label: &str, err: &RegressionError) -> String {
    format!("\n{}\n\nError: {}\n", render_header(label), err)
}
