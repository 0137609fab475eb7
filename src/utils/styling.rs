//! Terminal styling utilities for consistent console output

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static BOOK: Emoji<'_, '_> = Emoji("📖 ", "");

const CARD_WIDTH: usize = 56;

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("smsurvey").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Social media survey encoding & regression toolkit").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
}

/// Print a card listing the files a stage reads and writes.
///
/// Each entry is `(label, path)`; labels are padded so the paths line up.
pub fn print_paths(title: &str, entries: &[(&str, &Path)]) {
    let line = "─".repeat(CARD_WIDTH - 2);
    let label_width = entries.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    println!();
    println!("    ┌{}┐", line);
    println!("    │ {}", style(title).cyan().bold());
    println!("    ├{}┤", line);
    for (label, path) in entries {
        let icon = if label.starts_with("Input") {
            &FOLDER
        } else if label.starts_with("Legend") {
            &BOOK
        } else {
            &SAVE
        };
        println!(
            "    │  {}{:<width$} {}",
            icon,
            format!("{}:", label),
            truncate_path(path, 38),
            width = label_width + 1
        );
    }
    println!("    └{}┘", line);
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!(
            "      Found {} {}",
            style(count).yellow().bold(),
            description
        );
    }
}

/// Print the final completion message for a stage
pub fn print_completion(stage: &str) {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style(format!("{} complete!", stage)).green().bold()
    );
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

/// Shorten a string from the left, keeping its tail, so it fits `max_len` characters.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else {
        let keep = max_len.saturating_sub(3);
        let tail: String = s.chars().skip(len - keep).collect();
        format!("...{}", tail)
    }
}
