//! `legend` command: print the code tables of a legend bundle

use std::path::Path;

use anyhow::Result;
use console::style;

use crate::pipeline::{read_legend, LegendTable};
use crate::report::legend_table;

/// Find the table for `column`, by original column name or by table name
pub fn find_table<'a>(tables: &'a [LegendTable], column: &str) -> Option<&'a LegendTable> {
    tables
        .iter()
        .find(|t| t.codebook.column() == column)
        .or_else(|| tables.iter().find(|t| t.name == column))
}

/// Print one or all legend tables
pub fn run_legend(legend: &Path, column: Option<&str>) -> Result<()> {
    let tables = read_legend(legend)?;

    let selected: Vec<&LegendTable> = match column {
        Some(name) => {
            let table = find_table(&tables, name).ok_or_else(|| {
                anyhow::anyhow!(
                    "Column '{}' not found in legend {}. Available tables: {:?}",
                    name,
                    legend.display(),
                    tables.iter().map(|t| t.name.as_str()).collect::<Vec<_>>()
                )
            })?;
            vec![table]
        }
        None => tables.iter().collect(),
    };

    for table in selected {
        println!();
        println!(
            "    {} {}",
            style(&table.name).cyan().bold(),
            style(format!("({} codes)", table.codebook.len())).dim()
        );
        for line in legend_table(table).to_string().lines() {
            println!("    {}", line);
        }
    }
    println!();

    Ok(())
}
