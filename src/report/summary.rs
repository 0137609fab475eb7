//! Encoding summary and legend listings

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{legend_table_name, Codebook, LegendTable};

/// Per-column outcome of the encoding stage
#[derive(Debug, Clone)]
pub struct EncodedColumnSummary {
    pub column: String,
    pub table_name: String,
    pub distinct: usize,
    pub missing: usize,
}

/// Summary of one encoder run
#[derive(Debug, Default)]
pub struct EncodingSummary {
    pub rows: usize,
    pub input_columns: usize,
    pub output_columns: usize,
    pub columns: Vec<EncodedColumnSummary>,
}

impl EncodingSummary {
    pub fn new(rows: usize, input_columns: usize) -> Self {
        Self {
            rows,
            input_columns,
            output_columns: input_columns,
            ..Default::default()
        }
    }

    pub fn add_column(&mut self, codebook: &Codebook, missing: usize) {
        self.columns.push(EncodedColumnSummary {
            column: codebook.column().to_string(),
            table_name: legend_table_name(codebook.column()),
            distinct: codebook.len(),
            missing,
        });
    }

    pub fn set_output_columns(&mut self, output_columns: usize) {
        self.output_columns = output_columns;
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Column").add_attribute(Attribute::Bold),
            Cell::new("Legend Table").add_attribute(Attribute::Bold),
            Cell::new("Codes").add_attribute(Attribute::Bold),
            Cell::new("Missing (0)").add_attribute(Attribute::Bold),
        ]);

        for col in &self.columns {
            table.add_row(vec![
                Cell::new(&col.column),
                Cell::new(&col.table_name).fg(if col.table_name == col.column {
                    Color::White
                } else {
                    Color::Yellow
                }),
                Cell::new(if col.distinct == 0 {
                    "-".to_string()
                } else {
                    format!("1..{}", col.distinct)
                }),
                Cell::new(col.missing).fg(if col.missing == 0 {
                    Color::White
                } else {
                    Color::Red
                }),
            ]);
        }

        for idx in 2..=3 {
            if let Some(column) = table.column_mut(idx) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("ENCODING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!("      Rows:            {}", self.rows);
        println!(
            "      Columns:         {} → {}",
            self.input_columns, self.output_columns
        );
        println!(
            "      Text columns:    {}",
            style(self.columns.len()).yellow().bold()
        );
        println!();

        if self.columns.is_empty() {
            return;
        }

        // Indent the table
        for line in self.table().to_string().lines() {
            println!("    {}", line);
        }
    }
}

/// Render one legend table as `Code | Label`
pub fn legend_table(table: &LegendTable) -> Table {
    let codebook = &table.codebook;
    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);
    out.set_header(vec![
        Cell::new(codebook.code_column_name()).add_attribute(Attribute::Bold),
        Cell::new(codebook.column()).add_attribute(Attribute::Bold),
    ]);
    for (code, label) in codebook.iter() {
        out.add_row(vec![Cell::new(code), Cell::new(label)]);
    }
    if let Some(column) = out.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    out
}
