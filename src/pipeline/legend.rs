//! Legend bundle: one `(code, label)` table per encoded column
//!
//! The legend is written as a zip archive with one CSV entry per text column,
//! in column order. Each entry is named after its column, cleaned of the
//! characters spreadsheet sheet names reject and truncated to
//! [`MAX_TABLE_NAME_LEN`] characters, so the bundle converts one-to-one into
//! a workbook.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use thiserror::Error;

use super::encoder::Codebook;
use super::loader::ensure_parent_dir;

/// Maximum length of a legend table identifier
pub const MAX_TABLE_NAME_LEN: usize = 31;

const ENTRY_EXTENSION: &str = ".csv";

/// Errors specific to building a legend bundle
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LegendError {
    /// Two distinct columns map to the same table identifier once cleaned and truncated
    #[error("legend table name '{table}' is shared by columns '{first}' and '{second}'")]
    DuplicateTableName {
        table: String,
        first: String,
        second: String,
    },
}

/// One legend table read back from a bundle
#[derive(Debug, Clone)]
pub struct LegendTable {
    /// Table identifier (entry name without extension)
    pub name: String,
    /// Codebook reconstructed from the table rows
    pub codebook: Codebook,
}

/// Table identifier for a column: invalid characters replaced with `_`,
/// then truncated to 31 characters.
pub fn legend_table_name(column: &str) -> String {
    column
        .chars()
        .map(|c| match c {
            '/' | '\\' | '?' | '*' | '[' | ']' | ':' => '_',
            other => other,
        })
        .take(MAX_TABLE_NAME_LEN)
        .collect()
}

/// Assign a table identifier to every codebook, rejecting collisions.
///
/// Identifiers are compared case-insensitively, as sheet names are.
pub fn plan_legend_tables(codebooks: &[Codebook]) -> Result<Vec<(String, &Codebook)>, LegendError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut planned = Vec::with_capacity(codebooks.len());

    for codebook in codebooks {
        let table = legend_table_name(codebook.column());
        let key = table.to_lowercase();
        if let Some(first) = seen.get(&key) {
            return Err(LegendError::DuplicateTableName {
                table,
                first: first.to_string(),
                second: codebook.column().to_string(),
            });
        }
        seen.insert(key, codebook.column());
        planned.push((table, codebook));
    }

    Ok(planned)
}

/// Write the legend bundle for `codebooks` to `path`.
pub fn write_legend(path: &Path, codebooks: &[Codebook]) -> Result<()> {
    use ::zip::write::SimpleFileOptions;
    use ::zip::ZipWriter;

    let planned = plan_legend_tables(codebooks)?;
    ensure_parent_dir(path)?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create legend file: {}", path.display()))?;
    let mut writer = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(::zip::CompressionMethod::Deflated);

    for (table, codebook) in planned {
        let mut frame = codebook.to_legend_frame()?;
        let mut buffer: Vec<u8> = Vec::new();
        CsvWriter::new(&mut buffer)
            .finish(&mut frame)
            .with_context(|| format!("Failed to render legend table '{}'", table))?;

        let entry_name = format!("{}{}", table, ENTRY_EXTENSION);
        writer.start_file(entry_name.as_str(), options)
            .with_context(|| format!("Failed to add {} to legend archive", entry_name))?;
        writer.write_all(&buffer)?;

        tracing::debug!(table = %table, codes = codebook.len(), "legend table written");
    }

    writer.finish().context("Failed to finalize legend archive")?;
    Ok(())
}

/// Read every legend table from a bundle, in archive order.
pub fn read_legend(path: &Path) -> Result<Vec<LegendTable>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open legend file: {}", path.display()))?;
    let mut archive = ::zip::ZipArchive::new(file)
        .with_context(|| format!("Not a legend archive: {}", path.display()))?;

    let mut tables = Vec::with_capacity(archive.len());
    for idx in 0..archive.len() {
        let mut entry = archive.by_index(idx)?;
        let entry_name = entry.name().to_string();
        let name = entry_name
            .strip_suffix(ENTRY_EXTENSION)
            .unwrap_or(&entry_name)
            .to_string();

        let mut buffer = Vec::new();
        entry
            .read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read legend entry '{}'", entry_name))?;

        let codebook = parse_legend_table(&name, buffer)?;
        tables.push(LegendTable { name, codebook });
    }

    Ok(tables)
}

/// Parse one CSV legend table. Every column is read as text so labels that
/// look numeric stay as written.
fn parse_legend_table(name: &str, csv: Vec<u8>) -> Result<Codebook> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(csv))
        .finish()
        .with_context(|| format!("Failed to parse legend table '{}'", name))?;

    let columns = frame.get_columns();
    if columns.len() != 2 {
        anyhow::bail!(
            "Legend table '{}' must have 2 columns, found {}",
            name,
            columns.len()
        );
    }

    let column = columns[1].name().to_string();
    let codes = columns[0].as_materialized_series().str()?.clone();
    let labels = columns[1].as_materialized_series().str()?.clone();

    let mut pairs = Vec::with_capacity(frame.height());
    for (code, label) in codes.iter().zip(labels.iter()) {
        let code = code
            .and_then(|c| c.trim().parse::<u32>().ok())
            .with_context(|| format!("Legend table '{}' has an invalid code", name))?;
        pairs.push((code, label.unwrap_or_default().to_string()));
    }

    Codebook::from_pairs(column, pairs)
}
