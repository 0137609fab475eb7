//! Categorical encoding of text columns
//!
//! Every text-valued column gets its own [`Codebook`]: the distinct non-missing
//! values in sorted order are numbered `1..=K`, and code `0` stands for a
//! missing value. The encoded dataset keeps the original text columns and adds
//! one `<Column>_Code` column per text column.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use polars::prelude::*;

/// Suffix appended to a text column's name to form its code column
pub const CODE_SUFFIX: &str = "_Code";

/// Code used for missing values; never appears in a legend
pub const MISSING_CODE: u32 = 0;

/// Mapping between the distinct values of one text column and their codes.
///
/// Labels are stored sorted; the code of a label is its position plus one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebook {
    column: String,
    labels: Vec<String>,
}

impl Codebook {
    /// Build a codebook from a column's values. `None` entries are missing and
    /// do not receive a code.
    pub fn from_values<'a, I>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().flatten().collect();
        Self {
            column: column.into(),
            labels: distinct.into_iter().map(str::to_string).collect(),
        }
    }

    /// Rebuild a codebook from `(code, label)` pairs, e.g. a legend read back
    /// from disk. Codes must be exactly `1..=K` once each.
    pub fn from_pairs(column: impl Into<String>, mut pairs: Vec<(u32, String)>) -> Result<Self> {
        let column = column.into();
        pairs.sort_by_key(|(code, _)| *code);

        for (expected, (code, label)) in (1u32..).zip(pairs.iter()) {
            if *code != expected {
                anyhow::bail!(
                    "Legend for '{}' is not contiguous: expected code {} but found {} ('{}')",
                    column,
                    expected,
                    code,
                    label
                );
            }
        }

        Ok(Self {
            column,
            labels: pairs.into_iter().map(|(_, label)| label).collect(),
        })
    }

    /// Name of the original text column
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Name of the generated code column, `<Column>_Code`
    pub fn code_column_name(&self) -> String {
        format!("{}{}", self.column, CODE_SUFFIX)
    }

    /// Number of distinct (coded) values
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Code assigned to `label`, if it was observed
    pub fn code_of(&self, label: &str) -> Option<u32> {
        self.labels
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
            .map(|idx| idx as u32 + 1)
    }

    /// Label for `code`; `None` for code 0 and for codes past the end
    pub fn label_of(&self, code: u32) -> Option<&str> {
        if code == MISSING_CODE {
            return None;
        }
        self.labels.get(code as usize - 1).map(String::as_str)
    }

    /// Iterate over `(code, label)` pairs in ascending code order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        (1u32..).zip(self.labels.iter().map(String::as_str))
    }

    /// Map each value to its code; missing and unknown values map to 0
    pub fn encode<'a, I>(&self, values: I) -> Vec<u32>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        values
            .into_iter()
            .map(|v| v.and_then(|s| self.code_of(s)).unwrap_or(MISSING_CODE))
            .collect()
    }

    /// Render the codebook as a two-column legend table
    /// (`<Column>_Code`, `<Column>`), sorted by code.
    pub fn to_legend_frame(&self) -> Result<DataFrame> {
        let codes: Vec<u32> = self.iter().map(|(code, _)| code).collect();
        let labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();

        DataFrame::new(vec![
            Column::new(self.code_column_name().into(), codes),
            Column::new(self.column.as_str().into(), labels),
        ])
        .with_context(|| format!("Failed to build legend table for '{}'", self.column))
    }
}

/// Result of encoding a dataset
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    /// Original columns followed by (or updated with) the `_Code` columns
    pub frame: DataFrame,
    /// One codebook per text column, in column order
    pub codebooks: Vec<Codebook>,
}

/// Names of all text-typed columns that hold at least one value, in dataset
/// order. A column with no values at all carries no categories and is left
/// unencoded.
pub fn text_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| matches!(col.dtype(), DataType::String))
        .filter(|col| col.null_count() < col.len().max(1))
        .map(|col| col.name().to_string())
        .collect()
}

fn text_values(df: &DataFrame, column: &str) -> Result<StringChunked> {
    let values = df
        .column(column)
        .with_context(|| format!("Column '{}' not found", column))?
        .as_materialized_series()
        .str()
        .with_context(|| format!("Column '{}' is not a text column", column))?
        .clone();
    Ok(values)
}

/// Encode every text column of `df`.
///
/// The input frame is not modified; a new frame is returned. An existing
/// `<Column>_Code` column is replaced in place, so re-encoding an already
/// encoded file yields the same result.
pub fn encode_dataset(df: &DataFrame) -> Result<EncodedDataset> {
    let mut frame = df.clone();
    let mut codebooks = Vec::new();

    for column in text_columns(df) {
        let values = text_values(df, &column)?;
        let codebook = Codebook::from_values(column.as_str(), values.iter());
        let codes = codebook.encode(values.iter());

        tracing::debug!(
            column = %column,
            distinct = codebook.len(),
            missing = codes.iter().filter(|&&c| c == MISSING_CODE).count(),
            "encoded text column"
        );

        frame
            .with_column(Column::new(codebook.code_column_name().into(), codes))
            .with_context(|| format!("Failed to add code column for '{}'", column))?;
        codebooks.push(codebook);
    }

    Ok(EncodedDataset { frame, codebooks })
}
