//! JSON export of regression results

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{ensure_parent_dir, ModelOutcome, OlsFit};

/// Metadata about the regression run
#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub smsurvey_version: String,
    pub input_file: String,
    pub models_fitted: usize,
    pub models_skipped: usize,
}

/// Status of a single model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Fitted,
    Skipped,
}

/// One model entry in the export
#[derive(Debug, Serialize)]
pub struct ModelExportEntry {
    pub label: String,
    pub predictors: Vec<String>,
    pub outcome: String,
    pub status: ModelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<OlsFit>,
}

/// Complete export document
#[derive(Debug, Serialize)]
pub struct RegressionExport {
    pub metadata: ExportMetadata,
    pub models: Vec<ModelExportEntry>,
}

/// Build the export document for a batch of model outcomes
pub fn build_export(input_file: &str, outcomes: &[ModelOutcome]) -> RegressionExport {
    let models: Vec<ModelExportEntry> = outcomes
        .iter()
        .map(|outcome| {
            let (status, error, fit) = match &outcome.result {
                Ok(fit) => (ModelStatus::Fitted, None, Some(fit.clone())),
                Err(e) => (ModelStatus::Skipped, Some(e.to_string()), None),
            };
            ModelExportEntry {
                label: outcome.spec.label.clone(),
                predictors: outcome.spec.predictors.clone(),
                outcome: outcome.spec.outcome.clone(),
                status,
                error,
                fit,
            }
        })
        .collect();

    let models_fitted = models
        .iter()
        .filter(|m| m.status == ModelStatus::Fitted)
        .count();

    RegressionExport {
        metadata: ExportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            smsurvey_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.to_string(),
            models_fitted,
            models_skipped: models.len() - models_fitted,
        },
        models,
    }
}

/// Write regression results to a JSON file
pub fn export_results(path: &Path, input_file: &str, outcomes: &[ModelOutcome]) -> Result<()> {
    let export = build_export(input_file, outcomes);
    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize regression results to JSON")?;

    ensure_parent_dir(path)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write regression results to {}", path.display()))?;

    Ok(())
}
