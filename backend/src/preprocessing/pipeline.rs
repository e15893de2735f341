use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::db::checksum::calculate_checksum;
use crate::error::{CoverageResult, IngestError};
use crate::models::Record;
use crate::parsing::csv_parser;
use crate::preprocessing::validator::{CoverageValidator, ValidationStats};

/// A validated upload, ready for grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    /// SHA-256 of the raw upload, used for deduplication.
    pub checksum: String,
    pub records: Vec<Record>,
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub stats: ValidationStats,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Turns raw CSV content into a [`Dataset`], or the full list of validation
/// errors.
pub struct IngestPipeline;

impl IngestPipeline {
    /// Parse and validate CSV content.
    ///
    /// # Errors
    ///
    /// [`CoverageError::Validation`](crate::error::CoverageError::Validation)
    /// when the content is not parseable CSV, or the table is empty or has
    /// schema, missing-value or type defects.
    pub fn ingest_bytes(name: &str, bytes: &[u8]) -> CoverageResult<Dataset> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(IngestError::EmptyInput.into());
        }

        let df = csv_parser::read_csv_bytes(bytes).map_err(|e| IngestError::Unreadable {
            reason: e.to_string(),
        })?;
        let validation = CoverageValidator::validate_dataframe(&df)?;
        let warnings = validation.warnings.clone();
        let stats = validation.stats.clone();
        let records = validation.into_records()?;

        info!(
            "Ingested '{}': {} records, {} warnings",
            name,
            records.len(),
            warnings.len()
        );

        Ok(Dataset {
            name: name.to_string(),
            checksum: calculate_checksum(bytes),
            records,
            warnings,
            stats,
        })
    }

    /// Read a CSV file from disk and ingest it under its file name.
    pub fn ingest_file(path: &Path) -> CoverageResult<Dataset> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::ingest_bytes(&name, &bytes)
    }
}
