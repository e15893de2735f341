//! Error types for ingestion, grouping and the surrounding services.
//!
//! Validation findings are collected rather than raised one at a time, so
//! callers receive the complete list of defects in an upload. Everything else
//! funnels into [`CoverageError`].

use std::fmt;

/// Result type used across the crate.
pub type CoverageResult<T> = Result<T, CoverageError>;

/// A single defect found while validating an uploaded table.
///
/// Row indices are 0-based data row positions (the header is not counted).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    /// One or more required columns are absent.
    #[error("Column(s) missing: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// Null or empty cells in a required column.
    #[error("Missing values in column '{column}' at rows: {}", join_rows(.rows))]
    MissingValues { column: String, rows: Vec<usize> },

    /// Cells that cannot be read as numbers.
    #[error("Non-numeric values in column '{column}' at rows: {}", join_rows(.rows))]
    NonNumeric { column: String, rows: Vec<usize> },

    /// The content is not parseable CSV (malformed quoting, invalid UTF-8).
    #[error("The uploaded file could not be read as CSV: {reason}")]
    Unreadable { reason: String },

    /// The table has no data rows.
    #[error("The uploaded file is empty. Please upload a valid file with data.")]
    EmptyInput,
}

impl IngestError {
    /// Short machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::MissingColumns { .. } => "SCHEMA_ERROR",
            IngestError::MissingValues { .. } => "MISSING_VALUE",
            IngestError::NonNumeric { .. } => "TYPE_ERROR",
            IngestError::Unreadable { .. } => "PARSE_ERROR",
            IngestError::EmptyInput => "EMPTY_INPUT",
        }
    }
}

fn join_rows(rows: &[usize]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Non-empty list of validation failures for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<IngestError>);

impl ValidationErrors {
    /// Wrap a list of findings. Returns `None` when there is nothing to report.
    pub fn from_errors(errors: Vec<IngestError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn errors(&self) -> &[IngestError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<IngestError> for ValidationErrors {
    fn from(err: IngestError) -> Self {
        Self(vec![err])
    }
}

/// Which metric a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricField {
    Traffic,
    Revenue,
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricField::Traffic => write!(f, "traffic"),
            MetricField::Revenue => write!(f, "revenue"),
        }
    }
}

/// Precondition failures of the coverage grouper.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GroupingError {
    #[error("cannot build coverage groups from an empty record set")]
    EmptyInput,

    /// A record carries a negative, NaN or infinite metric value.
    #[error("invalid {field} value {value} for '{id}' at row {row}: values must be finite and non-negative")]
    InvalidValue {
        row: usize,
        id: String,
        field: MetricField,
        value: f64,
    },

    #[error("invalid thresholds: {0}")]
    InvalidThresholds(String),
}

/// Top-level error for the library.
#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    /// The upload failed validation; nothing was computed.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Grouping error: {0}")]
    Grouping(#[from] GroupingError),

    #[error("CSV error: {0}")]
    Csv(#[from] polars::error::PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoverageError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for failures caused by the uploaded content rather than the system.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Grouping(_))
    }
}

impl From<IngestError> for CoverageError {
    fn from(err: IngestError) -> Self {
        Self::Validation(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_messages() {
        let err = IngestError::MissingColumns {
            columns: vec!["traffic".to_string(), "revenue".to_string()],
        };
        assert_eq!(err.to_string(), "Column(s) missing: traffic, revenue");

        let err = IngestError::MissingValues {
            column: "url".to_string(),
            rows: vec![1, 3],
        };
        assert_eq!(err.to_string(), "Missing values in column 'url' at rows: 1, 3");

        let err = IngestError::NonNumeric {
            column: "revenue".to_string(),
            rows: vec![2],
        };
        assert_eq!(err.to_string(), "Non-numeric values in column 'revenue' at rows: 2");
    }

    #[test]
    fn test_validation_errors_requires_findings() {
        assert!(ValidationErrors::from_errors(vec![]).is_none());
        let errors = ValidationErrors::from_errors(vec![IngestError::EmptyInput]).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].code(), "EMPTY_INPUT");
    }

    #[test]
    fn test_user_error_classification() {
        assert!(CoverageError::from(IngestError::EmptyInput).is_user_error());
        assert!(CoverageError::Grouping(GroupingError::EmptyInput).is_user_error());
        assert!(!CoverageError::internal("boom").is_user_error());
    }
}
