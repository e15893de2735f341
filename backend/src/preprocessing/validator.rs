//! Upload validation with row-indexed error reporting.
//!
//! Checks run in a fixed order: required columns first (nothing else can be
//! checked without them), then empty cells, then numeric content, then the
//! row count. A cell is empty when it is null or holds only whitespace, and
//! numeric cells are read with surrounding whitespace ignored. Every finding is collected so a single response can list all
//! defects of an upload.

use log::warn;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{IngestError, ValidationErrors};
use crate::models::{PriorityMetric, Record};
use crate::parsing::csv_parser::{
    column_names, is_blank, missing_rows, numeric_values, string_values, METRIC_COLUMNS,
    REQUIRED_COLUMNS, REVENUE_COLUMN, TRAFFIC_COLUMN, URL_COLUMN,
};

/// Cap on the number of duplicate urls listed individually in warnings.
const MAX_DUPLICATE_WARNINGS: usize = 10;

/// Outcome of validating one uploaded table.
///
/// Errors make `is_valid` false and block grouping. Warnings are
/// informational. `records` is only populated for valid tables.
///
/// # Examples
///
/// ```
/// use tro_rust::error::IngestError;
/// use tro_rust::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_error(IngestError::EmptyInput);
/// assert!(!result.is_valid);
/// assert_eq!(result.errors.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(serialize_with = "serialize_errors")]
    pub errors: Vec<IngestError>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
    #[serde(skip)]
    pub records: Vec<Record>,
}

/// Summary statistics gathered while validating.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationStats {
    pub total_rows: usize,
    pub distinct_urls: usize,
    pub duplicate_urls: usize,
    pub out_of_range_values: usize,
    pub total_traffic: f64,
    pub total_revenue: f64,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
            records: Vec::new(),
        }
    }

    /// Record a blocking error.
    pub fn add_error(&mut self, error: IngestError) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Validated records, or the collected errors.
    pub fn into_records(self) -> Result<Vec<Record>, ValidationErrors> {
        match ValidationErrors::from_errors(self.errors) {
            Some(errors) => Err(errors),
            None => Ok(self.records),
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

fn serialize_errors<S>(errors: &[IngestError], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

/// Validator for uploaded traffic/revenue tables.
///
/// # Examples
///
/// ```
/// use tro_rust::parsing::read_csv_bytes;
/// use tro_rust::preprocessing::validator::CoverageValidator;
///
/// let df = read_csv_bytes(b"url,traffic,revenue\n/a,,10\n/b,x,20\n").unwrap();
/// let result = CoverageValidator::validate_dataframe(&df).unwrap();
///
/// assert!(!result.is_valid);
/// assert_eq!(result.errors[0].to_string(), "Missing values in column 'traffic' at rows: 0");
/// assert_eq!(result.errors[1].to_string(), "Non-numeric values in column 'traffic' at rows: 1");
/// ```
pub struct CoverageValidator;

impl CoverageValidator {
    /// Validate a string-typed DataFrame as produced by
    /// [`read_csv_bytes`](crate::parsing::read_csv_bytes).
    ///
    /// Only column access failures are returned as `Err`; data defects are
    /// reported in the [`ValidationResult`].
    pub fn validate_dataframe(df: &DataFrame) -> PolarsResult<ValidationResult> {
        let mut result = ValidationResult::new();
        result.stats.total_rows = df.height();

        let present = column_names(df);
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !present.iter().any(|p| p.as_str() == **col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            result.add_error(IngestError::MissingColumns { columns: missing });
            return Ok(result);
        }

        for column in REQUIRED_COLUMNS {
            let rows = missing_rows(df, column)?;
            if !rows.is_empty() {
                result.add_error(IngestError::MissingValues {
                    column: column.to_string(),
                    rows,
                });
            }
        }

        let mut metrics: HashMap<&str, Vec<Option<f64>>> = HashMap::new();
        for column in METRIC_COLUMNS {
            let raw = string_values(df, column)?;
            let parsed = numeric_values(df, column)?;
            let rows: Vec<usize> = raw
                .iter()
                .zip(&parsed)
                .enumerate()
                .filter(|(_, (cell, value))| {
                    !is_blank(cell.as_deref()) && !matches!(value, Some(v) if !v.is_nan())
                })
                .map(|(row, _)| row)
                .collect();
            if !rows.is_empty() {
                result.add_error(IngestError::NonNumeric {
                    column: column.to_string(),
                    rows,
                });
            }
            metrics.insert(column, parsed);
        }

        if df.height() == 0 {
            result.add_error(IngestError::EmptyInput);
        }

        if !result.is_valid {
            return Ok(result);
        }

        let urls = string_values(df, URL_COLUMN)?;
        let traffic = metrics.remove(TRAFFIC_COLUMN).unwrap_or_default();
        let revenue = metrics.remove(REVENUE_COLUMN).unwrap_or_default();

        result.records = urls
            .into_iter()
            .zip(traffic)
            .zip(revenue)
            .map(|((url, traffic), revenue)| {
                Record::new(
                    url.unwrap_or_default(),
                    traffic.unwrap_or_default(),
                    revenue.unwrap_or_default(),
                )
            })
            .collect();

        Self::check_records(&mut result);
        Ok(result)
    }

    /// Warnings and statistics for records that passed the blocking checks.
    fn check_records(result: &mut ValidationResult) {
        let mut seen: HashMap<&str, Vec<usize>> = HashMap::new();
        for (row, record) in result.records.iter().enumerate() {
            seen.entry(record.id.as_str()).or_default().push(row);
        }

        let mut duplicates: Vec<(&str, &Vec<usize>)> = seen
            .iter()
            .filter(|(_, rows)| rows.len() > 1)
            .map(|(url, rows)| (*url, rows))
            .collect();
        duplicates.sort_by_key(|(_, rows)| rows[0]);

        let mut warnings = Vec::new();
        for (url, rows) in duplicates.iter().take(MAX_DUPLICATE_WARNINGS) {
            warnings.push(format!(
                "Duplicate url '{}' at rows: {}",
                url,
                rows.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", ")
            ));
        }
        if duplicates.len() > MAX_DUPLICATE_WARNINGS {
            warnings.push(format!(
                "... and {} more duplicate urls",
                duplicates.len() - MAX_DUPLICATE_WARNINGS
            ));
        }

        let mut out_of_range = 0;
        for (column, metric) in [
            (TRAFFIC_COLUMN, PriorityMetric::Traffic),
            (REVENUE_COLUMN, PriorityMetric::Revenue),
        ] {
            let rows: Vec<usize> = result
                .records
                .iter()
                .enumerate()
                .filter(|(_, r)| r.metric(metric) < 0.0 || r.metric(metric).is_infinite())
                .map(|(row, _)| row)
                .collect();
            if !rows.is_empty() {
                out_of_range += rows.len();
                warnings.push(format!(
                    "Negative or infinite values in column '{}' at rows: {}",
                    column,
                    rows.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", ")
                ));
            }
        }

        result.stats.distinct_urls = seen.len();
        result.stats.duplicate_urls = duplicates.len();
        result.stats.out_of_range_values = out_of_range;
        result.stats.total_traffic = result.records.iter().map(|r| r.traffic).sum();
        result.stats.total_revenue = result.records.iter().map(|r| r.revenue).sum();

        for warning in warnings {
            warn!("{}", warning);
            result.add_warning(warning);
        }
    }
}
