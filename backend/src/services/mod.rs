//! Service layer between the dataset store and the surfaces.
//!
//! - [`coverage_service`]: upload storage with deduplication, grouping runs
//! - [`report`]: summary table, chart payload and combined CSV export

pub mod coverage_service;
pub mod report;

#[cfg(test)]
mod report_tests;

pub use coverage_service::{analyze, coverage_for, store_upload, CoverageReport, StoredUpload};
pub use report::{ChartData, ExportRow, SummaryRow};
