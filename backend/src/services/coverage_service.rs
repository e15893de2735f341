//! Coverage orchestration: ingest, store, group and report.

use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::algorithms::compute_groups;
use crate::db::calculate_checksum;
use crate::db::repository::{DatasetInfo, DatasetRepository};
use crate::error::{CoverageError, CoverageResult};
use crate::models::{CoverageGroup, DatasetId, PriorityMetric, Thresholds};
use crate::preprocessing::{Dataset, IngestPipeline};
use crate::services::report::{
    build_chart, build_export_rows, build_summary, export_csv, ChartData, ExportRow, SummaryRow,
};

/// Everything derived from one dataset for one priority metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub priority: PriorityMetric,
    pub thresholds: Thresholds,
    pub record_count: usize,
    pub groups: Vec<CoverageGroup>,
    pub summary: Vec<SummaryRow>,
    pub chart: ChartData,
    #[serde(skip)]
    pub export_rows: Vec<ExportRow>,
}

impl CoverageReport {
    /// Combined export as CSV text.
    pub fn export_csv(&self) -> CoverageResult<String> {
        Ok(export_csv(&self.export_rows)?)
    }
}

/// Outcome of an upload: the stored entry and whether it was new.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    pub info: DatasetInfo,
    pub created: bool,
}

/// Group a dataset and build every report view.
///
/// # Errors
///
/// [`CoverageError::Grouping`] when the dataset holds negative or non-finite
/// metrics.
pub fn analyze(
    dataset: &Dataset,
    priority: PriorityMetric,
    thresholds: &Thresholds,
) -> CoverageResult<CoverageReport> {
    let outcome = compute_groups(&dataset.records, priority, thresholds)?;
    let summary = build_summary(&outcome);
    let chart = build_chart(&summary);
    let export_rows = build_export_rows(&outcome);

    info!(
        "Grouped '{}' by {}: {} records, {} groups",
        dataset.name,
        priority,
        dataset.len(),
        outcome.groups.len()
    );

    Ok(CoverageReport {
        priority,
        thresholds: thresholds.clone(),
        record_count: dataset.len(),
        groups: outcome.groups,
        summary,
        chart,
        export_rows,
    })
}

/// Validate an upload and store it, reusing an earlier identical upload.
///
/// Parsing and validation run on the blocking pool. Uploads the grouper would
/// refuse (negative or non-finite metrics) are not stored.
pub async fn store_upload(
    repo: &dyn DatasetRepository,
    name: &str,
    bytes: Vec<u8>,
) -> CoverageResult<StoredUpload> {
    let checksum = calculate_checksum(&bytes);
    if let Some(info) = repo.find_by_checksum(&checksum).await? {
        info!("Upload '{}' already stored as dataset {}", name, info.dataset_id);
        return Ok(StoredUpload {
            info,
            created: false,
        });
    }

    let name = name.to_string();
    let dataset = tokio::task::spawn_blocking(move || IngestPipeline::ingest_bytes(&name, &bytes))
        .await
        .map_err(|e| CoverageError::internal(format!("Ingest task failed: {}", e)))??;
    for (row, record) in dataset.records.iter().enumerate() {
        record.check_values(row)?;
    }

    let (info, created) = repo.store_dataset(dataset).await?;
    Ok(StoredUpload { info, created })
}

/// Recompute coverage for a stored dataset.
pub async fn coverage_for(
    repo: &dyn DatasetRepository,
    dataset_id: DatasetId,
    priority: PriorityMetric,
    thresholds: &Thresholds,
) -> CoverageResult<CoverageReport> {
    let dataset: Arc<Dataset> = repo.get_dataset(dataset_id).await?;
    let thresholds = thresholds.clone();

    tokio::task::spawn_blocking(move || analyze(&dataset, priority, &thresholds))
        .await
        .map_err(|e| CoverageError::internal(format!("Grouping task failed: {}", e)))?
}
