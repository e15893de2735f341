//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

pub use crate::db::repository::DatasetInfo;
pub use crate::services::report::{ChartData, SummaryRow};
pub use crate::services::CoverageReport;

use crate::models::DatasetId;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of stored datasets
    pub datasets: usize,
}

/// Query parameters of an upload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadQuery {
    /// Display name of the dataset (default: `upload.csv`)
    pub name: Option<String>,
    /// `revenue` or `traffic`; the configured default when absent
    pub priority: Option<String>,
}

/// Query parameters of the coverage and export endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverageQuery {
    pub priority: Option<String>,
}

/// Response for a stored upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub dataset: DatasetInfo,
    /// False when an identical upload was already stored
    pub created: bool,
    pub warnings: Vec<String>,
    pub report: CoverageReport,
}

/// Dataset listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetListResponse {
    pub datasets: Vec<DatasetInfo>,
    pub total: usize,
}

/// Coverage for one stored dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageResponse {
    pub dataset_id: DatasetId,
    #[serde(flatten)]
    pub report: CoverageReport,
}
