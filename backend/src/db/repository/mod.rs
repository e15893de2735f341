//! Dataset store trait.
//!
//! The store keeps validated uploads so coverage can be recomputed per
//! request with a different priority metric, without re-uploading.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::DatasetId;
use crate::preprocessing::Dataset;

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Lightweight listing entry for a stored dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub dataset_id: DatasetId,
    pub name: String,
    pub checksum: String,
    pub record_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for dataset storage.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Check if the store is usable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Store a dataset and assign it a new ID.
    ///
    /// A dataset whose checksum matches a stored one is not stored again;
    /// the existing entry is returned instead. The flag is true only when
    /// this call created the entry.
    async fn store_dataset(&self, dataset: Dataset) -> RepositoryResult<(DatasetInfo, bool)>;

    /// Look up a stored dataset by the checksum of its upload.
    async fn find_by_checksum(&self, checksum: &str) -> RepositoryResult<Option<DatasetInfo>>;

    /// Retrieve a dataset snapshot.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the dataset doesn't exist
    async fn get_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<Arc<Dataset>>;

    /// Metadata for one dataset.
    async fn get_dataset_info(&self, dataset_id: DatasetId) -> RepositoryResult<DatasetInfo>;

    /// All datasets, ordered by ID.
    async fn list_datasets(&self) -> RepositoryResult<Vec<DatasetInfo>>;

    /// Remove a dataset.
    async fn delete_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<()>;
}
