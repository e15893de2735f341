//! In-memory local repository implementation.
//!
//! All data lives in a `HashMap` behind a read/write lock. Datasets are
//! stored as immutable `Arc` snapshots so readers never block on grouping.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::db::repository::*;
use crate::models::DatasetId;
use crate::preprocessing::Dataset;

/// In-memory local repository.
///
/// # Example
/// ```
/// use tro_rust::db::repositories::LocalRepository;
/// use tro_rust::db::repository::DatasetRepository;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = LocalRepository::new();
///     assert!(repo.list_datasets().await.unwrap().is_empty());
/// });
/// ```
/// How long a health check waits for the store lock before reporting the
/// store as unavailable.
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    datasets: HashMap<DatasetId, Arc<Dataset>>,
    metadata: HashMap<DatasetId, DatasetInfo>,
    next_dataset_id: DatasetId,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            datasets: HashMap::new(),
            metadata: HashMap::new(),
            next_dataset_id: DatasetId(1),
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored datasets.
    pub fn len(&self) -> usize {
        self.data.read().datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn not_found(operation: &str, dataset_id: DatasetId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Dataset {} not found", dataset_id),
            ErrorContext::new(operation).with_entity_id(dataset_id),
        )
    }
}

#[async_trait]
impl DatasetRepository for LocalRepository {
    /// False when the store lock cannot be taken in time, e.g. while a
    /// writer is stuck.
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.try_read_for(HEALTH_CHECK_TIMEOUT).is_some())
    }

    async fn store_dataset(&self, dataset: Dataset) -> RepositoryResult<(DatasetInfo, bool)> {
        let mut data = self.data.write();
        if let Some(existing) = data
            .metadata
            .values()
            .filter(|info| info.checksum == dataset.checksum)
            .min_by_key(|info| info.dataset_id)
        {
            debug!(
                "Upload '{}' matches dataset {}, not stored again",
                dataset.name, existing.dataset_id
            );
            return Ok((existing.clone(), false));
        }

        let dataset_id = data.next_dataset_id;
        data.next_dataset_id = DatasetId(dataset_id.value() + 1);

        let info = DatasetInfo {
            dataset_id,
            name: dataset.name.clone(),
            checksum: dataset.checksum.clone(),
            record_count: dataset.len(),
            created_at: Utc::now(),
        };

        debug!("Stored dataset {} ('{}')", dataset_id, info.name);
        data.metadata.insert(dataset_id, info.clone());
        data.datasets.insert(dataset_id, Arc::new(dataset));

        Ok((info, true))
    }

    async fn find_by_checksum(&self, checksum: &str) -> RepositoryResult<Option<DatasetInfo>> {
        let data = self.data.read();
        Ok(data
            .metadata
            .values()
            .filter(|info| info.checksum == checksum)
            .min_by_key(|info| info.dataset_id)
            .cloned())
    }

    async fn get_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<Arc<Dataset>> {
        self.data
            .read()
            .datasets
            .get(&dataset_id)
            .cloned()
            .ok_or_else(|| Self::not_found("get_dataset", dataset_id))
    }

    async fn get_dataset_info(&self, dataset_id: DatasetId) -> RepositoryResult<DatasetInfo> {
        self.data
            .read()
            .metadata
            .get(&dataset_id)
            .cloned()
            .ok_or_else(|| Self::not_found("get_dataset_info", dataset_id))
    }

    async fn list_datasets(&self) -> RepositoryResult<Vec<DatasetInfo>> {
        let mut datasets: Vec<DatasetInfo> = self.data.read().metadata.values().cloned().collect();
        datasets.sort_by_key(|info| info.dataset_id);
        Ok(datasets)
    }

    async fn delete_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<()> {
        let mut data = self.data.write();
        if data.datasets.remove(&dataset_id).is_none() {
            return Err(Self::not_found("delete_dataset", dataset_id));
        }
        data.metadata.remove(&dataset_id);
        Ok(())
    }
}
