//! Dataset storage.
//!
//! Uploads are validated once and kept as immutable snapshots, so the
//! coverage endpoints can regroup by either priority metric without a new
//! upload.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers / CLI                                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service layer (services::coverage_service)             │
//! │  - Checksum deduplication                               │
//! │  - Grouping and report building                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository trait (repository) / LocalRepository        │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod checksum;
pub mod repositories;
pub mod repository;

pub use checksum::calculate_checksum;
pub use repositories::LocalRepository;
pub use repository::{
    DatasetInfo, DatasetRepository, ErrorContext, RepositoryError, RepositoryResult,
};
