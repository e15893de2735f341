//! Validation and ingestion of uploaded tables.
//!
//! - [`validator`]: schema, missing-value, numeric and emptiness checks
//! - [`pipeline`]: bytes or file → validated [`Dataset`](pipeline::Dataset)

pub mod pipeline;
pub mod validator;

#[cfg(test)]
mod validator_tests;

pub use pipeline::{Dataset, IngestPipeline};
pub use validator::{CoverageValidator, ValidationResult, ValidationStats};
