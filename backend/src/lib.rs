//! # Traffic / Revenue Overlap
//!
//! Ranks pages by a priority metric and, for each coverage threshold, keeps the
//! ranked prefix up to the page where cumulative traffic **or** cumulative
//! revenue crosses that threshold. The prefix is not necessarily the smallest
//! set of pages reaching the threshold.
//!
//! ## Features
//!
//! - **Ingestion**: CSV uploads with `url`, `traffic` and `revenue` columns,
//!   validated with row-indexed error reporting
//! - **Grouping**: rank by a priority metric and cut one balanced prefix per
//!   threshold
//! - **Reports**: overview table, chart payload and a combined CSV export
//! - **HTTP API**: upload once, regroup by either metric on request
//!
//! ## Architecture
//!
//! - [`parsing`]: CSV reading and writing on top of polars
//! - [`preprocessing`]: validation and the ingest pipeline
//! - [`algorithms`]: the coverage grouper
//! - [`services`]: report building and orchestration
//! - [`db`]: the dataset store
//! - [`config`]: TOML and environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod algorithms;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod parsing;
pub mod preprocessing;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{CoverageError, CoverageResult};
