//! Core algorithms.
//!
//! - [`coverage`]: ranking, cumulative shares and balanced coverage groups

pub mod coverage;


pub use coverage::{compute_groups, rank_records, select_groups};
