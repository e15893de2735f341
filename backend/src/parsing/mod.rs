//! CSV reading and writing.
//!
//! - [`csv_parser`]: load uploads into a string-typed DataFrame, extract
//!   columns, and serialize DataFrames back to CSV text
//!
//! # Example
//!
//! ```no_run
//! use tro_rust::parsing::csv_parser::read_csv_file;
//! use std::path::Path;
//!
//! let df = read_csv_file(Path::new("pages.csv"))
//!     .expect("Failed to parse CSV");
//! println!("{} rows", df.height());
//! ```

pub mod csv_parser;

#[cfg(test)]
mod csv_parser_tests;

pub use csv_parser::{read_csv_bytes, read_csv_file, REQUIRED_COLUMNS};
