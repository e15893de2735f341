//! Repository implementations module.
//!
//! - `local`: In-memory implementation used by the server and tests
pub mod local;

pub use local::LocalRepository;
