pub mod coverage;
pub mod macros;
pub mod record;

pub use coverage::*;
pub use record::*;

crate::define_id_type!(i64, DatasetId);
