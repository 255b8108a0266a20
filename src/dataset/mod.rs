//! Trial records and dataset loading.

mod loader;
mod record;

pub use loader::Dataset;
pub use record::{Record, REQUIRED_FIELDS};
