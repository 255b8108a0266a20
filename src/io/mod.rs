//! Chart rendering and artifact output.

mod backend;
mod renderer;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{ChartBackend, PlottersBackend};
pub use renderer::{ArtifactPath, ReportRenderer, ARTIFACT_EXTENSION};
pub use store::{create_output_store, ArtifactStore, LocalStore, MemoryStore};
