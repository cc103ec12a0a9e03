//! Request orchestration: one fetch, five independent artifacts.

mod provider;
mod request;

pub use provider::SeriesProvider;
pub use request::{analyze, AnalysisBundle, AnalysisConfig, Artifact};
