// src/processing/mod.rs
pub mod clip;
pub mod indices;
pub mod pipeline;
pub mod reduce;

// Re-export main components
pub use pipeline::{PipelineParams, PipelineSummary};
pub use reduce::Reducer;
