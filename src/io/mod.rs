// src/io/mod.rs
pub mod export;
pub mod parallel;
pub mod reader;
pub mod writer;

pub use export::{ExportJob, ExportTask, JobStatus};
pub use parallel::ParallelSceneReader;
pub use reader::{GeoInfo, RawScene};
pub use writer::write_composite;
