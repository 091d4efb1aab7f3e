// src/lib.rs
pub mod aoi;
pub mod catalog;
pub mod cli;
pub mod image;
pub mod io;
pub mod processing;
pub mod sensor;
pub mod utils;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
