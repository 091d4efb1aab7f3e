// src/main.rs
use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Parser;

use composite_calc::aoi::AreaOfInterest;
use composite_calc::catalog::Catalog;
use composite_calc::cli::{Cli, Commands};
use composite_calc::io::export::JobStatus;
use composite_calc::io::writer::CreationProfile;
use composite_calc::processing::pipeline::{self, PipelineParams};
use composite_calc::sensor::{Landsat8, Sensor, Sentinel2};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Landsat8 {
            aoi,
            manifest,
            start,
            end,
        } => run(&cli, &Landsat8, aoi, manifest, start, end),
        Commands::Sentinel2 {
            aoi,
            manifest,
            start,
            end,
        } => run(&cli, &Sentinel2, aoi, manifest, start, end),
    }
}

fn run(
    cli: &Cli,
    sensor: &dyn Sensor,
    aoi_path: &Path,
    manifest: &Path,
    start: &str,
    end: &str,
) -> Result<()> {
    let start: NaiveDate = start
        .parse()
        .map_err(|_| anyhow!("invalid start date '{}', expected YYYY-MM-DD", start))?;
    let end: NaiveDate = end
        .parse()
        .map_err(|_| anyhow!("invalid end date '{}', expected YYYY-MM-DD", end))?;
    if end <= start {
        return Err(anyhow!("end date {} is not after start date {}", end, start));
    }

    let aoi = AreaOfInterest::from_vector_file(aoi_path)?;
    let catalog = Catalog::from_file(manifest)?;

    let params = PipelineParams {
        start,
        end,
        max_cloud_cover: cli.cloud_cover,
        folder: cli.folder.clone(),
        scale: cli.scale,
        max_pixels: cli.max_pixels,
        profile: CreationProfile {
            compress: cli.compress.clone(),
            compress_level: cli.compress_level,
            tiled: true,
        },
        io_threads: cli.io_threads,
    };

    let summary = pipeline::run(sensor, catalog, &aoi, &params)?;

    let mut failures = 0;
    for job in &summary.jobs {
        match &job.status {
            JobStatus::Completed { bytes } => {
                println!("{}: completed, {} bytes -> {}", job.name, bytes, job.path.display());
            }
            JobStatus::Failed { reason } => {
                failures += 1;
                eprintln!("{}: FAILED - {}", job.name, reason);
            }
        }
    }

    println!(
        "{} images used from {}. Data interval between {} and {}",
        summary.images_used, summary.source, summary.start, summary.end
    );

    if failures > 0 {
        return Err(anyhow!("{} export task(s) failed", failures));
    }
    Ok(())
}
