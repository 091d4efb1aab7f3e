// src/io/export.rs
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use rayon::prelude::*;

use super::reader::GeoInfo;
use super::writer::{write_composite, CreationProfile};
use crate::image::MultiBandImage;

/// One export request: a named composite headed for the destination folder at
/// a fixed ground sample distance, under a pixel budget.
#[derive(Debug, Clone)]
pub struct ExportTask {
    pub name: String,
    pub folder: PathBuf,
    /// Target ground sample distance in CRS units.
    pub scale: f64,
    /// Budget on width x height x bands of the written raster.
    pub max_pixels: u64,
    pub profile: CreationProfile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Completed { bytes: u64 },
    Failed { reason: String },
}

/// Terminal record of a submitted export. Submission always yields one of
/// these; failures are carried in the status instead of being thrown away.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub name: String,
    pub path: PathBuf,
    pub status: JobStatus,
}

impl ExportJob {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, JobStatus::Completed { .. })
    }
}

/// Runs one export task to completion and reports its outcome.
pub fn submit(task: &ExportTask, image: &MultiBandImage, geo: &GeoInfo) -> ExportJob {
    let path = task.folder.join(format!("{}.tif", task.name));
    let status = match run_export(task, image, geo, &path) {
        Ok(bytes) => JobStatus::Completed { bytes },
        Err(e) => JobStatus::Failed {
            reason: format!("{e:#}"),
        },
    };
    ExportJob {
        name: task.name.clone(),
        path,
        status,
    }
}

fn run_export(
    task: &ExportTask,
    image: &MultiBandImage,
    geo: &GeoInfo,
    path: &Path,
) -> Result<u64> {
    let resampled;
    let (image, geo) = if needs_resample(geo, task.scale) {
        resampled = resample_nearest(image, geo, task.scale)?;
        (&resampled.0, &resampled.1)
    } else {
        (image, geo)
    };

    let (width, height) = image.shape();
    let pixels = width as u64 * height as u64 * image.len() as u64;
    if pixels > task.max_pixels {
        return Err(anyhow!(
            "export '{}' would write {} pixels, budget is {}",
            task.name,
            pixels,
            task.max_pixels
        ));
    }

    fs::create_dir_all(&task.folder)?;
    write_composite(image, geo, path, &task.profile)?;
    Ok(fs::metadata(path)?.len())
}

fn needs_resample(geo: &GeoInfo, scale: f64) -> bool {
    (geo.geo_transform[1].abs() - scale).abs() > 1e-9
        || (geo.geo_transform[5].abs() - scale).abs() > 1e-9
}

/// Nearest-neighbour resample of a composite onto a grid with the requested
/// ground sample distance, keeping the origin fixed.
pub fn resample_nearest(
    image: &MultiBandImage,
    geo: &GeoInfo,
    scale: f64,
) -> Result<(MultiBandImage, GeoInfo)> {
    if scale <= 0.0 {
        return Err(anyhow!("ground sample distance must be positive, got {scale}"));
    }

    let step_x = scale / geo.geo_transform[1].abs();
    let step_y = scale / geo.geo_transform[5].abs();
    let out_width = ((geo.width as f64 / step_x).ceil() as usize).max(1);
    let out_height = ((geo.height as f64 / step_y).ceil() as usize).max(1);

    let mut out = MultiBandImage::new((out_width, out_height));
    for band in image.bands() {
        let mut data = vec![0.0f32; out_width * out_height];
        data.par_chunks_mut(out_width).enumerate().for_each(|(y, row)| {
            let src_y = (((y as f64 + 0.5) * step_y) as usize).min(geo.height - 1);
            for (x, out_px) in row.iter_mut().enumerate() {
                let src_x = (((x as f64 + 0.5) * step_x) as usize).min(geo.width - 1);
                *out_px = band.data[src_y * geo.width + src_x];
            }
        });
        out.add_band(&band.name, data)?;
    }

    let mut geo_transform = geo.geo_transform;
    geo_transform[1] = scale * geo_transform[1].signum();
    geo_transform[5] = scale * geo_transform[5].signum();

    let out_geo = GeoInfo {
        projection: geo.projection.clone(),
        geo_transform,
        width: out_width,
        height: out_height,
    };
    Ok((out, out_geo))
}
