// src/io/writer.rs
use std::path::Path;

use anyhow::Result;
use gdal::raster::{Buffer, RasterCreationOptions};
use gdal::{DriverManager, Metadata};

use super::reader::GeoInfo;
use crate::image::{MultiBandImage, NODATA};

/// GeoTIFF creation settings shared by all exports of a run.
#[derive(Debug, Clone)]
pub struct CreationProfile {
    pub compress: String,
    pub compress_level: u8,
    pub tiled: bool,
}

impl Default for CreationProfile {
    fn default() -> Self {
        Self {
            compress: "DEFLATE".to_string(),
            compress_level: 6,
            tiled: true,
        }
    }
}

impl CreationProfile {
    fn creation_options(&self) -> RasterCreationOptions {
        let mut options = Vec::new();

        let compress = self.compress.to_uppercase();
        if compress != "NONE" {
            options.push(format!("COMPRESS={}", compress));
            match compress.as_str() {
                "DEFLATE" => options.push(format!("ZLEVEL={}", self.compress_level.min(9))),
                "ZSTD" => options.push(format!("ZSTD_LEVEL={}", self.compress_level.min(22))),
                _ => {}
            }
        }

        if self.tiled {
            options.push("TILED=YES".to_string());
        }

        options.push("NUM_THREADS=ALL_CPUS".to_string());

        RasterCreationOptions::from_iter(options)
    }
}

/// Writes every band of the composite to a float32 GeoTIFF. Band descriptions
/// carry the canonical band and index names; NODATA marks masked pixels.
pub fn write_composite(
    image: &MultiBandImage,
    geo: &GeoInfo,
    path: &Path,
    profile: &CreationProfile,
) -> Result<()> {
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let creation_options = profile.creation_options();
    let (width, height) = image.shape();

    let mut output = driver.create_with_band_type_with_options::<f32, _>(
        path,
        width,
        height,
        image.len(),
        &creation_options,
    )?;

    output.set_projection(&geo.projection)?;
    output.set_geo_transform(&geo.geo_transform)?;

    for (i, band) in image.bands().iter().enumerate() {
        let mut output_band = output.rasterband(i + 1)?;
        output_band.set_no_data_value(Some(NODATA as f64))?;
        output_band.set_description(&band.name)?;

        let mut buffer = Buffer::new((width, height), band.data.clone());
        output_band.write((0, 0), (width, height), &mut buffer)?;
    }

    output.flush_cache()?;
    Ok(())
}
