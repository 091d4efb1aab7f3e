// src/io/reader.rs
use anyhow::{anyhow, Result};
use gdal::Dataset;

use crate::catalog::SceneRecord;

/// Georeferencing carried from the input scenes to the exported composites.
#[derive(Debug, Clone)]
pub struct GeoInfo {
    pub projection: String,
    pub geo_transform: [f64; 6],
    pub width: usize,
    pub height: usize,
}

impl GeoInfo {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let (width, height) = dataset.raster_size();
        let geo_transform: [f64; 6] = dataset.geo_transform()?;
        Ok(Self {
            projection: dataset.projection(),
            geo_transform,
            width,
            height,
        })
    }

    /// Raster extent as (min_x, min_y, max_x, max_y) in CRS units.
    /// Assumes a north-up grid (no rotation terms).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let gt = &self.geo_transform;
        let x0 = gt[0];
        let y0 = gt[3];
        let x1 = gt[0] + self.width as f64 * gt[1];
        let y1 = gt[3] + self.height as f64 * gt[5];
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// True when two scenes share the same grid and projection.
    pub fn same_grid(&self, other: &GeoInfo) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.projection == other.projection
            && self
                .geo_transform
                .iter()
                .zip(&other.geo_transform)
                .all(|(a, b)| (a - b).abs() < 1e-6)
    }
}

/// A scene as it sits on disk: raw-named reflectance bands plus integer
/// quality bands, before masking, scaling and renaming.
#[derive(Debug, Clone)]
pub struct RawScene {
    pub record: SceneRecord,
    pub geo: GeoInfo,
    pub shape: (usize, usize),
    pub bands: Vec<(String, Vec<f32>)>,
    pub qa: Vec<(String, Vec<u16>)>,
}

impl RawScene {
    pub fn band(&self, name: &str) -> Option<&[f32]> {
        self.bands
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_slice())
    }

    pub fn qa_band(&self, name: &str) -> Option<&[u16]> {
        self.qa
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_slice())
    }
}

/// Reads one scene raster. Reflectance bands come first in the file, in the
/// sensor's documented order, followed by its quality bands.
pub fn read_scene(
    dataset: &Dataset,
    record: &SceneRecord,
    reflectance_bands: &[&str],
    qa_bands: &[&str],
) -> Result<RawScene> {
    let geo = GeoInfo::from_dataset(dataset)?;
    let (width, height) = (geo.width, geo.height);

    let expected = reflectance_bands.len() + qa_bands.len();
    let actual = dataset.raster_count() as usize;
    if actual != expected {
        return Err(anyhow!(
            "scene {} has {} bands, expected {} ({} reflectance + {} quality)",
            record.path.display(),
            actual,
            expected,
            reflectance_bands.len(),
            qa_bands.len()
        ));
    }

    let mut bands = Vec::with_capacity(reflectance_bands.len());
    for (i, &name) in reflectance_bands.iter().enumerate() {
        let band = dataset.rasterband(i + 1)?;
        let buffer = band.read_as::<f32>((0, 0), (width, height), (width, height), None)?;
        bands.push((name.to_string(), buffer.data().to_vec()));
    }

    let mut qa = Vec::with_capacity(qa_bands.len());
    for (i, &name) in qa_bands.iter().enumerate() {
        let band = dataset.rasterband(reflectance_bands.len() + i + 1)?;
        let buffer = band.read_as::<u16>((0, 0), (width, height), (width, height), None)?;
        qa.push((name.to_string(), buffer.data().to_vec()));
    }

    Ok(RawScene {
        record: record.clone(),
        geo,
        shape: (width, height),
        bands,
        qa,
    })
}
