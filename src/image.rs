// src/image.rs
use anyhow::{anyhow, Result};

/// Sentinel marking masked or invalid pixels in every band.
pub const NODATA: f32 = -999.0;

/// Canonical band names shared by both sensor sources after the rename step.
pub mod bands {
    pub const BLUE: &str = "blue";
    pub const GREEN: &str = "green";
    pub const RED: &str = "red";
    pub const NIR: &str = "nir";
    pub const SWIR1: &str = "swir1";
    pub const SWIR2: &str = "swir2";
    // Landsat-8 extra
    pub const SURFACE_TEMP: &str = "surface_temp";
    // Sentinel-2 extras
    pub const REDEDGE4: &str = "rededge4";
    pub const WATERVAPOR: &str = "watervapor";
}

/// A single named raster band.
#[derive(Debug, Clone)]
pub struct Band {
    pub name: String,
    pub data: Vec<f32>,
}

/// Ordered set of co-registered f32 bands on one (width, height) grid.
///
/// Band order is preserved: it determines the band order of exported rasters.
#[derive(Debug, Clone)]
pub struct MultiBandImage {
    shape: (usize, usize),
    bands: Vec<Band>,
}

impl MultiBandImage {
    pub fn new(shape: (usize, usize)) -> Self {
        Self {
            shape,
            bands: Vec::new(),
        }
    }

    /// (width, height) of the shared grid.
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn band_names(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn band(&self, name: &str) -> Option<&[f32]> {
        self.bands
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.data.as_slice())
    }

    /// Appends a band. Fails on a grid mismatch or a duplicate name so a
    /// half-built image is never produced silently.
    pub fn add_band(&mut self, name: &str, data: Vec<f32>) -> Result<()> {
        let expected = self.shape.0 * self.shape.1;
        if data.len() != expected {
            return Err(anyhow!(
                "band '{}' has {} pixels, grid {}x{} requires {}",
                name,
                data.len(),
                self.shape.0,
                self.shape.1,
                expected
            ));
        }
        if self.band(name).is_some() {
            return Err(anyhow!("band '{}' already present", name));
        }
        self.bands.push(Band {
            name: name.to_string(),
            data,
        });
        Ok(())
    }

    /// Sets every band to NODATA wherever `masked` is true. `masked` is in
    /// row-major pixel order on the same grid.
    pub fn mask_where(&mut self, masked: &[bool]) {
        for band in &mut self.bands {
            for (value, &m) in band.data.iter_mut().zip(masked) {
                if m {
                    *value = NODATA;
                }
            }
        }
    }
}
