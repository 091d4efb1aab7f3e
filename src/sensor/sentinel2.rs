// src/sensor/sentinel2.rs
use anyhow::{anyhow, Result};
use rayon::prelude::*;

use super::Sensor;
use crate::image::{bands, MultiBandImage, NODATA};
use crate::io::reader::RawScene;

/// Sentinel-2 Level-2A surface reflectance.
pub struct Sentinel2;

const RAW_BANDS: [&str; 8] = ["B2", "B3", "B4", "B8", "B8A", "B9", "B11", "B12"];
const CANONICAL: [&str; 8] = [
    bands::BLUE,
    bands::GREEN,
    bands::RED,
    bands::NIR,
    bands::REDEDGE4,
    bands::WATERVAPOR,
    bands::SWIR1,
    bands::SWIR2,
];
const QA_BANDS: [&str; 1] = ["QA60"];

// QA60 bit layout
const CLOUD_BIT: u16 = 1 << 10;
const CIRRUS_BIT: u16 = 1 << 11;

// DN to reflectance
const REFLECTANCE_SCALE: f32 = 1.0 / 10_000.0;

impl Sensor for Sentinel2 {
    fn source_id(&self) -> &'static str {
        "COPERNICUS/S2_SR"
    }

    fn prefix(&self) -> &'static str {
        "S2"
    }

    fn raw_bands(&self) -> &'static [&'static str] {
        &RAW_BANDS
    }

    fn canonical_bands(&self) -> &'static [&'static str] {
        &CANONICAL
    }

    fn qa_bands(&self) -> &'static [&'static str] {
        &QA_BANDS
    }

    fn mask_and_scale(&self, scene: &RawScene) -> Result<MultiBandImage> {
        let qa60 = scene
            .qa_band("QA60")
            .ok_or_else(|| anyhow!("scene {} is missing QA60", scene.record.id))?;

        // Clear conditions: neither the cloud nor the cirrus bit is set.
        let masked: Vec<bool> = qa60
            .iter()
            .map(|&qa| qa & CLOUD_BIT != 0 || qa & CIRRUS_BIT != 0)
            .collect();

        let mut image = MultiBandImage::new(scene.shape);
        for (&raw, &canonical) in self.raw_bands().iter().zip(self.canonical_bands()) {
            let dn = scene
                .band(raw)
                .ok_or_else(|| anyhow!("scene {} is missing band {}", scene.record.id, raw))?;
            let scaled: Vec<f32> = (0..dn.len())
                .into_par_iter()
                .map(|i| {
                    if masked[i] {
                        NODATA
                    } else {
                        dn[i] * REFLECTANCE_SCALE
                    }
                })
                .collect();
            image.add_band(canonical, scaled)?;
        }
        Ok(image)
    }
}
