// src/sensor/landsat8.rs
use anyhow::{anyhow, Result};
use rayon::prelude::*;

use super::Sensor;
use crate::image::{bands, MultiBandImage, NODATA};
use crate::io::reader::RawScene;

/// Landsat-8 Collection 2 Level-2 surface reflectance.
pub struct Landsat8;

const RAW_BANDS: [&str; 7] = [
    "SR_B2", "SR_B3", "SR_B4", "SR_B5", "SR_B6", "SR_B7", "ST_B10",
];
const CANONICAL: [&str; 7] = [
    bands::BLUE,
    bands::GREEN,
    bands::RED,
    bands::NIR,
    bands::SWIR1,
    bands::SWIR2,
    bands::SURFACE_TEMP,
];
const QA_BANDS: [&str; 2] = ["QA_PIXEL", "QA_RADSAT"];

// QA_PIXEL bit layout (Collection 2)
const CLOUD_SHADOW_BIT: u16 = 1 << 3;
const CLOUD_BIT: u16 = 1 << 5;

// Collection 2 Level-2 scaling factors
const OPTICAL_SCALE: f32 = 0.000_027_5;
const OPTICAL_OFFSET: f32 = -0.2;
const THERMAL_SCALE: f32 = 0.003_128_02;
const THERMAL_OFFSET: f32 = 146.0;

impl Sensor for Landsat8 {
    fn source_id(&self) -> &'static str {
        "LANDSAT/LC08/C02/T1_L2"
    }

    fn prefix(&self) -> &'static str {
        "L8"
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
        let qa_pixel = scene
            .qa_band("QA_PIXEL")
            .ok_or_else(|| anyhow!("scene {} is missing QA_PIXEL", scene.record.id))?;
        let qa_radsat = scene
            .qa_band("QA_RADSAT")
            .ok_or_else(|| anyhow!("scene {} is missing QA_RADSAT", scene.record.id))?;

        // Clear conditions: no cloud, no cloud shadow, no saturated band.
        let masked: Vec<bool> = qa_pixel
            .iter()
            .zip(qa_radsat)
            .map(|(&qa, &sat)| qa & CLOUD_SHADOW_BIT != 0 || qa & CLOUD_BIT != 0 || sat != 0)
            .collect();

        let mut image = MultiBandImage::new(scene.shape);
        for (&raw, &canonical) in self.raw_bands().iter().zip(self.canonical_bands()) {
            let dn = scene
                .band(raw)
                .ok_or_else(|| anyhow!("scene {} is missing band {}", scene.record.id, raw))?;
            let (scale, offset) = if raw == "ST_B10" {
                (THERMAL_SCALE, THERMAL_OFFSET)
            } else {
                (OPTICAL_SCALE, OPTICAL_OFFSET)
            };
            let scaled: Vec<f32> = (0..dn.len())
                .into_par_iter()
                .map(|i| {
                    if masked[i] {
                        NODATA
                    } else {
                        dn[i] * scale + offset
                    }
                })
                .collect();
            image.add_band(canonical, scaled)?;
        }
        Ok(image)
    }
}
