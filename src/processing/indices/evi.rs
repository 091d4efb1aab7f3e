// src/processing/indices/evi.rs
use rayon::prelude::*;

use super::{IndexCalculator, DENOM_EPS};
use crate::image::{bands, NODATA};

/// Enhanced Vegetation Index: 2.5 * (NIR - RED) / (NIR + 6*RED - 7.5*BLUE + 1)
pub struct EVI;

// MODIS coefficients
const G: f32 = 2.5;
const C1: f32 = 6.0;
const C2: f32 = 7.5;
const L: f32 = 1.0;

impl IndexCalculator for EVI {
    fn name(&self) -> &str {
        "EVI"
    }

    fn required_bands(&self) -> &[&'static str] {
        &[bands::NIR, bands::RED, bands::BLUE]
    }

    fn calculate(&self, inputs: &[&[f32]]) -> Vec<f32> {
        let nir = inputs[0];
        let red = inputs[1];
        let blue = inputs[2];

        let mut result = vec![0.0f32; nir.len()];
        result.par_iter_mut().enumerate().for_each(|(i, out)| {
            let nir_val = nir[i];
            let red_val = red[i];
            let blue_val = blue[i];

            if nir_val == NODATA || red_val == NODATA || blue_val == NODATA {
                *out = NODATA;
                return;
            }

            let denominator = nir_val + C1 * red_val - C2 * blue_val + L;
            *out = if denominator.abs() > DENOM_EPS {
                G * (nir_val - red_val) / denominator
            } else {
                NODATA
            };
        });
        result
    }
}
