// src/processing/indices/ndvi.rs
use rayon::prelude::*;

use super::{IndexCalculator, DENOM_EPS};
use crate::image::{bands, NODATA};

/// Normalized Difference Vegetation Index: (NIR - RED) / (NIR + RED)
pub struct NDVI;

impl IndexCalculator for NDVI {
    fn name(&self) -> &str {
        "NDVI"
    }

    fn required_bands(&self) -> &[&'static str] {
        &[bands::NIR, bands::RED]
    }

    fn calculate(&self, inputs: &[&[f32]]) -> Vec<f32> {
        let nir = inputs[0];
        let red = inputs[1];

        let mut result = vec![0.0f32; nir.len()];
        result.par_iter_mut().enumerate().for_each(|(i, out)| {
            let nir_val = nir[i];
            let red_val = red[i];

            if nir_val == NODATA || red_val == NODATA {
                *out = NODATA;
                return;
            }

            let denominator = nir_val + red_val;
            *out = if denominator.abs() > DENOM_EPS {
                (nir_val - red_val) / denominator
            } else {
                NODATA
            };
        });
        result
    }
}
