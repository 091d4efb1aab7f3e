// src/processing/indices/savi.rs
use rayon::prelude::*;

use super::{IndexCalculator, DENOM_EPS};
use crate::image::{bands, NODATA};

/// Soil Adjusted Vegetation Index: (1 + L) * (NIR - RED) / (NIR + RED + L)
///
/// With the standard soil factor L = 0.5 this is the fixed
/// 1.5 * (NIR - RED) / (NIR + RED + 0.5) form.
pub struct SAVI {
    soil_factor: f32,
}

impl SAVI {
    pub fn new(soil_factor: f32) -> Self {
        Self { soil_factor }
    }
}

impl Default for SAVI {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl IndexCalculator for SAVI {
    fn name(&self) -> &str {
        "SAVI"
    }

    fn required_bands(&self) -> &[&'static str] {
        &[bands::NIR, bands::RED]
    }

    fn calculate(&self, inputs: &[&[f32]]) -> Vec<f32> {
        let nir = inputs[0];
        let red = inputs[1];
        let l = self.soil_factor;

        let mut result = vec![0.0f32; nir.len()];
        result.par_iter_mut().enumerate().for_each(|(i, out)| {
            let nir_val = nir[i];
            let red_val = red[i];

            if nir_val == NODATA || red_val == NODATA {
                *out = NODATA;
                return;
            }

            let denominator = nir_val + red_val + l;
            *out = if denominator.abs() > DENOM_EPS {
                (1.0 + l) * (nir_val - red_val) / denominator
            } else {
                NODATA
            };
        });
        result
    }
}
