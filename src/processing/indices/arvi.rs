// src/processing/indices/arvi.rs
use rayon::prelude::*;

use super::{IndexCalculator, DENOM_EPS};
use crate::image::{bands, NODATA};

/// Atmospherically Resistant Vegetation Index:
/// (NIR - (2*RED - BLUE)) / (NIR + (2*RED - BLUE))
pub struct ARVI;

impl IndexCalculator for ARVI {
    fn name(&self) -> &str {
        "ARVI"
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

            // Red corrected for atmospheric scattering via the blue band.
            let rb = 2.0 * red_val - blue_val;
            let denominator = nir_val + rb;
            *out = if denominator.abs() > DENOM_EPS {
                (nir_val - rb) / denominator
            } else {
                NODATA
            };
        });
        result
    }
}
