// src/processing/indices/gci.rs
use rayon::prelude::*;

use super::{IndexCalculator, DENOM_EPS};
use crate::image::{bands, NODATA};

/// Green Chlorophyll Index: NIR / GREEN - 1
pub struct GCI;

impl IndexCalculator for GCI {
    fn name(&self) -> &str {
        "GCI"
    }

    fn required_bands(&self) -> &[&'static str] {
        &[bands::NIR, bands::GREEN]
    }

    fn calculate(&self, inputs: &[&[f32]]) -> Vec<f32> {
        let nir = inputs[0];
        let green = inputs[1];

        let mut result = vec![0.0f32; nir.len()];
        result.par_iter_mut().enumerate().for_each(|(i, out)| {
            let nir_val = nir[i];
            let green_val = green[i];

            if nir_val == NODATA || green_val == NODATA {
                *out = NODATA;
                return;
            }

            *out = if green_val.abs() > DENOM_EPS {
                nir_val / green_val - 1.0
            } else {
                NODATA
            };
        });
        result
    }
}
