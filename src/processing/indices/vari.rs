// src/processing/indices/vari.rs
use rayon::prelude::*;

use super::{IndexCalculator, DENOM_EPS};
use crate::image::{bands, NODATA};

/// Visible Atmospherically Resistant Index:
/// (GREEN - RED) / (GREEN + RED - BLUE)
pub struct VARI;

impl IndexCalculator for VARI {
    fn name(&self) -> &str {
        "VARI"
    }

    fn required_bands(&self) -> &[&'static str] {
        &[bands::GREEN, bands::RED, bands::BLUE]
    }

    fn calculate(&self, inputs: &[&[f32]]) -> Vec<f32> {
        let green = inputs[0];
        let red = inputs[1];
        let blue = inputs[2];

        let mut result = vec![0.0f32; green.len()];
        result.par_iter_mut().enumerate().for_each(|(i, out)| {
            let green_val = green[i];
            let red_val = red[i];
            let blue_val = blue[i];

            if green_val == NODATA || red_val == NODATA || blue_val == NODATA {
                *out = NODATA;
                return;
            }

            let denominator = green_val + red_val - blue_val;
            *out = if denominator.abs() > DENOM_EPS {
                (green_val - red_val) / denominator
            } else {
                NODATA
            };
        });
        result
    }
}
