// src/processing/reduce.rs
use anyhow::{anyhow, Result};
use itertools::Itertools;
use rayon::prelude::*;

use crate::image::{MultiBandImage, NODATA};

/// Pixelwise statistic computed across the time dimension of a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Median,
    Min,
    Max,
}

impl Reducer {
    pub const ALL: [Reducer; 4] = [Reducer::Mean, Reducer::Median, Reducer::Min, Reducer::Max];

    pub fn name(&self) -> &'static str {
        match self {
            Reducer::Mean => "mean",
            Reducer::Median => "median",
            Reducer::Min => "min",
            Reducer::Max => "max",
        }
    }

    /// Reduces a non-empty sample of valid pixel values.
    fn reduce(&self, values: &mut [f32]) -> f32 {
        match self {
            Reducer::Mean => values.iter().sum::<f32>() / values.len() as f32,
            Reducer::Median => {
                values.sort_unstable_by(f32::total_cmp);
                let n = values.len();
                if n % 2 == 1 {
                    values[n / 2]
                } else {
                    (values[n / 2 - 1] + values[n / 2]) / 2.0
                }
            }
            Reducer::Min => values.iter().copied().fold(f32::MAX, f32::min),
            Reducer::Max => values.iter().copied().fold(f32::MIN, f32::max),
        }
    }
}

/// Reduces a collection to one composite: per band, per pixel, the statistic
/// over all scenes where the pixel is valid. NODATA samples are skipped;
/// pixels with no valid sample anywhere stay NODATA.
pub fn reduce_collection(images: &[MultiBandImage], reducer: Reducer) -> Result<MultiBandImage> {
    let first = images
        .first()
        .ok_or_else(|| anyhow!("cannot reduce an empty collection"))?;
    if !images.iter().map(|i| i.shape()).all_equal() {
        return Err(anyhow!("collection images are not on the same grid"));
    }
    if !images.iter().map(|i| i.band_names()).all_equal() {
        return Err(anyhow!("collection images do not share one band schema"));
    }

    let shape = first.shape();
    let mut composite = MultiBandImage::new(shape);

    for band in first.bands() {
        let sources: Vec<&[f32]> = images
            .iter()
            .map(|img| {
                img.band(&band.name)
                    .ok_or_else(|| anyhow!("band '{}' vanished from collection", band.name))
            })
            .collect::<Result<_>>()?;

        let mut data = vec![NODATA; shape.0 * shape.1];
        data.par_iter_mut().enumerate().for_each(|(i, out)| {
            let mut values: Vec<f32> = sources
                .iter()
                .map(|s| s[i])
                .filter(|&v| v != NODATA)
                .collect();
            if !values.is_empty() {
                *out = reducer.reduce(&mut values);
            }
        });
        composite.add_band(&band.name, data)?;
    }

    Ok(composite)
}
