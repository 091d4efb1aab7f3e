// src/processing/indices/mod.rs
pub mod arvi;
pub mod evi;
pub mod gci;
pub mod ndvi;
pub mod savi;
pub mod vari;

// Re-export indices
pub use arvi::ARVI;
pub use evi::EVI;
pub use gci::GCI;
pub use ndvi::NDVI;
pub use savi::SAVI;
pub use vari::VARI;

use anyhow::{anyhow, Result};

use crate::image::MultiBandImage;

/// Denominators below this magnitude yield NODATA instead of a blown-up ratio.
pub(crate) const DENOM_EPS: f32 = 1e-6;

/// Trait for spectral index calculators.
///
/// A calculator is a pure per-pixel transform over canonical input bands. It
/// receives its inputs in `required_bands()` order and returns one new band.
pub trait IndexCalculator: Send + Sync {
    /// Name of the index; also the name of the appended band.
    fn name(&self) -> &str;

    /// Canonical band names the calculator reads, in input order.
    fn required_bands(&self) -> &[&'static str];

    /// Calculate the index from the provided input bands.
    fn calculate(&self, inputs: &[&[f32]]) -> Vec<f32>;
}

/// Computes one index over an image and appends it as a new band.
///
/// Fails without touching the image when a required band is missing or the
/// index band already exists.
pub fn add_index(image: &mut MultiBandImage, calculator: &dyn IndexCalculator) -> Result<()> {
    let result = {
        let mut inputs = Vec::with_capacity(calculator.required_bands().len());
        for &name in calculator.required_bands() {
            let band = image.band(name).ok_or_else(|| {
                anyhow!(
                    "{} requires band '{}', image has [{}]",
                    calculator.name(),
                    name,
                    image.band_names().join(", ")
                )
            })?;
            inputs.push(band);
        }
        calculator.calculate(&inputs)
    };
    image.add_band(calculator.name(), result)
}

/// The six indices every composite carries, in export band order.
pub fn standard_indices() -> Vec<Box<dyn IndexCalculator>> {
    vec![
        Box::new(NDVI),
        Box::new(SAVI::default()),
        Box::new(EVI),
        Box::new(GCI),
        Box::new(ARVI),
        Box::new(VARI),
    ]
}

/// Appends NDVI, SAVI, EVI, GCI, ARVI and VARI to the image.
pub fn add_standard_indices(image: &mut MultiBandImage) -> Result<()> {
    for calculator in standard_indices() {
        add_index(image, calculator.as_ref())?;
    }
    Ok(())
}
