// src/sensor/mod.rs
pub mod landsat8;
pub mod sentinel2;

pub use landsat8::Landsat8;
pub use sentinel2::Sentinel2;

use anyhow::Result;

use crate::image::MultiBandImage;
use crate::io::reader::RawScene;

/// A satellite source: scene band layout, cloud mask and radiometric scaling.
///
/// `mask_and_scale` turns a raw scene into a canonical image: quality-band
/// bitmask tests decide which pixels survive, reflectance values are scaled to
/// physical units and bands are renamed to the sensor-agnostic aliases.
pub trait Sensor: Send + Sync {
    /// Collection identifier of the source, e.g. `LANDSAT/LC08/C02/T1_L2`.
    fn source_id(&self) -> &'static str;

    /// Short prefix used in export names, e.g. `L8`.
    fn prefix(&self) -> &'static str;

    /// Reflectance/temperature bands in scene file order, provider names.
    fn raw_bands(&self) -> &'static [&'static str];

    /// Canonical names for `raw_bands`, same order.
    fn canonical_bands(&self) -> &'static [&'static str];

    /// Quality bands stored after the reflectance bands in the scene file.
    fn qa_bands(&self) -> &'static [&'static str];

    /// Cloud mask + scaling + rename. Masked pixels become NODATA; quality
    /// bands are dropped from the result.
    fn mask_and_scale(&self, scene: &RawScene) -> Result<MultiBandImage>;
}
