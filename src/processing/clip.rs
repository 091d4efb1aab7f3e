// src/processing/clip.rs
use anyhow::Result;
use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use rayon::prelude::*;

use crate::aoi::AreaOfInterest;
use crate::image::MultiBandImage;
use crate::io::reader::GeoInfo;

/// Projects the AOI ring from lon/lat into a scene's CRS.
///
/// An empty projection string means the scene carries no CRS; the ring is
/// passed through untouched and treated as already matching the grid.
pub fn project_ring(aoi: &AreaOfInterest, projection_wkt: &str) -> Result<Vec<(f64, f64)>> {
    let (mut xs, mut ys): (Vec<f64>, Vec<f64>) = aoi.ring().iter().copied().unzip();

    if !projection_wkt.is_empty() {
        let mut wgs84 = SpatialRef::from_epsg(4326)?;
        wgs84.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
        let mut target = SpatialRef::from_wkt(projection_wkt)?;
        target.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);

        let transform = CoordTransform::new(&wgs84, &target)?;
        let mut zs = vec![0.0f64; xs.len()];
        transform.transform_coords(&mut xs, &mut ys, &mut zs)?;
    }

    Ok(xs.into_iter().zip(ys).collect())
}

fn ring_bbox(ring: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    let mut bbox = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for &(x, y) in ring {
        bbox.0 = bbox.0.min(x);
        bbox.1 = bbox.1.min(y);
        bbox.2 = bbox.2.max(x);
        bbox.3 = bbox.3.max(y);
    }
    bbox
}

/// Spatial filter: true when the raster extent touches the bounding box of
/// the AOI ring (already projected into the raster CRS).
pub fn intersects(geo: &GeoInfo, ring_in_crs: &[(f64, f64)]) -> bool {
    let (rx0, ry0, rx1, ry1) = ring_bbox(ring_in_crs);
    let (gx0, gy0, gx1, gy1) = geo.bounds();
    rx0 <= gx1 && rx1 >= gx0 && ry0 <= gy1 && ry1 >= gy0
}

/// Even-odd (ray casting) point-in-polygon test against a closed ring.
pub fn point_in_ring(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    if ring.len() < 4 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) {
            let x_cross = xj + (y - yj) / (yi - yj) * (xi - xj);
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Per-pixel inside/outside decision for one grid, built once per run and
/// applied to every composite.
pub struct ClipMask {
    shape: (usize, usize),
    inside: Vec<bool>,
}

impl ClipMask {
    /// Rasterizes the ring (in the grid's CRS) by testing pixel centers.
    pub fn build(ring_in_crs: &[(f64, f64)], geo: &GeoInfo) -> Self {
        let (width, height) = (geo.width, geo.height);
        let gt = geo.geo_transform;
        let mut inside = vec![false; width * height];

        inside.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            let py = y as f64 + 0.5;
            for (x, cell) in row.iter_mut().enumerate() {
                let px = x as f64 + 0.5;
                let gx = gt[0] + px * gt[1] + py * gt[2];
                let gy = gt[3] + px * gt[4] + py * gt[5];
                *cell = point_in_ring(ring_in_crs, gx, gy);
            }
        });

        Self {
            shape: (width, height),
            inside,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn inside(&self) -> &[bool] {
        &self.inside
    }

    /// Sets every band to NODATA outside the AOI.
    pub fn apply(&self, image: &mut MultiBandImage) {
        let outside: Vec<bool> = self.inside.iter().map(|&b| !b).collect();
        image.mask_where(&outside);
    }
}
