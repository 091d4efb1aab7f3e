// src/aoi.rs
use std::path::Path;

use anyhow::{anyhow, Result};
use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use gdal::vector::{Geometry, LayerAccess};
use gdal::Dataset;
use gdal_sys::OGRwkbGeometryType;

/// Closed ring of (longitude, latitude) pairs in EPSG:4326 bounding the
/// analysis area. First and last coordinate are always equal.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaOfInterest {
    ring: Vec<(f64, f64)>,
}

impl AreaOfInterest {
    /// Builds the AOI from the first feature of a vector boundary file.
    ///
    /// The layer CRS is auto-detected; anything that is not EPSG:4326 is
    /// reprojected to geographic lon/lat before the exterior ring is walked.
    pub fn from_vector_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let dataset = Dataset::open(path)?;
        let mut layer = dataset
            .layer(0)
            .map_err(|e| anyhow!("no vector layer in {}: {}", path.display(), e))?;
        let source_srs = layer.spatial_ref();

        let feature = layer
            .features()
            .next()
            .ok_or_else(|| anyhow!("no features in boundary file {}", path.display()))?;
        let geometry = feature
            .geometry()
            .ok_or_else(|| anyhow!("first feature of {} has no geometry", path.display()))?;

        let points = exterior_ring_points(geometry)?;
        let (mut xs, mut ys): (Vec<f64>, Vec<f64>) =
            points.iter().map(|&(x, y, _)| (x, y)).unzip();

        if let Some(srs) = source_srs {
            if !matches!(srs.auth_code(), Ok(4326)) {
                reproject_to_wgs84(&srs, &mut xs, &mut ys)?;
                println!("TRANSFORMED TO EPSG:4326");
            }
        }

        let ring = xs.into_iter().zip(ys).collect();
        let aoi = Self::from_ring(ring)?;
        println!("GEOMETRY GENERATED");
        Ok(aoi)
    }

    /// Builds the AOI from an explicit coordinate sequence, closing the ring
    /// if the input leaves it open.
    pub fn from_ring(mut ring: Vec<(f64, f64)>) -> Result<Self> {
        if ring.len() < 3 {
            return Err(anyhow!(
                "boundary ring needs at least 3 coordinates, got {}",
                ring.len()
            ));
        }
        if ring.first() != ring.last() {
            ring.push(ring[0]);
        }
        if ring.len() < 4 {
            return Err(anyhow!("boundary ring is degenerate"));
        }
        Ok(Self { ring })
    }

    /// The closed lon/lat coordinate sequence.
    pub fn ring(&self) -> &[(f64, f64)] {
        &self.ring
    }

    /// (min_lon, min_lat, max_lon, max_lat) of the ring.
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        let mut bbox = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for &(lon, lat) in &self.ring {
            bbox.0 = bbox.0.min(lon);
            bbox.1 = bbox.1.min(lat);
            bbox.2 = bbox.2.max(lon);
            bbox.3 = bbox.3.max(lat);
        }
        bbox
    }
}

/// Walks down to the exterior ring of a polygonal geometry.
fn exterior_ring_points(geometry: &Geometry) -> Result<Vec<(f64, f64, f64)>> {
    let ring = match geometry.geometry_type() {
        OGRwkbGeometryType::wkbPolygon | OGRwkbGeometryType::wkbPolygon25D => {
            if geometry.geometry_count() == 0 {
                return Err(anyhow!("polygon has no rings"));
            }
            geometry.get_geometry(0)
        }
        OGRwkbGeometryType::wkbMultiPolygon | OGRwkbGeometryType::wkbMultiPolygon25D => {
            if geometry.geometry_count() == 0 {
                return Err(anyhow!("multipolygon is empty"));
            }
            let polygon = geometry.get_geometry(0);
            if polygon.geometry_count() == 0 {
                return Err(anyhow!("polygon has no rings"));
            }
            return Ok(polygon.get_geometry(0).get_point_vec());
        }
        other => {
            return Err(anyhow!(
                "boundary geometry is not polygonal (OGR type {})",
                other
            ));
        }
    };
    Ok(ring.get_point_vec())
}

/// Transforms coordinate arrays in place from `source` to EPSG:4326.
///
/// Both ends are forced to traditional GIS axis order so x stays longitude
/// regardless of the authority's axis definition.
fn reproject_to_wgs84(source: &SpatialRef, xs: &mut [f64], ys: &mut [f64]) -> Result<()> {
    let mut src = source.clone();
    src.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
    let mut wgs84 = SpatialRef::from_epsg(4326)?;
    wgs84.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);

    let transform = CoordTransform::new(&src, &wgs84)?;
    let mut zs = vec![0.0f64; xs.len()];
    transform.transform_coords(xs, ys, &mut zs)?;
    Ok(())
}
