// src/processing/pipeline.rs
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::aoi::AreaOfInterest;
use crate::catalog::Catalog;
use crate::io::export::{self, ExportJob, ExportTask};
use crate::io::parallel::ParallelSceneReader;
use crate::io::reader::GeoInfo;
use crate::io::writer::CreationProfile;
use crate::processing::clip::{self, ClipMask};
use crate::processing::indices;
use crate::processing::reduce::{reduce_collection, Reducer};
use crate::sensor::Sensor;
use crate::utils::cache::SceneCache;

pub struct PipelineParams {
    /// First acquisition date, inclusive.
    pub start: NaiveDate,
    /// Last acquisition date, exclusive.
    pub end: NaiveDate,
    /// Maximum scene-level cloud cover percentage.
    pub max_cloud_cover: f64,
    /// Destination folder for the exported composites.
    pub folder: PathBuf,
    /// Ground sample distance of the exports, in CRS units.
    pub scale: f64,
    pub max_pixels: u64,
    pub profile: CreationProfile,
    pub io_threads: Option<usize>,
}

pub struct PipelineSummary {
    pub images_used: usize,
    pub source: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub jobs: Vec<ExportJob>,
}

/// Runs the whole per-sensor pipeline: filter the catalog by date and cloud
/// cover, keep scenes touching the AOI, read them, mask/scale/rename, append
/// the six indices, reduce four ways, clip each composite to the AOI and
/// export it as `{prefix}_{reducer}`.
pub fn run(
    sensor: &dyn Sensor,
    catalog: Catalog,
    aoi: &AreaOfInterest,
    params: &PipelineParams,
) -> Result<PipelineSummary> {
    let filtered = catalog
        .filter_date(params.start, params.end)
        .filter_cloud_cover(params.max_cloud_cover);
    if filtered.is_empty() {
        return Err(anyhow!(
            "no {} scenes between {} and {} with cloud cover <= {}%",
            sensor.prefix(),
            params.start,
            params.end,
            params.max_cloud_cover
        ));
    }

    let cache = Arc::new(SceneCache::new());

    // Spatial filter: drop scenes whose extent misses the AOI entirely.
    let mut scenes = Vec::new();
    for record in filtered.scenes {
        let dataset = cache.get_dataset(&record.path)?;
        let geo = {
            let dataset = dataset.lock();
            GeoInfo::from_dataset(&dataset)?
        };
        let ring = clip::project_ring(aoi, &geo.projection)?;
        if clip::intersects(&geo, &ring) {
            scenes.push(record);
        }
    }
    if scenes.is_empty() {
        return Err(anyhow!(
            "no {} scenes intersect the area of interest",
            sensor.prefix()
        ));
    }

    let reader = ParallelSceneReader::new(params.io_threads, Arc::clone(&cache));
    let raw_scenes = reader.read_all(sensor, &scenes)?;

    let geo = raw_scenes[0].geo.clone();
    for raw in &raw_scenes[1..] {
        if !geo.same_grid(&raw.geo) {
            return Err(anyhow!(
                "scene {} is not co-registered with {}",
                raw.record.id,
                raw_scenes[0].record.id
            ));
        }
    }

    let mut images = Vec::with_capacity(raw_scenes.len());
    for (i, raw) in raw_scenes.iter().enumerate() {
        println!(
            "[{}/{}] masking and indexing {}",
            i + 1,
            raw_scenes.len(),
            raw.record.id
        );
        let mut image = sensor.mask_and_scale(raw)?;
        indices::add_standard_indices(&mut image)?;
        images.push(image);
    }

    let ring = clip::project_ring(aoi, &geo.projection)?;
    let mask = ClipMask::build(&ring, &geo);

    let mut jobs = Vec::with_capacity(Reducer::ALL.len());
    for reducer in Reducer::ALL {
        let mut composite = reduce_collection(&images, reducer)?;
        mask.apply(&mut composite);
        let task = ExportTask {
            name: format!("{}_{}", sensor.prefix(), reducer.name()),
            folder: params.folder.clone(),
            scale: params.scale,
            max_pixels: params.max_pixels,
            profile: params.profile.clone(),
        };
        jobs.push(export::submit(&task, &composite, &geo));
    }

    Ok(PipelineSummary {
        images_used: images.len(),
        source: sensor.source_id().to_string(),
        start: params.start,
        end: params.end,
        jobs,
    })
}
