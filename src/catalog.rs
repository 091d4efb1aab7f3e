// src/catalog.rs
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One scene in the local collection: a multi-band raster plus the metadata
/// the collection filters run on.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SceneRecord {
    pub id: String,
    pub path: PathBuf,
    pub date: NaiveDate,
    /// Scene-level cloud cover percentage from the provider metadata.
    pub cloud_cover: f64,
}

/// Scene collection loaded from a JSON manifest.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Catalog {
    pub scenes: Vec<SceneRecord>,
}

impl Catalog {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scene manifest {}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&content)
            .with_context(|| format!("parsing scene manifest {}", path.display()))?;
        Ok(catalog)
    }

    /// Keeps scenes acquired in [start, end).
    pub fn filter_date(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.scenes.retain(|s| s.date >= start && s.date < end);
        self
    }

    /// Keeps scenes with cloud cover at or below `max_pct`.
    pub fn filter_cloud_cover(mut self, max_pct: f64) -> Self {
        self.scenes.retain(|s| s.cloud_cover <= max_pct);
        self
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
