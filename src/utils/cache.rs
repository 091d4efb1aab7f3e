// src/utils/cache.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use gdal::Dataset;
use parking_lot::Mutex;

/// Thread-safe cache of open GDAL datasets, keyed by path.
///
/// The spatial-filter probe and the scene readers share one handle per file
/// instead of reopening it.
pub struct SceneCache {
    datasets: Mutex<HashMap<PathBuf, Arc<Mutex<Dataset>>>>,
}

impl SceneCache {
    pub fn new() -> Self {
        Self {
            datasets: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_dataset<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Mutex<Dataset>>> {
        let path = path.as_ref();
        let mut open = self.datasets.lock();
        if let Some(dataset) = open.get(path) {
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(Mutex::new(Dataset::open(path)?));
        open.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn clear(&self) {
        self.datasets.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.datasets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SceneCache {
    fn default() -> Self {
        Self::new()
    }
}
