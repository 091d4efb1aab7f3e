// src/io/parallel.rs
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Result};
use flume::{Receiver, Sender};

use crate::catalog::SceneRecord;
use crate::io::reader::{read_scene, RawScene};
use crate::sensor::Sensor;
use crate::utils::cache::SceneCache;

struct SceneReadRequest {
    idx: usize,
    record: SceneRecord,
}

/// Reads whole scenes concurrently on a pool of I/O worker threads fed over
/// flume channels, returning them in catalog order.
pub struct ParallelSceneReader {
    io_threads: usize,
    cache: Arc<SceneCache>,
}

impl ParallelSceneReader {
    pub fn new(io_threads: Option<usize>, cache: Arc<SceneCache>) -> Self {
        let io_threads = io_threads.unwrap_or_else(|| num_cpus::get().max(4));
        Self { io_threads, cache }
    }

    pub fn read_all(&self, sensor: &dyn Sensor, scenes: &[SceneRecord]) -> Result<Vec<RawScene>> {
        if scenes.is_empty() {
            return Ok(Vec::new());
        }

        let reflectance: Vec<String> = sensor.raw_bands().iter().map(|s| s.to_string()).collect();
        let qa: Vec<String> = sensor.qa_bands().iter().map(|s| s.to_string()).collect();

        let (req_tx, req_rx) = flume::unbounded::<SceneReadRequest>();
        let (res_tx, res_rx) = flume::unbounded::<(usize, Result<RawScene>)>();

        let mut workers: Vec<JoinHandle<()>> = Vec::new();
        for _ in 0..self.io_threads.min(scenes.len()) {
            let req_rx: Receiver<SceneReadRequest> = req_rx.clone();
            let res_tx: Sender<(usize, Result<RawScene>)> = res_tx.clone();
            let cache = Arc::clone(&self.cache);
            let reflectance = reflectance.clone();
            let qa = qa.clone();

            workers.push(thread::spawn(move || {
                for request in req_rx {
                    let result = read_one(&cache, &request.record, &reflectance, &qa);
                    if res_tx.send((request.idx, result)).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(res_tx);

        for (idx, record) in scenes.iter().enumerate() {
            req_tx
                .send(SceneReadRequest {
                    idx,
                    record: record.clone(),
                })
                .map_err(|_| anyhow!("scene read workers exited early"))?;
        }
        drop(req_tx);

        let mut slots: Vec<Option<Result<RawScene>>> = (0..scenes.len()).map(|_| None).collect();
        for (idx, result) in res_rx {
            slots[idx] = Some(result);
        }

        for worker in workers {
            if worker.join().is_err() {
                return Err(anyhow!("scene read worker panicked"));
            }
        }

        let mut out = Vec::with_capacity(scenes.len());
        for (slot, record) in slots.into_iter().zip(scenes) {
            let result =
                slot.ok_or_else(|| anyhow!("no read result for scene {}", record.id))?;
            out.push(result?);
        }
        Ok(out)
    }
}

fn read_one(
    cache: &SceneCache,
    record: &SceneRecord,
    reflectance: &[String],
    qa: &[String],
) -> Result<RawScene> {
    let dataset = cache.get_dataset(&record.path)?;
    let dataset = dataset.lock();
    let reflectance: Vec<&str> = reflectance.iter().map(String::as_str).collect();
    let qa: Vec<&str> = qa.iter().map(String::as_str).collect();
    read_scene(&dataset, record, &reflectance, &qa)
}
