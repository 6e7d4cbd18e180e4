/// Progress reporting and cancellation of the matching phase
///
pub mod progress;

use crate::geometry::IntersectionMethod;
use crate::matching::progress::{percent, Cancellation, ProgressNotifier};
use crate::scoring::optional_overlap_score;
use crate::shape::{BoundaryProvider, ShapeRef};
use crate::Errors;
use anyhow::Result;
use geo::Polygon;
use log::{debug, info};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Boundaries of all shapes, `boundaries[frame][index]`
///
pub type BoundaryCache = Vec<Vec<Option<Polygon<f64>>>>;

/// Key of the matching map: shape at `t` and shape at `t + 1`
///
pub type MatchingKey = (ShapeRef, ShapeRef);

/// Pairwise overlap scores of the shapes of consecutive frames.
///
/// The map is split into shards selected by the frame of the first shape, so the workers
/// filling different time steps rarely contend for the same lock.
///
#[derive(Debug)]
pub struct MatchingMap {
    shards: Vec<RwLock<HashMap<MatchingKey, f64>>>,
}

impl Default for MatchingMap {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl MatchingMap {
    pub fn new(shards: usize) -> Self {
        let shards = shards.max(1);
        Self {
            shards: (0..shards).map(|_| RwLock::new(HashMap::default())).collect(),
        }
    }

    fn shard(&self, frame: usize) -> &RwLock<HashMap<MatchingKey, f64>> {
        &self.shards[frame % self.shards.len()]
    }

    pub fn insert(&self, key: MatchingKey, score: f64) {
        self.shard(key.0.frame).write().unwrap().insert(key, score);
    }

    /// Inserts all scores of one time step under a single lock acquisition
    ///
    pub fn extend<T>(&self, frame: usize, scores: T)
    where
        T: IntoIterator<Item = (MatchingKey, f64)>,
    {
        let mut shard = self.shard(frame).write().unwrap();
        shard.extend(scores);
    }

    /// Score of the pair, `0.0` when the pair was never scored
    ///
    pub fn score(&self, from: ShapeRef, to: ShapeRef) -> f64 {
        self.shard(from.frame)
            .read()
            .unwrap()
            .get(&(from, to))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.shard_stats().iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Amount of stored pairs per shard
    ///
    pub fn shard_stats(&self) -> Vec<usize> {
        self.shards.iter().map(|s| s.read().unwrap().len()).collect()
    }

    pub fn clear(&mut self) {
        for shard in &mut self.shards {
            shard.get_mut().unwrap().clear();
        }
    }
}

/// Computes the boundaries of every shape in parallel
///
pub fn build_boundary_cache<S>(
    pool: &ThreadPool,
    frames: &[Vec<S>],
    provider: &dyn BoundaryProvider<S>,
) -> BoundaryCache
where
    S: Sync,
{
    pool.install(|| {
        frames
            .par_iter()
            .map(|frame| {
                frame
                    .iter()
                    .map(|shape| provider.boundary(shape))
                    .collect::<Vec<_>>()
            })
            .collect()
    })
}

/// Scores of every shape of frame `frame` against every shape of frame `frame + 1`
///
pub fn frame_pair_scores(
    frame: usize,
    current: &[Option<Polygon<f64>>],
    next: &[Option<Polygon<f64>>],
    method: IntersectionMethod,
) -> Vec<(MatchingKey, f64)> {
    current
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, left)| {
            next.iter().enumerate().map(move |(j, right)| {
                (
                    (ShapeRef::new(frame, i), ShapeRef::new(frame + 1, j)),
                    optional_overlap_score(left.as_ref(), right.as_ref(), method),
                )
            })
        })
        .collect()
}

/// Builds the matching map for all consecutive frame pairs.
///
/// The work is partitioned by time step and executed on `pool`. Progress is reported after
/// every finished step. When `cancellation` fires the phase stops with [`Errors::Cancelled`]
/// and the partial map is dropped.
///
/// # Parameters
/// * `pool` - worker pool
/// * `boundaries` - boundary cache of all frames
/// * `method` - intersection method
/// * `shards` - number of map shards
/// * `progress` - progress sink
/// * `cancellation` - cancellation handle
///
pub fn build_matching_map(
    pool: &ThreadPool,
    boundaries: &[Vec<Option<Polygon<f64>>>],
    method: IntersectionMethod,
    shards: usize,
    progress: &dyn ProgressNotifier,
    cancellation: &Cancellation,
) -> Result<MatchingMap> {
    let steps = boundaries.len().saturating_sub(1);
    let map = MatchingMap::new(shards);
    let done = AtomicUsize::new(0);
    progress.send(percent(0, steps));

    pool.install(|| {
        (0..steps).into_par_iter().try_for_each(|t| {
            if cancellation.is_cancelled() {
                return Err(Errors::Cancelled);
            }
            let scores = frame_pair_scores(t, &boundaries[t], &boundaries[t + 1], method);
            debug!("Frames {} -> {}: {} pairs scored", t, t + 1, scores.len());
            map.extend(t, scores);
            let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
            progress.send(percent(finished, steps));
            Ok(())
        })
    })?;

    info!(
        "Matching map is ready: {} steps, {} pairs, shards {:?}",
        steps,
        map.len(),
        map.shard_stats()
    );
    Ok(map)
}
