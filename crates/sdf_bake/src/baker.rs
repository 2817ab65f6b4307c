//! Volume baker: runs the sampler over every voxel of a grid.
//!
//! # Flow
//!
//! ```text
//! validate config + dimensions ──► build BVH + directions ──► per-Z-slice
//!         (no sampling yet)              (RaySampler)          par_chunks_mut
//!                                                                   │
//!   on_complete(BakeResult) ◄── drop sampler ◄── reduce max |d| ◄───┘
//! ```
//!
//! Each Z slice of the buffer is owned by exactly one worker, so writes need
//! no synchronization. Slice maxima are merged with rayon's `reduce`.
//!
//! Cancellation is checked at the start of every slice. A cancelled bake
//! never invokes its completion callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use web_time::Instant;

use crate::asset::normalize;
use crate::collector::{collect, CollectSource, GeometrySource};
use crate::constants::{
  DEFAULT_JITTER_SCALE, DEFAULT_JITTER_SEED, DEFAULT_RAY_COUNT, MAX_DIMENSION,
};
use crate::directions::RayDirections;
use crate::error::{BakeError, Result};
use crate::geometry::{total_triangles, GeometryEntry};
use crate::grid::{VolumeGrid, VolumeSettings};
use crate::sampler::{DistanceEstimator, RaySampler};
use crate::types::{Bounds, Dimensions, FitMode};

// =============================================================================
// Configuration
// =============================================================================

/// Sampling options for a bake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BakeConfig {
  /// Rays cast per voxel.
  pub ray_count: u32,
  /// Seed for direction jitter. Same seed, same field.
  pub jitter_seed: u64,
  /// Jitter strength in `[0, 1]`, relative to the mean ray spacing.
  pub jitter_scale: f32,
  /// Per-axis voxel ceiling.
  pub max_dimension: u32,
}

impl Default for BakeConfig {
  fn default() -> Self {
    Self {
      ray_count: DEFAULT_RAY_COUNT,
      jitter_seed: DEFAULT_JITTER_SEED,
      jitter_scale: DEFAULT_JITTER_SCALE,
      max_dimension: MAX_DIMENSION,
    }
  }
}

impl BakeConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_ray_count(mut self, count: u32) -> Self {
    self.ray_count = count;
    self
  }

  pub fn with_jitter_seed(mut self, seed: u64) -> Self {
    self.jitter_seed = seed;
    self
  }

  pub fn with_jitter_scale(mut self, scale: f32) -> Self {
    self.jitter_scale = scale;
    self
  }

  pub fn with_max_dimension(mut self, max: u32) -> Self {
    self.max_dimension = max;
    self
  }

  /// Check option ranges.
  pub fn validate(&self) -> Result<()> {
    if self.ray_count == 0 {
      return Err(BakeError::InvalidConfig("ray_count must be at least 1".into()));
    }
    if !self.jitter_scale.is_finite() || !(0.0..=1.0).contains(&self.jitter_scale) {
      return Err(BakeError::InvalidConfig(format!(
        "jitter_scale must be within [0, 1], got {}",
        self.jitter_scale
      )));
    }
    if self.max_dimension == 0 {
      return Err(BakeError::InvalidConfig(
        "max_dimension must be at least 1".into(),
      ));
    }
    Ok(())
  }
}

// =============================================================================
// Cancellation
// =============================================================================

/// Shared flag that stops a bake at the next slice boundary.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::Release);
  }

  #[inline]
  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }
}

// =============================================================================
// Results
// =============================================================================

/// Counters for a finished bake.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BakeStats {
  pub voxel_count: usize,
  pub ray_count: u32,
  pub triangle_count: usize,
  /// Wall time from validation to callback, in microseconds.
  pub elapsed_us: u64,
}

/// Raw distances for one bake, handed to the completion callback.
#[derive(Clone, Debug)]
pub struct BakeResult {
  pub settings: VolumeSettings,
  /// Signed distances, x fastest then y then z.
  pub distances: Vec<f32>,
  /// Largest finite `|distance|`. Zero means the field is degenerate.
  pub max_distance: f32,
  pub stats: BakeStats,
}

impl BakeResult {
  #[inline]
  pub fn is_degenerate(&self) -> bool {
    self.max_distance == 0.0
  }

  /// Distances divided by the max magnitude, in `[-1, 1]`.
  pub fn normalized(&self) -> Result<Vec<f32>> {
    normalize(&self.distances, self.max_distance)
  }

  pub fn into_parts(self) -> (VolumeSettings, Vec<f32>, f32) {
    (self.settings, self.distances, self.max_distance)
  }
}

/// How a bake ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BakeOutcome {
  /// Every voxel was sampled and the callback ran.
  Completed(BakeStats),
  /// The token was cancelled; the callback did not run.
  Cancelled,
}

impl BakeOutcome {
  #[inline]
  pub fn is_cancelled(&self) -> bool {
    matches!(self, BakeOutcome::Cancelled)
  }
}

// =============================================================================
// Baking
// =============================================================================

/// Sample `estimator` at every voxel center of `grid`.
///
/// Returns the buffer and the largest finite magnitude, or `None` if
/// `cancel` was set before the last slice finished.
#[tracing::instrument(skip_all, name = "baker::bake_field")]
pub fn bake_field<E>(
  grid: &VolumeGrid,
  estimator: &E,
  cancel: &CancellationToken,
) -> Option<(Vec<f32>, f32)>
where
  E: DistanceEstimator + ?Sized,
{
  let dims = grid.dimensions();
  let dim_x = dims.x as usize;
  let mut distances = vec![0.0f32; grid.voxel_count()];

  let max_distance = distances
    .par_chunks_mut(dims.slice_len())
    .enumerate()
    .map(|(z, slice)| {
      if cancel.is_cancelled() {
        return 0.0;
      }
      let mut slice_max = 0.0f32;
      for (i, out) in slice.iter_mut().enumerate() {
        let x = (i % dim_x) as u32;
        let y = (i / dim_x) as u32;
        let d = estimator.estimate(grid.voxel_center_world(x, y, z as u32));
        *out = d;
        if d.is_finite() {
          slice_max = slice_max.max(d.abs());
        }
      }
      slice_max
    })
    .reduce(|| 0.0, f32::max);

  if cancel.is_cancelled() {
    return None;
  }
  Some((distances, max_distance))
}

fn validate(grid: &VolumeGrid, config: &BakeConfig) -> Result<()> {
  config.validate()?;
  grid.dimensions().validate(config.max_dimension)
}

/// Build the result, log it and hand it to `on_complete`.
fn finish<F>(
  grid: &VolumeGrid,
  distances: Vec<f32>,
  max_distance: f32,
  mut stats: BakeStats,
  start: Instant,
  on_complete: F,
) -> BakeOutcome
where
  F: FnOnce(BakeResult),
{
  stats.elapsed_us = start.elapsed().as_micros() as u64;

  if max_distance == 0.0 {
    tracing::warn!(
      voxels = stats.voxel_count,
      "baked field is degenerate: every distance is zero"
    );
  }
  tracing::info!(
    voxels = stats.voxel_count,
    triangles = stats.triangle_count,
    max_distance,
    elapsed_us = stats.elapsed_us,
    "bake complete"
  );

  on_complete(BakeResult {
    settings: *grid.settings(),
    distances,
    max_distance,
    stats,
  });
  BakeOutcome::Completed(stats)
}

/// Bake `geometry` into `grid`.
///
/// Validation runs before any sampling. With no triangles the result is an
/// all-zero (degenerate) field and `on_complete` still runs. The BVH is
/// dropped before `on_complete` is called.
#[tracing::instrument(skip_all, name = "baker::bake")]
pub fn bake<F>(
  grid: &VolumeGrid,
  geometry: &[GeometryEntry],
  config: &BakeConfig,
  cancel: &CancellationToken,
  on_complete: F,
) -> Result<BakeOutcome>
where
  F: FnOnce(BakeResult),
{
  validate(grid, config)?;

  let start = Instant::now();
  let stats = BakeStats {
    voxel_count: grid.voxel_count(),
    ray_count: config.ray_count,
    triangle_count: total_triangles(geometry),
    elapsed_us: 0,
  };
  tracing::debug!(
    voxels = stats.voxel_count,
    triangles = stats.triangle_count,
    rays = stats.ray_count,
    "bake started"
  );

  let field = if stats.triangle_count == 0 {
    tracing::warn!("no triangles to bake, producing an empty field");
    (!cancel.is_cancelled()).then(|| (vec![0.0; grid.voxel_count()], 0.0))
  } else {
    let sampler = {
      let _span = tracing::info_span!("sampler_setup").entered();
      let directions =
        RayDirections::generate(config.ray_count, config.jitter_seed, config.jitter_scale);
      RaySampler::new(geometry, directions, grid.world_bounds())
    };
    bake_field(grid, &sampler, cancel)
  };

  let Some((distances, max_distance)) = field else {
    tracing::debug!("bake cancelled");
    return Ok(BakeOutcome::Cancelled);
  };
  Ok(finish(grid, distances, max_distance, stats, start, on_complete))
}

/// Bake an arbitrary estimator into `grid`.
///
/// Same validation, cancellation and callback contract as [`bake`], for
/// fields that do not come from triangles.
pub fn bake_with_estimator<E, F>(
  grid: &VolumeGrid,
  estimator: &E,
  config: &BakeConfig,
  cancel: &CancellationToken,
  on_complete: F,
) -> Result<BakeOutcome>
where
  E: DistanceEstimator + ?Sized,
  F: FnOnce(BakeResult),
{
  validate(grid, config)?;

  let start = Instant::now();
  let stats = BakeStats {
    voxel_count: grid.voxel_count(),
    ray_count: 0,
    triangle_count: 0,
    elapsed_us: 0,
  };

  match bake_field(grid, estimator, cancel) {
    Some((distances, max_distance)) => Ok(finish(
      grid,
      distances,
      max_distance,
      stats,
      start,
      on_complete,
    )),
    None => {
      tracing::debug!("bake cancelled");
      Ok(BakeOutcome::Cancelled)
    }
  }
}

/// Collect geometry for `root` and bake it.
///
/// `bounds` may be refitted by the collector (see [`FitMode`]); the caller
/// sees the refitted value whether or not the bake completes. Returns
/// [`BakeError::NoGeometryFound`] without calling `on_complete` when nothing
/// can be collected.
#[allow(clippy::too_many_arguments)]
pub fn bake_scene<S, F>(
  source: &S,
  root: S::Node,
  bounds: &mut Bounds,
  dimensions: Dimensions,
  fit: FitMode,
  config: &BakeConfig,
  cancel: &CancellationToken,
  on_complete: F,
) -> Result<BakeOutcome>
where
  S: GeometrySource + ?Sized,
  F: FnOnce(BakeResult),
{
  config.validate()?;
  dimensions.validate(config.max_dimension)?;

  let collection = collect(source, root, bounds, fit);
  if collection.source == CollectSource::Nothing {
    tracing::warn!("no geometry found for volume");
    return Err(BakeError::NoGeometryFound);
  }

  let settings = VolumeSettings::with_max_dimension(*bounds, dimensions, config.max_dimension)?;
  let grid = VolumeGrid::new(settings, source.world_transform(root));
  bake(&grid, &collection.entries, config, cancel, on_complete)
}

#[cfg(test)]
#[path = "baker_test.rs"]
mod baker_test;
