//! Test utilities for baker tests.
//!
//! Provides analytic estimators and geometry fixtures so the baker can be
//! checked without going through ray casting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::{Affine3A, Vec3};

use crate::geometry::{GeometryEntry, TriangleMesh};
use crate::sampler::DistanceEstimator;

// =============================================================================
// Analytic Estimators
// =============================================================================

/// Exact sphere distance. Negative inside.
pub struct SphereEstimator {
  pub center: Vec3,
  pub radius: f32,
}

impl SphereEstimator {
  pub fn at_origin(radius: f32) -> Self {
    Self {
      center: Vec3::ZERO,
      radius,
    }
  }
}

impl DistanceEstimator for SphereEstimator {
  fn estimate(&self, point: Vec3) -> f32 {
    (point - self.center).length() - self.radius
  }
}

/// Wraps an estimator and counts how often it is called.
pub struct CountingEstimator<E> {
  pub inner: E,
  calls: AtomicUsize,
}

impl<E: DistanceEstimator> CountingEstimator<E> {
  pub fn new(inner: E) -> Self {
    Self {
      inner,
      calls: AtomicUsize::new(0),
    }
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::Relaxed)
  }
}

impl<E: DistanceEstimator> DistanceEstimator for CountingEstimator<E> {
  fn estimate(&self, point: Vec3) -> f32 {
    self.calls.fetch_add(1, Ordering::Relaxed);
    self.inner.estimate(point)
  }
}

// =============================================================================
// Geometry Fixtures
// =============================================================================

/// Axis-aligned cube with the given half-size at `center`.
pub fn cube_entry(center: Vec3, half_size: f32) -> GeometryEntry {
  GeometryEntry::new(
    Arc::new(TriangleMesh::cuboid(Vec3::splat(half_size))),
    Affine3A::from_translation(center),
  )
}

/// Unit cube (side 1) at the origin.
pub fn unit_cube() -> GeometryEntry {
  cube_entry(Vec3::ZERO, 0.5)
}

/// Bit patterns of a buffer, for exact comparisons.
pub fn bits(values: &[f32]) -> Vec<u32> {
  values.iter().map(|v| v.to_bits()).collect()
}
