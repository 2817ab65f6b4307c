//! Ray direction sets for the distance sampler.
//!
//! A spherical Fibonacci lattice gives near-uniform coverage for any count;
//! a seeded jitter then breaks up the lattice so thin features aligned with
//! it are not consistently missed. The same `(count, seed, scale)` always
//! produces bit-identical directions.

use std::f32::consts::PI;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Golden angle in radians: π (3 − √5).
const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Unit directions shared by every voxel of a bake.
#[derive(Clone, Debug, PartialEq)]
pub struct RayDirections {
  directions: Vec<Vec3>,
}

impl RayDirections {
  /// Generate `count` jittered directions.
  ///
  /// Each base direction gets a uniform offset in `[-1, 1]³` scaled by
  /// `jitter_scale * sqrt(4π / count)` (the mean spacing between lattice
  /// points), then is renormalized. Offsets are drawn from one generator in
  /// ray order.
  pub fn generate(count: u32, seed: u64, jitter_scale: f32) -> Self {
    let mut directions = fibonacci_sphere(count);
    if count == 0 || jitter_scale == 0.0 {
      return Self { directions };
    }

    let spacing = (4.0 * PI / count as f32).sqrt();
    let amount = jitter_scale * spacing;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for dir in &mut directions {
      let offset = Vec3::new(
        rng.random_range(-1.0..=1.0),
        rng.random_range(-1.0..=1.0),
        rng.random_range(-1.0..=1.0),
      );
      *dir = (*dir + offset * amount).normalize_or(*dir);
    }

    Self { directions }
  }

  /// Use caller-provided directions as-is (normalized).
  pub fn from_directions(directions: impl IntoIterator<Item = Vec3>) -> Self {
    Self {
      directions: directions
        .into_iter()
        .filter_map(|d| d.try_normalize())
        .collect(),
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.directions.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.directions.is_empty()
  }

  #[inline]
  pub fn as_slice(&self) -> &[Vec3] {
    &self.directions
  }

  pub fn iter(&self) -> impl Iterator<Item = &Vec3> {
    self.directions.iter()
  }
}

/// `count` points of a spherical Fibonacci lattice on the unit sphere.
pub fn fibonacci_sphere(count: u32) -> Vec<Vec3> {
  let n = count as f32;
  (0..count)
    .map(|i| {
      let y = 1.0 - 2.0 * (i as f32 + 0.5) / n;
      let radius = (1.0 - y * y).max(0.0).sqrt();
      let theta = GOLDEN_ANGLE * i as f32;
      Vec3::new(theta.cos() * radius, y, theta.sin() * radius)
    })
    .collect()
}

#[cfg(test)]
#[path = "directions_test.rs"]
mod directions_test;
