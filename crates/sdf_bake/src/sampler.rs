//! Ray-cast signed distance estimation.
//!
//! For each query point a fixed set of rays is cast through the triangle
//! BVH:
//!
//! ```text
//!         ↑ hit (1 crossing: votes inside)
//!    ┌────┼─────┐
//!    │    ●────────→ hit, hit (2 crossings: votes outside)
//!    │    │     │
//!    └────┼─────┘
//!         ↓ hit (nearest first hit = unsigned distance)
//! ```
//!
//! The magnitude is the nearest first hit over all rays. The sign comes from
//! parity: a ray with an odd number of crossings votes inside, and the point
//! is inside only with a strict majority of all rays. Winding is never
//! consulted, so meshes with flipped or inconsistent triangles still sign
//! correctly as long as they are closed.

use glam::Vec3;
use smallvec::SmallVec;

use crate::bvh::TriangleBvh;
use crate::constants::{HIT_EPSILON, HIT_MERGE_EPSILON};
use crate::directions::RayDirections;
use crate::geometry::GeometryEntry;
use crate::ray::Ray;
use crate::types::Aabb;

/// Extra length added to parity rays beyond twice the scene diagonal.
const RAY_LENGTH_MARGIN: f32 = 1.0;

/// Point → signed distance. Negative inside.
///
/// Implementations must be pure: the baker calls them from many threads in
/// any order.
pub trait DistanceEstimator: Send + Sync {
  fn estimate(&self, point: Vec3) -> f32;
}

/// Closures are estimators (analytic fields in tests and benches).
impl<F> DistanceEstimator for F
where
  F: Fn(Vec3) -> f32 + Send + Sync,
{
  fn estimate(&self, point: Vec3) -> f32 {
    self(point)
  }
}

/// Per-point sampling detail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
  /// Signed distance, negative inside.
  pub distance: f32,
  /// Rays with an odd crossing count.
  pub inside_votes: u32,
  /// Rays that hit anything at all.
  pub hit_rays: u32,
}

/// Signed distance sampler over a fixed set of world-space triangles.
#[derive(Clone, Debug)]
pub struct RaySampler {
  bvh: TriangleBvh,
  directions: RayDirections,
  far_distance: f32,
  ray_length: f32,
}

impl RaySampler {
  /// Build a sampler for `geometry` covering the world-space bake `region`.
  ///
  /// Points that see no geometry at all report the diagonal of `region`
  /// (the far sentinel) as an exterior distance.
  pub fn new(geometry: &[GeometryEntry], directions: RayDirections, region: Aabb) -> Self {
    Self::from_bvh(TriangleBvh::build(geometry), directions, region)
  }

  pub fn from_bvh(bvh: TriangleBvh, directions: RayDirections, region: Aabb) -> Self {
    let far_distance = region.diagonal();

    // No triangle is farther than the union diagonal from any voxel center.
    let mut scene = bvh.bounds();
    if region.is_valid() {
      scene.union(&region);
    }
    let ray_length = scene.diagonal() * 2.0 + RAY_LENGTH_MARGIN;

    Self {
      bvh,
      directions,
      far_distance,
      ray_length,
    }
  }

  #[inline]
  pub fn far_distance(&self) -> f32 {
    self.far_distance
  }

  #[inline]
  pub fn ray_length(&self) -> f32 {
    self.ray_length
  }

  #[inline]
  pub fn ray_count(&self) -> usize {
    self.directions.len()
  }

  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.bvh.triangle_count()
  }

  /// Signed distance with vote counts.
  pub fn estimate_detailed(&self, point: Vec3) -> Estimate {
    let merge_distance = HIT_MERGE_EPSILON * self.ray_length;
    let mut nearest = f32::INFINITY;
    let mut inside_votes = 0u32;
    let mut hit_rays = 0u32;
    let mut hits: SmallVec<[f32; 16]> = SmallVec::new();

    for &direction in self.directions.iter() {
      hits.clear();
      let mut contact = false;
      let ray = Ray::new(point, direction);
      self.bvh.for_each_hit(&ray, self.ray_length, |t| {
        if t <= HIT_EPSILON {
          contact = true;
        } else {
          hits.push(t);
        }
      });

      // A contact pins the magnitude to 0 but is not a crossing.
      if contact {
        hit_rays += 1;
        nearest = 0.0;
      }
      if hits.is_empty() {
        continue;
      }

      hits.sort_unstable_by(f32::total_cmp);
      if !contact {
        hit_rays += 1;
      }
      nearest = nearest.min(hits[0]);

      // Hits on a shared edge or vertex show up once per adjacent triangle.
      let mut crossings = 1u32;
      let mut last = hits[0];
      for &t in &hits[1..] {
        if t - last > merge_distance {
          crossings += 1;
          last = t;
        }
      }
      if crossings % 2 == 1 {
        inside_votes += 1;
      }
    }

    let unsigned = if nearest.is_finite() {
      nearest
    } else {
      self.far_distance
    };
    let inside = inside_votes as usize * 2 > self.directions.len();

    Estimate {
      distance: if inside { -unsigned } else { unsigned },
      inside_votes,
      hit_rays,
    }
  }
}

impl DistanceEstimator for RaySampler {
  #[inline]
  fn estimate(&self, point: Vec3) -> f32 {
    self.estimate_detailed(point).distance
  }
}

#[cfg(test)]
#[path = "sampler_test.rs"]
mod sampler_test;
