//! Ray primitives: ray/triangle and ray/box intersection.

use glam::Vec3;

use crate::constants::HIT_EPSILON;
use crate::types::Aabb;

/// Half-line from `origin` along unit `direction`.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
  pub origin: Vec3,
  pub direction: Vec3,
  /// Component-wise reciprocal of `direction` for slab tests.
  pub inv_direction: Vec3,
}

impl Ray {
  pub fn new(origin: Vec3, direction: Vec3) -> Self {
    Self {
      origin,
      direction,
      inv_direction: direction.recip(),
    }
  }

  #[inline]
  pub fn at(&self, t: f32) -> Vec3 {
    self.origin + self.direction * t
  }
}

/// Möller–Trumbore intersection, two-sided.
///
/// Returns the ray parameter of the hit when it lies in `[-HIT_EPSILON, ∞)`,
/// clamped to 0. An origin lying on the triangle reports a contact at 0.
/// Winding is ignored: the sampler decides inside/outside by parity, not by
/// facing.
#[inline]
pub fn intersect_triangle(ray: &Ray, tri: &[Vec3; 3]) -> Option<f32> {
  let edge1 = tri[1] - tri[0];
  let edge2 = tri[2] - tri[0];
  let p = ray.direction.cross(edge2);
  let det = edge1.dot(p);

  // Parallel to the triangle plane.
  if det.abs() < f32::EPSILON * edge1.length_squared().max(edge2.length_squared()) {
    return None;
  }
  let inv_det = det.recip();

  let s = ray.origin - tri[0];
  let u = s.dot(p) * inv_det;
  if !(0.0..=1.0).contains(&u) {
    return None;
  }

  let q = s.cross(edge1);
  let v = ray.direction.dot(q) * inv_det;
  if v < 0.0 || u + v > 1.0 {
    return None;
  }

  let t = edge2.dot(q) * inv_det;
  (t >= -HIT_EPSILON).then(|| t.max(0.0))
}

/// Slab test against an AABB.
///
/// Returns the entry parameter (clamped to 0 when the origin is inside) if
/// the box is hit before `t_max`.
#[inline]
pub fn intersect_aabb(ray: &Ray, aabb: &Aabb, t_max: f32) -> Option<f32> {
  let t1 = (aabb.min - ray.origin) * ray.inv_direction;
  let t2 = (aabb.max - ray.origin) * ray.inv_direction;

  let t_near = t1.min(t2).max_element().max(0.0);
  let t_far = t1.max(t2).min_element().min(t_max);

  (t_near <= t_far).then_some(t_near)
}

#[cfg(test)]
#[path = "ray_test.rs"]
mod ray_test;
