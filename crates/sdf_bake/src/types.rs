//! Core data types for volume baking.

use glam::{Affine3A, UVec3, Vec3};

use crate::error::{BakeError, Result};

/// Axis-aligned box stored as center and half-extents.
///
/// Bake bounds are expressed in the local space of the volume; the volume
/// transform places them in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  pub center: Vec3,
  /// Half-extents, never negative.
  pub extents: Vec3,
}

impl Bounds {
  /// Create bounds from center and half-extents.
  ///
  /// Negative extents are flipped so the box is always well formed.
  pub fn new(center: Vec3, extents: Vec3) -> Self {
    Self {
      center,
      extents: extents.abs(),
    }
  }

  /// Create bounds from min/max corners (in either order).
  pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
    Self::new((min + max) * 0.5, (max - min) * 0.5)
  }

  #[inline]
  pub fn min(&self) -> Vec3 {
    self.center - self.extents
  }

  #[inline]
  pub fn max(&self) -> Vec3 {
    self.center + self.extents
  }

  /// Full size (2 * extents).
  #[inline]
  pub fn size(&self) -> Vec3 {
    self.extents * 2.0
  }

  /// Length of the box diagonal.
  #[inline]
  pub fn diagonal(&self) -> f32 {
    self.size().length()
  }

  /// The eight corners, binary ZYX order.
  pub fn corners(&self) -> [Vec3; 8] {
    let (min, max) = (self.min(), self.max());
    std::array::from_fn(|i| {
      Vec3::new(
        if i & 1 == 0 { min.x } else { max.x },
        if i & 2 == 0 { min.y } else { max.y },
        if i & 4 == 0 { min.z } else { max.z },
      )
    })
  }

  /// AABB enclosing this box after `transform` is applied.
  pub fn transformed(&self, transform: &Affine3A) -> Aabb {
    let mut aabb = Aabb::empty();
    for corner in self.corners() {
      aabb.encapsulate(transform.transform_point3(corner));
    }
    aabb
  }

  #[inline]
  pub fn to_aabb(&self) -> Aabb {
    Aabb::new(self.min(), self.max())
  }
}

impl Default for Bounds {
  fn default() -> Self {
    Self::new(Vec3::ZERO, Vec3::splat(0.5))
  }
}

/// Min/max axis-aligned box, used for accumulation and intersection tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
  pub min: Vec3,
  pub max: Vec3,
}

impl Aabb {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: Vec3::splat(f32::INFINITY),
      max: Vec3::splat(f32::NEG_INFINITY),
    }
  }

  pub fn new(min: Vec3, max: Vec3) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: Vec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// Expand AABB to include another box.
  #[inline]
  pub fn union(&mut self, other: &Aabb) {
    self.min = self.min.min(other.min);
    self.max = self.max.max(other.max);
  }

  /// Check if AABB is valid (min <= max on all axes).
  #[inline]
  pub fn is_valid(&self) -> bool {
    self.min.cmple(self.max).all()
  }

  /// Two boxes overlap when they share any interior or boundary point.
  #[inline]
  pub fn overlaps(&self, other: &Aabb) -> bool {
    self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
  }

  #[inline]
  pub fn contains_point(&self, point: Vec3) -> bool {
    self.min.cmple(point).all() && self.max.cmpge(point).all()
  }

  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  /// Length of the diagonal, 0 for an invalid box.
  #[inline]
  pub fn diagonal(&self) -> f32 {
    if self.is_valid() {
      self.size().length()
    } else {
      0.0
    }
  }

  /// Convert to center/extents form. Returns `None` for an empty box.
  pub fn to_bounds(&self) -> Option<Bounds> {
    self
      .is_valid()
      .then(|| Bounds::from_min_max(self.min, self.max))
  }
}

impl Default for Aabb {
  fn default() -> Self {
    Self::empty()
  }
}

/// Voxel counts per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
  pub x: u32,
  pub y: u32,
  pub z: u32,
}

impl Dimensions {
  pub const fn new(x: u32, y: u32, z: u32) -> Self {
    Self { x, y, z }
  }

  pub const fn splat(n: u32) -> Self {
    Self::new(n, n, n)
  }

  /// Total voxel count.
  #[inline]
  pub fn voxel_count(&self) -> usize {
    self.x as usize * self.y as usize * self.z as usize
  }

  /// Voxels in one Z slice.
  #[inline]
  pub fn slice_len(&self) -> usize {
    self.x as usize * self.y as usize
  }

  #[inline]
  pub fn as_uvec3(&self) -> UVec3 {
    UVec3::new(self.x, self.y, self.z)
  }

  #[inline]
  pub fn as_vec3(&self) -> Vec3 {
    self.as_uvec3().as_vec3()
  }

  /// Check every axis is within `1..=max`.
  pub fn validate(&self, max: u32) -> Result<()> {
    for (axis, value) in [('x', self.x), ('y', self.y), ('z', self.z)] {
      if value == 0 || value > max {
        return Err(BakeError::InvalidDimension { axis, value, max });
      }
    }
    Ok(())
  }
}

impl From<[u32; 3]> for Dimensions {
  fn from(d: [u32; 3]) -> Self {
    Self::new(d[0], d[1], d[2])
  }
}

/// Whether collection should refit the bake bounds to the collected vertices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FitMode {
  /// Keep the caller's bounds.
  #[default]
  KeepBounds,
  /// Replace the bounds with the tight box around all collected vertices.
  FitToVertices,
}

impl From<bool> for FitMode {
  fn from(fit_to_vertices: bool) -> Self {
    if fit_to_vertices {
      FitMode::FitToVertices
    } else {
      FitMode::KeepBounds
    }
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
