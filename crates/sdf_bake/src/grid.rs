//! Volume grid: the voxelized bake region.
//!
//! ```text
//!   bounds.min                                    bounds.max
//!       ┌───────┬───────┬───────┬───────┐
//!       │   ×   │   ×   │   ×   │   ×   │   × = voxel center
//!       └───────┴───────┴───────┴───────┘
//!       │◄─────►│
//!       voxel_size = bounds.size / dimensions
//!
//!   center(i) = bounds.min + voxel_size * (i + 0.5)      (volume-local)
//!   world(i)  = transform * center(i)
//! ```

use glam::{Affine3A, UVec3, Vec3};

use crate::constants::{coord_to_index, index_to_coord, MAX_DIMENSION};
use crate::error::Result;
use crate::types::{Aabb, Bounds, Dimensions};

/// Validated bounds and dimensions for one bake.
///
/// Immutable once created; a rebake with different bounds builds new
/// settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeSettings {
  bounds: Bounds,
  dimensions: Dimensions,
  voxel_size: Vec3,
}

impl VolumeSettings {
  /// Create settings, enforcing [`MAX_DIMENSION`] per axis.
  pub fn new(bounds: Bounds, dimensions: Dimensions) -> Result<Self> {
    Self::with_max_dimension(bounds, dimensions, MAX_DIMENSION)
  }

  /// Create settings with a custom per-axis ceiling.
  pub fn with_max_dimension(bounds: Bounds, dimensions: Dimensions, max: u32) -> Result<Self> {
    dimensions.validate(max)?;
    Ok(Self {
      bounds,
      dimensions,
      voxel_size: bounds.size() / dimensions.as_vec3(),
    })
  }

  #[inline]
  pub fn bounds(&self) -> Bounds {
    self.bounds
  }

  #[inline]
  pub fn dimensions(&self) -> Dimensions {
    self.dimensions
  }

  #[inline]
  pub fn voxel_size(&self) -> Vec3 {
    self.voxel_size
  }

  #[inline]
  pub fn voxel_count(&self) -> usize {
    self.dimensions.voxel_count()
  }

  /// Bounds size divided by its smallest axis.
  ///
  /// Stored with baked assets so a renderer can undo the stretch of a
  /// non-cubic volume. Flat volumes (smallest axis 0) report `Vec3::ONE`.
  pub fn non_uniform_scale(&self) -> Vec3 {
    let size = self.bounds.size();
    let min_axis = size.min_element();
    if min_axis > 0.0 {
      size / min_axis
    } else {
      Vec3::ONE
    }
  }
}

/// Voxel index ↔ position mapping for a placed volume.
#[derive(Clone, Copy, Debug)]
pub struct VolumeGrid {
  settings: VolumeSettings,
  transform: Affine3A,
}

impl VolumeGrid {
  /// Create a grid placed by `transform` (volume-local → world).
  pub fn new(settings: VolumeSettings, transform: Affine3A) -> Self {
    Self {
      settings,
      transform,
    }
  }

  /// Create a grid with identity transform.
  pub fn untransformed(settings: VolumeSettings) -> Self {
    Self::new(settings, Affine3A::IDENTITY)
  }

  #[inline]
  pub fn settings(&self) -> &VolumeSettings {
    &self.settings
  }

  #[inline]
  pub fn transform(&self) -> &Affine3A {
    &self.transform
  }

  #[inline]
  pub fn dimensions(&self) -> Dimensions {
    self.settings.dimensions
  }

  #[inline]
  pub fn voxel_count(&self) -> usize {
    self.settings.voxel_count()
  }

  /// Voxel center in volume-local space.
  #[inline]
  pub fn voxel_center_local(&self, x: u32, y: u32, z: u32) -> Vec3 {
    let index = UVec3::new(x, y, z).as_vec3() + Vec3::splat(0.5);
    self.settings.bounds.min() + self.settings.voxel_size * index
  }

  /// Voxel center in world space.
  #[inline]
  pub fn voxel_center_world(&self, x: u32, y: u32, z: u32) -> Vec3 {
    self
      .transform
      .transform_point3(self.voxel_center_local(x, y, z))
  }

  /// Buffer index of a voxel (x fastest, then y, then z).
  #[inline]
  pub fn linear_index(&self, x: u32, y: u32, z: u32) -> usize {
    let dims = self.settings.dimensions;
    coord_to_index(
      x as usize,
      y as usize,
      z as usize,
      dims.x as usize,
      dims.y as usize,
    )
  }

  /// Voxel coordinates of a buffer index.
  #[inline]
  pub fn coord(&self, index: usize) -> UVec3 {
    let dims = self.settings.dimensions;
    let (x, y, z) = index_to_coord(index, dims.x as usize, dims.y as usize);
    UVec3::new(x as u32, y as u32, z as u32)
  }

  /// World-space AABB of the whole volume.
  pub fn world_bounds(&self) -> Aabb {
    self.settings.bounds.transformed(&self.transform)
  }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;
