use std::collections::HashSet;

use glam::{Affine3A, Quat, Vec3};

use super::*;
use crate::error::BakeError;

fn unit_settings(dims: Dimensions) -> VolumeSettings {
  VolumeSettings::new(Bounds::new(Vec3::ZERO, Vec3::ONE), dims).expect("valid settings")
}

#[test]
fn test_voxel_size() {
  let settings = VolumeSettings::new(
    Bounds::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 4.0)),
    Dimensions::new(2, 4, 16),
  )
  .unwrap();
  assert_eq!(settings.voxel_size(), Vec3::new(1.0, 1.0, 0.5));
  assert_eq!(settings.voxel_count(), 128);
}

#[test]
fn test_dimension_ceiling() {
  let result = VolumeSettings::new(Bounds::default(), Dimensions::new(257, 1, 1));
  assert_eq!(
    result,
    Err(BakeError::InvalidDimension {
      axis: 'x',
      value: 257,
      max: 256
    })
  );

  let custom = VolumeSettings::with_max_dimension(Bounds::default(), Dimensions::splat(64), 32);
  assert!(matches!(
    custom,
    Err(BakeError::InvalidDimension { value: 64, max: 32, .. })
  ));
}

#[test]
fn test_non_uniform_scale() {
  let settings = VolumeSettings::new(
    Bounds::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 4.0)),
    Dimensions::splat(8),
  )
  .unwrap();
  assert_eq!(settings.non_uniform_scale(), Vec3::new(1.0, 2.0, 4.0));

  let flat = VolumeSettings::new(
    Bounds::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)),
    Dimensions::splat(8),
  )
  .unwrap();
  assert_eq!(flat.non_uniform_scale(), Vec3::ONE);
}

#[test]
fn test_voxel_centers_local() {
  let grid = VolumeGrid::untransformed(unit_settings(Dimensions::splat(2)));
  assert_eq!(grid.voxel_center_local(0, 0, 0), Vec3::splat(-0.5));
  assert_eq!(grid.voxel_center_local(1, 1, 1), Vec3::splat(0.5));
  assert_eq!(grid.voxel_center_local(1, 0, 1), Vec3::new(0.5, -0.5, 0.5));
}

#[test]
fn test_voxel_centers_world() {
  let transform = Affine3A::from_scale_rotation_translation(
    Vec3::new(2.0, 1.0, 1.0),
    Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
    Vec3::new(10.0, 0.0, 0.0),
  );
  let grid = VolumeGrid::new(unit_settings(Dimensions::splat(2)), transform);

  // Local (0.5, -0.5, -0.5): scaled x → 1.0, then rotated 90° about Z.
  let world = grid.voxel_center_world(1, 0, 0);
  assert!((world - Vec3::new(10.5, 1.0, -0.5)).length() < 1e-5);
}

#[test]
fn test_linear_index_is_bijection() {
  let grid = VolumeGrid::untransformed(unit_settings(Dimensions::new(3, 4, 5)));
  let count = grid.voxel_count();
  let mut seen = HashSet::new();

  for z in 0..5 {
    for y in 0..4 {
      for x in 0..3 {
        let idx = grid.linear_index(x, y, z);
        assert!(idx < count, "index {} out of range", idx);
        assert!(seen.insert(idx), "index {} produced twice", idx);
        assert_eq!(grid.coord(idx), glam::UVec3::new(x, y, z));
      }
    }
  }

  assert_eq!(seen.len(), count);
}

#[test]
fn test_world_bounds() {
  let grid = VolumeGrid::new(
    unit_settings(Dimensions::splat(4)),
    Affine3A::from_translation(Vec3::new(0.0, 5.0, 0.0)),
  );
  let aabb = grid.world_bounds();
  assert_eq!(aabb.min, Vec3::new(-1.0, 4.0, -1.0));
  assert_eq!(aabb.max, Vec3::new(1.0, 6.0, 1.0));
}
