use glam::Vec3;

use super::*;

fn xy_triangle(z: f32) -> [Vec3; 3] {
  [
    Vec3::new(-1.0, -1.0, z),
    Vec3::new(1.0, -1.0, z),
    Vec3::new(0.0, 1.0, z),
  ]
}

#[test]
fn test_triangle_hit_distance() {
  let ray = Ray::new(Vec3::ZERO, Vec3::Z);
  let t = intersect_triangle(&ray, &xy_triangle(2.5)).expect("should hit");
  assert!((t - 2.5).abs() < 1e-6);
  assert!((ray.at(t) - Vec3::new(0.0, 0.0, 2.5)).length() < 1e-6);
}

#[test]
fn test_triangle_hit_is_two_sided() {
  let tri = xy_triangle(2.0);
  let reversed = [tri[0], tri[2], tri[1]];
  let ray = Ray::new(Vec3::ZERO, Vec3::Z);
  assert!(intersect_triangle(&ray, &tri).is_some());
  assert!(intersect_triangle(&ray, &reversed).is_some());
}

#[test]
fn test_triangle_behind_origin_is_missed() {
  let ray = Ray::new(Vec3::ZERO, Vec3::Z);
  assert!(intersect_triangle(&ray, &xy_triangle(-1.0)).is_none());
}

#[test]
fn test_origin_on_triangle_is_contact() {
  let tri = xy_triangle(0.0);
  let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.6, 0.8));
  assert_eq!(intersect_triangle(&ray, &tri), Some(0.0));

  // Just behind the surface still counts, clamped to 0.
  let behind = Ray::new(Vec3::new(0.0, 0.0, 5e-7), Vec3::Z);
  assert_eq!(intersect_triangle(&behind, &tri), Some(0.0));
}

#[test]
fn test_triangle_outside_edges_is_missed() {
  let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::Z);
  assert!(intersect_triangle(&ray, &xy_triangle(1.0)).is_none());
}

#[test]
fn test_parallel_ray_is_missed() {
  let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::X);
  assert!(intersect_triangle(&ray, &xy_triangle(1.0)).is_none());
}

#[test]
fn test_degenerate_triangle_is_missed() {
  let tri = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
  let ray = Ray::new(Vec3::new(0.5, 0.0, -1.0), Vec3::Z);
  assert!(intersect_triangle(&ray, &tri).is_none());
}

#[test]
fn test_aabb_hit_and_miss() {
  let aabb = Aabb::new(Vec3::splat(1.0), Vec3::splat(2.0));
  let toward = Ray::new(Vec3::ZERO, Vec3::ONE.normalize());
  let away = Ray::new(Vec3::ZERO, -Vec3::ONE.normalize());

  let t = intersect_aabb(&toward, &aabb, f32::INFINITY).expect("should hit");
  assert!((t - 3f32.sqrt()).abs() < 1e-5);
  assert!(intersect_aabb(&away, &aabb, f32::INFINITY).is_none());

  // Entry beyond t_max is rejected.
  assert!(intersect_aabb(&toward, &aabb, 1.0).is_none());
}

#[test]
fn test_aabb_origin_inside() {
  let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
  let ray = Ray::new(Vec3::ZERO, Vec3::X);
  assert_eq!(intersect_aabb(&ray, &aabb, f32::INFINITY), Some(0.0));
}

#[test]
fn test_aabb_axis_aligned_ray() {
  // Zero direction components produce infinite slabs.
  let aabb = Aabb::new(Vec3::new(3.0, -1.0, -1.0), Vec3::new(4.0, 1.0, 1.0));
  let ray = Ray::new(Vec3::ZERO, Vec3::X);
  let t = intersect_aabb(&ray, &aabb, f32::INFINITY).expect("should hit");
  assert!((t - 3.0).abs() < 1e-6);

  let offset = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::X);
  assert!(intersect_aabb(&offset, &aabb, f32::INFINITY).is_none());
}
