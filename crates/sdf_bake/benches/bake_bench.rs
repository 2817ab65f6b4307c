//! Baking benchmarks.
//!
//! - **bvh_build**: BVH construction over UV spheres of growing density
//! - **estimate**: single-point sampling at different ray counts
//! - **bake**: full 16³ bakes of a sphere mesh

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Affine3A, Vec3};
use sdf_bake::{
  bake, bvh::TriangleBvh, BakeConfig, Bounds, CancellationToken, Dimensions, DistanceEstimator,
  GeometryEntry, RayDirections, RaySampler, TriangleMesh, VolumeGrid, VolumeSettings,
};

fn sphere_geometry(sectors: u32, stacks: u32) -> Vec<GeometryEntry> {
  let mesh = TriangleMesh::uv_sphere(1.0, sectors, stacks).expect("valid sphere");
  vec![GeometryEntry::new(Arc::new(mesh), Affine3A::IDENTITY)]
}

fn grid(dims: u32) -> VolumeGrid {
  let settings = VolumeSettings::new(Bounds::new(Vec3::ZERO, Vec3::splat(1.5)), Dimensions::splat(dims))
    .expect("valid settings");
  VolumeGrid::untransformed(settings)
}

fn bench_bvh_build(c: &mut Criterion) {
  let mut group = c.benchmark_group("bvh_build");

  for sectors in [16u32, 64, 128] {
    let geometry = sphere_geometry(sectors, sectors / 2);
    let triangles = geometry[0].mesh.triangle_count();
    group.bench_with_input(
      BenchmarkId::from_parameter(format!("{triangles}_tris")),
      &geometry,
      |b, geometry| b.iter(|| TriangleBvh::build(black_box(geometry))),
    );
  }

  group.finish();
}

fn bench_estimate(c: &mut Criterion) {
  let mut group = c.benchmark_group("estimate");
  let geometry = sphere_geometry(64, 32);
  let region = grid(16).world_bounds();

  for rays in [16u32, 64, 256] {
    let sampler = RaySampler::new(&geometry, RayDirections::generate(rays, 555, 0.75), region);
    group.bench_with_input(BenchmarkId::from_parameter(rays), &sampler, |b, sampler| {
      b.iter(|| sampler.estimate(black_box(Vec3::new(0.2, 0.1, -0.3))))
    });
  }

  group.finish();
}

fn bench_bake(c: &mut Criterion) {
  let mut group = c.benchmark_group("bake");
  group.sample_size(10);
  let geometry = sphere_geometry(32, 16);
  let grid = grid(16);

  for rays in [32u32, 128] {
    let config = BakeConfig::default().with_ray_count(rays);
    group.bench_with_input(BenchmarkId::new("sphere_16", rays), &config, |b, config| {
      b.iter(|| {
        let mut max = 0.0;
        bake(&grid, &geometry, config, &CancellationToken::new(), |result| {
          max = result.max_distance;
        })
        .expect("valid bake");
        black_box(max)
      })
    });
  }

  group.finish();
}

criterion_group!(benches, bench_bvh_build, bench_estimate, bench_bake);
criterion_main!(benches);
