//! Triangle mesh data and per-bake geometry snapshots.

use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use glam::{Affine3A, Vec3};

use crate::error::{BakeError, Result};
use crate::types::{Aabb, Bounds};

/// Indexed triangle list in mesh-local space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
  positions: Vec<Vec3>,
  indices: Vec<u32>,
}

impl TriangleMesh {
  /// Create a mesh, checking that indices form whole triangles within range.
  pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self> {
    if indices.len() % 3 != 0 {
      return Err(BakeError::InvalidMesh(format!(
        "index count {} is not a multiple of 3",
        indices.len()
      )));
    }
    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
      return Err(BakeError::InvalidMesh(format!(
        "index {} out of range for {} positions",
        bad,
        positions.len()
      )));
    }
    Ok(Self { positions, indices })
  }

  /// Box with the given half-extents centered on the origin (12 triangles).
  pub fn cuboid(half_extents: Vec3) -> Self {
    let positions = Bounds::new(Vec3::ZERO, half_extents).corners().to_vec();
    // Outward winding, corners in binary ZYX order.
    const QUADS: [[u32; 4]; 6] = [
      [0, 4, 6, 2], // -X
      [1, 3, 7, 5], // +X
      [0, 1, 5, 4], // -Y
      [2, 6, 7, 3], // +Y
      [0, 2, 3, 1], // -Z
      [4, 5, 7, 6], // +Z
    ];
    let indices = QUADS
      .iter()
      .flat_map(|q| [q[0], q[1], q[2], q[0], q[2], q[3]])
      .collect();
    Self { positions, indices }
  }

  /// Square in the XZ plane facing +Y.
  pub fn plane(half_size: f32) -> Self {
    let h = half_size.abs();
    let positions = vec![
      Vec3::new(-h, 0.0, -h),
      Vec3::new(h, 0.0, -h),
      Vec3::new(h, 0.0, h),
      Vec3::new(-h, 0.0, h),
    ];
    Self {
      positions,
      indices: vec![0, 2, 1, 0, 3, 2],
    }
  }

  /// Closed UV sphere.
  pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32) -> Result<Self> {
    if sectors < 3 || stacks < 2 {
      return Err(BakeError::InvalidMesh(format!(
        "sphere needs at least 3 sectors and 2 stacks, got {}x{}",
        sectors, stacks
      )));
    }

    let mut positions = Vec::with_capacity(((stacks + 1) * sectors) as usize);
    for i in 0..=stacks {
      let phi = PI * i as f32 / stacks as f32;
      for j in 0..sectors {
        let theta = TAU * j as f32 / sectors as f32;
        positions.push(
          Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()) * radius,
        );
      }
    }

    let mut indices = Vec::with_capacity((stacks * sectors * 6) as usize);
    for i in 0..stacks {
      for j in 0..sectors {
        let next = (j + 1) % sectors;
        let k1 = i * sectors + j;
        let k1n = i * sectors + next;
        let k2 = (i + 1) * sectors + j;
        let k2n = (i + 1) * sectors + next;
        if i != 0 {
          indices.extend_from_slice(&[k1, k2, k1n]);
        }
        if i != stacks - 1 {
          indices.extend_from_slice(&[k1n, k2, k2n]);
        }
      }
    }

    Ok(Self { positions, indices })
  }

  #[inline]
  pub fn positions(&self) -> &[Vec3] {
    &self.positions
  }

  #[inline]
  pub fn indices(&self) -> &[u32] {
    &self.indices
  }

  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  /// Corner positions of one triangle.
  #[inline]
  pub fn triangle(&self, index: usize) -> [Vec3; 3] {
    let i = index * 3;
    [
      self.positions[self.indices[i] as usize],
      self.positions[self.indices[i + 1] as usize],
      self.positions[self.indices[i + 2] as usize],
    ]
  }

  /// Iterate over all triangles.
  pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
    (0..self.triangle_count()).map(|i| self.triangle(i))
  }
}

/// A mesh plus the world transform it had when collected.
///
/// The mesh is shared; the transform is a snapshot so later scene edits do
/// not leak into a bake in progress.
#[derive(Clone, Debug)]
pub struct GeometryEntry {
  pub mesh: Arc<TriangleMesh>,
  pub transform: Affine3A,
}

impl GeometryEntry {
  pub fn new(mesh: Arc<TriangleMesh>, transform: Affine3A) -> Self {
    Self { mesh, transform }
  }

  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.mesh.triangle_count()
  }

  /// Vertex positions in world space.
  pub fn world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
    self
      .mesh
      .positions()
      .iter()
      .map(|&p| self.transform.transform_point3(p))
  }

  /// Triangles in world space.
  pub fn world_triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
    self
      .mesh
      .triangles()
      .map(|tri| tri.map(|p| self.transform.transform_point3(p)))
  }

  /// World-space AABB of the referenced vertices.
  pub fn world_bounds(&self) -> Aabb {
    let mut aabb = Aabb::empty();
    for tri in self.world_triangles() {
      for p in tri {
        aabb.encapsulate(p);
      }
    }
    aabb
  }
}

/// Total triangle count over a geometry set.
pub fn total_triangles(geometry: &[GeometryEntry]) -> usize {
  geometry.iter().map(GeometryEntry::triangle_count).sum()
}

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;
