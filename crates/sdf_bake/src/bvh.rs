//! Bounding volume hierarchy over world-space triangles.
//!
//! Built once per bake from the collected geometry and dropped when the bake
//! finishes. Triangles are stored inline and reordered during the build so
//! each node owns a contiguous range.
//!
//! ```text
//!              [0] root (interior: left_first → child pair)
//!             /    \
//!          [1]      [2]
//!         /   \        (leaf: left_first = first triangle, tri_count > 0)
//!      [3]     [4]
//! ```

use glam::Vec3;
use smallvec::{smallvec, SmallVec};

use crate::constants::BVH_LEAF_SIZE;
use crate::geometry::GeometryEntry;
use crate::ray::{intersect_aabb, intersect_triangle, Ray};
use crate::types::Aabb;

#[derive(Clone, Copy, Debug)]
struct BvhNode {
  aabb: Aabb,
  /// Interior: index of the left child (right is `left_first + 1`).
  /// Leaf: index of the first triangle.
  left_first: u32,
  /// 0 for interior nodes.
  tri_count: u32,
}

impl BvhNode {
  #[inline]
  fn is_leaf(&self) -> bool {
    self.tri_count > 0
  }
}

/// Triangle BVH answering nearest-hit and all-hits ray queries.
#[derive(Clone, Debug, Default)]
pub struct TriangleBvh {
  nodes: Vec<BvhNode>,
  triangles: Vec<[Vec3; 3]>,
}

type TraversalStack = SmallVec<[u32; 64]>;

#[inline]
fn centroid(tri: &[Vec3; 3]) -> Vec3 {
  (tri[0] + tri[1] + tri[2]) * (1.0 / 3.0)
}

/// Node bounds, padded slightly so hits on a box face are not lost to
/// rounding in the slab test.
fn bounds_of(triangles: &[[Vec3; 3]]) -> Aabb {
  let mut aabb = Aabb::empty();
  for tri in triangles {
    for &p in tri {
      aabb.encapsulate(p);
    }
  }
  let pad = aabb.size().max_element().max(1.0) * 1e-5;
  Aabb::new(aabb.min - Vec3::splat(pad), aabb.max + Vec3::splat(pad))
}

impl TriangleBvh {
  /// Build from every triangle of `geometry`, transformed to world space.
  #[tracing::instrument(skip_all, name = "bvh::build")]
  pub fn build(geometry: &[GeometryEntry]) -> Self {
    let triangles = geometry
      .iter()
      .flat_map(|entry| entry.world_triangles())
      .collect();
    Self::from_triangles(triangles)
  }

  /// Build from world-space triangles (median split on the widest centroid
  /// axis).
  pub fn from_triangles(mut triangles: Vec<[Vec3; 3]>) -> Self {
    if triangles.is_empty() {
      return Self::default();
    }

    let count = triangles.len();
    let mut nodes = Vec::with_capacity(2 * count.div_ceil(BVH_LEAF_SIZE));
    nodes.push(BvhNode {
      aabb: bounds_of(&triangles),
      left_first: 0,
      tri_count: count as u32,
    });

    let mut stack = vec![0usize];
    while let Some(node_idx) = stack.pop() {
      let node = nodes[node_idx];
      let first = node.left_first as usize;
      let count = node.tri_count as usize;
      if count <= BVH_LEAF_SIZE {
        continue;
      }

      let range = first..first + count;
      let mut centroid_bounds = Aabb::empty();
      for tri in &triangles[range.clone()] {
        centroid_bounds.encapsulate(centroid(tri));
      }
      let extent = centroid_bounds.size();
      let axis = if extent.x >= extent.y && extent.x >= extent.z {
        0
      } else if extent.y >= extent.z {
        1
      } else {
        2
      };
      // All centroids coincide; splitting cannot separate them.
      if extent[axis] <= 0.0 {
        continue;
      }

      let mid = count / 2;
      triangles[range].select_nth_unstable_by(mid, |a, b| {
        centroid(a)[axis].total_cmp(&centroid(b)[axis])
      });

      let left_idx = nodes.len();
      nodes.push(BvhNode {
        aabb: bounds_of(&triangles[first..first + mid]),
        left_first: first as u32,
        tri_count: mid as u32,
      });
      nodes.push(BvhNode {
        aabb: bounds_of(&triangles[first + mid..first + count]),
        left_first: (first + mid) as u32,
        tri_count: (count - mid) as u32,
      });

      nodes[node_idx].left_first = left_idx as u32;
      nodes[node_idx].tri_count = 0;
      stack.push(left_idx);
      stack.push(left_idx + 1);
    }

    tracing::trace!(
      triangles = triangles.len(),
      nodes = nodes.len(),
      "bvh built"
    );

    Self { nodes, triangles }
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.triangles.is_empty()
  }

  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.triangles.len()
  }

  #[inline]
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// World-space bounds of all triangles (empty box when there are none).
  pub fn bounds(&self) -> Aabb {
    self.nodes.first().map_or_else(Aabb::empty, |n| n.aabb)
  }

  /// Distance to the nearest hit within `t_max`.
  pub fn nearest_hit(&self, ray: &Ray, t_max: f32) -> Option<f32> {
    if self.nodes.is_empty() {
      return None;
    }

    let mut best = t_max;
    let mut found = false;
    let mut stack: TraversalStack = smallvec![0];

    while let Some(idx) = stack.pop() {
      let node = &self.nodes[idx as usize];
      if node.is_leaf() {
        let first = node.left_first as usize;
        for tri in &self.triangles[first..first + node.tri_count as usize] {
          if let Some(t) = intersect_triangle(ray, tri) {
            if t <= best {
              best = t;
              found = true;
            }
          }
        }
        continue;
      }

      let left = node.left_first;
      let right = left + 1;
      let t_left = intersect_aabb(ray, &self.nodes[left as usize].aabb, best);
      let t_right = intersect_aabb(ray, &self.nodes[right as usize].aabb, best);

      // Push the farther child first so the nearer one is visited next.
      match (t_left, t_right) {
        (Some(l), Some(r)) if l <= r => {
          stack.push(right);
          stack.push(left);
        }
        (Some(_), Some(_)) => {
          stack.push(left);
          stack.push(right);
        }
        (Some(_), None) => stack.push(left),
        (None, Some(_)) => stack.push(right),
        (None, None) => {}
      }
    }

    found.then_some(best)
  }

  /// Call `on_hit` with the distance of every hit within `t_max`, in no
  /// particular order.
  pub fn for_each_hit(&self, ray: &Ray, t_max: f32, mut on_hit: impl FnMut(f32)) {
    if self.nodes.is_empty() {
      return;
    }

    let mut stack: TraversalStack = smallvec![0];
    while let Some(idx) = stack.pop() {
      let node = &self.nodes[idx as usize];
      if intersect_aabb(ray, &node.aabb, t_max).is_none() {
        continue;
      }

      if node.is_leaf() {
        let first = node.left_first as usize;
        for tri in &self.triangles[first..first + node.tri_count as usize] {
          if let Some(t) = intersect_triangle(ray, tri) {
            if t <= t_max {
              on_hit(t);
            }
          }
        }
      } else {
        stack.push(node.left_first);
        stack.push(node.left_first + 1);
      }
    }
  }
}

#[cfg(test)]
#[path = "bvh_test.rs"]
mod bvh_test;
