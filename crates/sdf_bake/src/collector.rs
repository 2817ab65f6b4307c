//! Geometry collection for a bake volume.
//!
//! Two strategies, tried in order:
//!
//! 1. **Children**: every renderable below the volume node. Bounds are
//!    ignored for selection and can be refitted to the collected vertices.
//! 2. **Intersecting**: every renderable in the scene whose world AABB
//!    overlaps the volume's world AABB.
//!
//! Renderables without triangles are skipped in both.

use glam::Affine3A;

use crate::geometry::{total_triangles, GeometryEntry};
use crate::types::{Aabb, Bounds, FitMode};

/// Scene access needed by the collector.
pub trait GeometrySource {
  /// Handle to a node in the source's hierarchy.
  type Node: Copy;

  /// Local → world transform of `node`.
  fn world_transform(&self, node: Self::Node) -> Affine3A;

  /// Renderables below `node` (excluding `node` itself), with world
  /// transforms.
  fn descendant_renderables(&self, node: Self::Node) -> Vec<GeometryEntry>;

  /// Every renderable in the scene, with world transforms.
  fn all_renderables(&self) -> Vec<GeometryEntry>;
}

/// Which strategy produced a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectSource {
  Children,
  Intersecting,
  Nothing,
}

/// Geometry gathered for one bake.
#[derive(Clone, Debug)]
pub struct Collection {
  pub entries: Vec<GeometryEntry>,
  pub source: CollectSource,
}

impl Collection {
  #[inline]
  pub fn found(&self) -> bool {
    self.source != CollectSource::Nothing
  }

  pub fn triangle_count(&self) -> usize {
    total_triangles(&self.entries)
  }
}

/// Gather geometry for the volume at `root`.
///
/// With [`FitMode::FitToVertices`] and child geometry present, `bake_bounds`
/// is replaced by the tight box around the children's vertices in `root`'s
/// local space.
#[tracing::instrument(skip_all, name = "collector::collect")]
pub fn collect<S>(
  source: &S,
  root: S::Node,
  bake_bounds: &mut Bounds,
  fit: FitMode,
) -> Collection
where
  S: GeometrySource + ?Sized,
{
  let root_transform = source.world_transform(root);

  let children: Vec<_> = source
    .descendant_renderables(root)
    .into_iter()
    .filter(|entry| entry.triangle_count() > 0)
    .collect();

  if !children.is_empty() {
    if fit == FitMode::FitToVertices {
      if let Some(fitted) = local_vertex_bounds(&children, &root_transform) {
        tracing::debug!(
          center = ?fitted.center,
          extents = ?fitted.extents,
          "fitted bake bounds to child vertices"
        );
        *bake_bounds = fitted;
      }
    }
    return Collection {
      entries: children,
      source: CollectSource::Children,
    };
  }

  let region = bake_bounds.transformed(&root_transform);
  let entries: Vec<_> = source
    .all_renderables()
    .into_iter()
    .filter(|entry| entry.triangle_count() > 0 && entry.world_bounds().overlaps(&region))
    .collect();

  let kind = if entries.is_empty() {
    CollectSource::Nothing
  } else {
    CollectSource::Intersecting
  };
  tracing::debug!(count = entries.len(), source = ?kind, "collected geometry");

  Collection {
    entries,
    source: kind,
  }
}

/// Tight box around all vertices of `entries`, in the space of `root`.
fn local_vertex_bounds(entries: &[GeometryEntry], root_transform: &Affine3A) -> Option<Bounds> {
  let to_local = root_transform.inverse();
  let mut aabb = Aabb::empty();
  for entry in entries {
    for p in entry.world_positions() {
      aabb.encapsulate(to_local.transform_point3(p));
    }
  }
  aabb.to_bounds()
}

#[cfg(test)]
#[path = "collector_test.rs"]
mod collector_test;
