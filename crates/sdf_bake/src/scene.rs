//! Minimal node hierarchy for driving bakes outside an editor.
//!
//! Nodes carry a local transform and optionally a mesh. World transforms
//! are resolved by walking up the parent chain.

use std::sync::Arc;

use glam::Affine3A;

use crate::collector::GeometrySource;
use crate::geometry::{GeometryEntry, TriangleMesh};

/// Handle to a node in a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
  #[inline]
  pub fn index(self) -> usize {
    self.0
  }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
  pub name: String,
  pub parent: Option<NodeId>,
  pub local_transform: Affine3A,
  pub mesh: Option<Arc<TriangleMesh>>,
  children: Vec<NodeId>,
}

impl SceneNode {
  pub fn children(&self) -> &[NodeId] {
    &self.children
  }

  #[inline]
  pub fn is_renderable(&self) -> bool {
    self.mesh.is_some()
  }
}

/// Flat arena of nodes. Ids are only valid for the scene that issued them.
#[derive(Clone, Debug, Default)]
pub struct Scene {
  nodes: Vec<SceneNode>,
}

impl Scene {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add an empty node (a group, or a bake volume).
  pub fn add_node(
    &mut self,
    name: impl Into<String>,
    parent: Option<NodeId>,
    local_transform: Affine3A,
  ) -> NodeId {
    self.insert(name.into(), parent, local_transform, None)
  }

  /// Add a node that renders `mesh`.
  pub fn add_renderable(
    &mut self,
    name: impl Into<String>,
    parent: Option<NodeId>,
    local_transform: Affine3A,
    mesh: Arc<TriangleMesh>,
  ) -> NodeId {
    self.insert(name.into(), parent, local_transform, Some(mesh))
  }

  fn insert(
    &mut self,
    name: String,
    parent: Option<NodeId>,
    local_transform: Affine3A,
    mesh: Option<Arc<TriangleMesh>>,
  ) -> NodeId {
    let id = NodeId(self.nodes.len());
    // Unknown parents attach the node at the top level.
    let parent = parent.filter(|p| p.0 < self.nodes.len());
    if let Some(parent) = parent {
      self.nodes[parent.0].children.push(id);
    }
    self.nodes.push(SceneNode {
      name,
      parent,
      local_transform,
      mesh,
      children: Vec::new(),
    });
    id
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
    self.nodes.get(id.0)
  }

  /// First node with the given name.
  pub fn find(&self, name: &str) -> Option<NodeId> {
    self.nodes.iter().position(|n| n.name == name).map(NodeId)
  }

  pub fn set_local_transform(&mut self, id: NodeId, transform: Affine3A) {
    if let Some(node) = self.nodes.get_mut(id.0) {
      node.local_transform = transform;
    }
  }

  /// Node local transform composed with all of its ancestors.
  pub fn world_transform(&self, id: NodeId) -> Affine3A {
    let mut transform = Affine3A::IDENTITY;
    let mut current = Some(id);
    while let Some(node) = current.and_then(|id| self.nodes.get(id.0)) {
      transform = node.local_transform * transform;
      current = node.parent;
    }
    transform
  }

  fn entry(&self, id: NodeId) -> Option<GeometryEntry> {
    let mesh = self.nodes.get(id.0)?.mesh.clone()?;
    Some(GeometryEntry::new(mesh, self.world_transform(id)))
  }
}

impl GeometrySource for Scene {
  type Node = NodeId;

  fn world_transform(&self, node: NodeId) -> Affine3A {
    Scene::world_transform(self, node)
  }

  /// Depth-first, children in insertion order.
  fn descendant_renderables(&self, node: NodeId) -> Vec<GeometryEntry> {
    let mut out = Vec::new();
    let Some(root) = self.nodes.get(node.0) else {
      return out;
    };
    let mut stack: Vec<NodeId> = root.children.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
      out.extend(self.entry(id));
      stack.extend(self.nodes[id.0].children.iter().rev().copied());
    }
    out
  }

  fn all_renderables(&self) -> Vec<GeometryEntry> {
    (0..self.nodes.len())
      .filter_map(|i| self.entry(NodeId(i)))
      .collect()
  }
}

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;
