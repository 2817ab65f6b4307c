//! sdf_bake - Mesh to signed distance field volume baking
//!
//! This crate bakes triangle geometry into a dense grid of signed distances
//! (negative inside) for ray marching and effect sampling. Distances are
//! estimated by casting a fixed, jittered set of rays from every voxel
//! center through a triangle BVH.
//!
//! # Features
//!
//! - **Geometry collection**: child renderables of a volume, or anything
//!   overlapping it, with optional bounds fitting
//! - **Winding-independent sign**: ray parity with strict majority voting
//! - **Deterministic**: seeded jitter, identical inputs give identical bits
//! - **Parallel**: Z slices sampled on the rayon pool, cancellable
//! - **Packing**: normalization and an asset store interface
//!
//! # Example
//!
//! ```ignore
//! use sdf_bake::{bake, BakeConfig, Bounds, CancellationToken, Dimensions, VolumeGrid,
//!   VolumeSettings};
//!
//! let settings = VolumeSettings::new(Bounds::new(Vec3::ZERO, Vec3::ONE), Dimensions::splat(32))?;
//! let grid = VolumeGrid::untransformed(settings);
//!
//! bake(&grid, &geometry, &BakeConfig::default(), &CancellationToken::new(), |result| {
//!     let asset = SdfAsset::from_result(&result);
//! })?;
//! ```

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use constants::{coord_to_index, index_to_coord, MAX_DIMENSION};
pub use error::{BakeError, Result};
pub use types::{Aabb, Bounds, Dimensions, FitMode};

// Meshes and per-bake geometry snapshots
pub mod geometry;
pub use geometry::{GeometryEntry, TriangleMesh};

// Voxel grid
pub mod grid;
pub use grid::{VolumeGrid, VolumeSettings};

// Ray casting
pub mod bvh;
pub mod directions;
pub mod ray;
pub mod sampler;
pub use directions::RayDirections;
pub use sampler::{DistanceEstimator, Estimate, RaySampler};

// Collection and scenes
pub mod collector;
pub mod scene;
pub use collector::{collect, CollectSource, Collection, GeometrySource};
pub use scene::{NodeId, Scene};

// Baking
pub mod baker;
pub use baker::{
  bake, bake_field, bake_scene, bake_with_estimator, BakeConfig, BakeOutcome, BakeResult,
  BakeStats, CancellationToken,
};

// Background bakes
pub mod job;
pub use job::{BakeJob, JobResult};

// Packing and storage
pub mod asset;
pub use asset::{denormalize, normalize, AssetStore, MemoryAssetStore, SdfAsset};

#[cfg(test)]
pub(crate) mod test_utils;
