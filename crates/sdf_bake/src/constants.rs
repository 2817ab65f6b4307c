//! Bake defaults and the distance buffer layout.
//!
//! # Buffer Layout
//!
//! ```text
//! Distance buffer memory layout (X innermost, then Y, then Z):
//!
//! Address:  0       1       ...  dx-1      dx      ...  dx*dy   ...
//! Content: [0,0,0] [1,0,0]  ... [dx-1,0,0] [0,1,0] ... [0,0,1]  ...
//!          └──────────── X ──────────────┘
//!          └──────────────────── one Z slice ─────────┘
//!
//! index = x + y * dx + z * dx * dy
//! ```
//!
//! The layout matches the row/slice order of a single-channel 3D texture
//! upload, so consumers can copy the buffer straight into one. It is part of
//! the asset format and must not change.
//!
//! A Z slice (`dx * dy` voxels) is contiguous, which is what the baker hands
//! to each parallel batch.

/// Maximum voxel count per axis accepted by default.
pub const MAX_DIMENSION: u32 = 256;

/// Rays cast per voxel by default.
pub const DEFAULT_RAY_COUNT: u32 = 256;

/// Seed for the direction jitter by default.
pub const DEFAULT_JITTER_SEED: u64 = 555;

/// Jitter strength by default, as a fraction of the mean ray spacing.
pub const DEFAULT_JITTER_SCALE: f32 = 0.75;

/// Triangles per BVH leaf before splitting stops.
pub const BVH_LEAF_SIZE: usize = 4;

/// Hits within this ray parameter of the origin are surface contacts.
pub const HIT_EPSILON: f32 = 1e-6;

/// Hits closer than this (relative to the ray length) count as one crossing.
pub const HIT_MERGE_EPSILON: f32 = 1e-5;

/// Convert 3D voxel coordinates to a linear buffer index.
#[inline(always)]
pub const fn coord_to_index(x: usize, y: usize, z: usize, dim_x: usize, dim_y: usize) -> usize {
  x + dim_x * (y + dim_y * z)
}

/// Convert a linear buffer index back to 3D voxel coordinates.
#[inline(always)]
pub const fn index_to_coord(idx: usize, dim_x: usize, dim_y: usize) -> (usize, usize, usize) {
  let x = idx % dim_x;
  let y = (idx / dim_x) % dim_y;
  let z = idx / (dim_x * dim_y);
  (x, y, z)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
