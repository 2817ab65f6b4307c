//! Packing baked fields into storable assets.
//!
//! Distances are stored normalized to `[-1, 1]` together with the divisor,
//! so the field survives rescaling of the volume and true distances can be
//! recovered with [`SdfAsset::true_distance`].

use std::collections::HashMap;
use std::convert::Infallible;

use glam::Vec3;

use crate::baker::BakeResult;
use crate::error::{BakeError, Result};
use crate::types::{Bounds, Dimensions};

/// Divide every distance by `max_distance`.
///
/// Fails with [`BakeError::DegenerateField`] when the divisor is zero or not
/// finite.
pub fn normalize(raw: &[f32], max_distance: f32) -> Result<Vec<f32>> {
  if max_distance == 0.0 || !max_distance.is_finite() {
    return Err(BakeError::DegenerateField);
  }
  let inv = 1.0 / max_distance;
  Ok(raw.iter().map(|&d| d * inv).collect())
}

/// Undo [`normalize`].
pub fn denormalize(normalized: &[f32], max_distance: f32) -> Vec<f32> {
  normalized.iter().map(|&n| n * max_distance).collect()
}

/// A baked field ready for persistence: single channel, normalized.
#[derive(Clone, Debug, PartialEq)]
pub struct SdfAsset {
  /// Volume-local bounds the field covers.
  pub bounds: Bounds,
  pub voxel_size: Vec3,
  pub dimensions: Dimensions,
  pub non_uniform_scale: Vec3,
  /// Divisor applied during normalization.
  pub max_distance: f32,
  /// Normalized distances, x fastest then y then z.
  pub data: Vec<f32>,
}

impl SdfAsset {
  /// Pack a bake result. Degenerate fields cannot be packed.
  pub fn from_result(result: &BakeResult) -> Result<Self> {
    let settings = &result.settings;
    Ok(Self {
      bounds: settings.bounds(),
      voxel_size: settings.voxel_size(),
      dimensions: settings.dimensions(),
      non_uniform_scale: settings.non_uniform_scale(),
      max_distance: result.max_distance,
      data: result.normalized()?,
    })
  }

  /// Distance in world units at buffer index `index`, `None` past the end.
  #[inline]
  pub fn true_distance(&self, index: usize) -> Option<f32> {
    self.data.get(index).map(|n| n * self.max_distance)
  }

  #[inline]
  pub fn voxel_count(&self) -> usize {
    self.data.len()
  }
}

/// Destination for baked assets.
///
/// `replace` stores `asset` under `key`, discarding whatever was there.
/// Storing the same asset twice leaves the store unchanged.
pub trait AssetStore {
  type Error;

  /// Returns `true` when an older asset was overwritten.
  fn replace(&mut self, key: &str, asset: &SdfAsset) -> std::result::Result<bool, Self::Error>;
}

/// In-memory store, used by tests and embedders that persist on their own.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetStore {
  assets: HashMap<String, SdfAsset>,
}

impl MemoryAssetStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<&SdfAsset> {
    self.assets.get(key)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.assets.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.assets.is_empty()
  }
}

impl AssetStore for MemoryAssetStore {
  type Error = Infallible;

  fn replace(&mut self, key: &str, asset: &SdfAsset) -> std::result::Result<bool, Infallible> {
    Ok(self.assets.insert(key.to_owned(), asset.clone()).is_some())
  }
}

#[cfg(test)]
#[path = "asset_test.rs"]
mod asset_test;
