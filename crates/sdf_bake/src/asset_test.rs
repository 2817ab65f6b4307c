use glam::Vec3;

use super::*;
use crate::baker::BakeStats;
use crate::grid::VolumeSettings;

fn result(distances: Vec<f32>, max_distance: f32) -> BakeResult {
  let n = distances.len() as u32;
  BakeResult {
    settings: VolumeSettings::new(
      Bounds::new(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0)),
      Dimensions::new(n, 1, 1),
    )
    .expect("valid settings"),
    distances,
    max_distance,
    stats: BakeStats::default(),
  }
}

#[test]
fn test_normalize_round_trip() {
  let raw = [-2.0, -0.5, 0.0, 1.25, 4.0];
  let max = 4.0;
  let normalized = normalize(&raw, max).expect("non-degenerate");
  assert!(normalized.iter().all(|n| (-1.0..=1.0).contains(n)));

  let restored = denormalize(&normalized, max);
  for (a, b) in raw.iter().zip(&restored) {
    assert!((a - b).abs() < 1e-6);
  }
}

#[test]
fn test_normalize_rejects_degenerate() {
  assert_eq!(normalize(&[0.0; 4], 0.0), Err(BakeError::DegenerateField));
  assert_eq!(
    normalize(&[1.0], f32::INFINITY),
    Err(BakeError::DegenerateField)
  );
}

#[test]
fn test_asset_from_result() {
  let asset = SdfAsset::from_result(&result(vec![-1.0, 0.5, 2.0, -2.0], 2.0))
    .expect("non-degenerate");
  assert_eq!(asset.dimensions, Dimensions::new(4, 1, 1));
  assert_eq!(asset.voxel_size, Vec3::new(1.0, 2.0, 2.0));
  assert_eq!(asset.non_uniform_scale, Vec3::new(2.0, 1.0, 1.0));
  assert_eq!(asset.data, vec![-0.5, 0.25, 1.0, -1.0]);
  assert_eq!(asset.true_distance(0), Some(-1.0));
  assert_eq!(asset.true_distance(2), Some(2.0));
  assert_eq!(asset.true_distance(4), None);
  assert_eq!(asset.voxel_count(), 4);
}

#[test]
fn test_asset_from_degenerate_result() {
  let err = SdfAsset::from_result(&result(vec![0.0; 3], 0.0)).unwrap_err();
  assert_eq!(err, BakeError::DegenerateField);
}

#[test]
fn test_memory_store_replace() {
  let asset = SdfAsset::from_result(&result(vec![1.0, -1.0], 1.0)).expect("non-degenerate");
  let mut store = MemoryAssetStore::new();

  assert_eq!(store.replace("volume", &asset), Ok(false));
  assert_eq!(store.replace("volume", &asset), Ok(true));
  assert_eq!(store.len(), 1);
  assert_eq!(store.get("volume"), Some(&asset));
  assert!(store.get("other").is_none());
}
