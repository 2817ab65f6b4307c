use std::time::Duration;

use glam::Vec3;

use super::*;
use crate::grid::VolumeSettings;
use crate::test_utils::unit_cube;
use crate::types::{Bounds, Dimensions};

fn small_grid() -> VolumeGrid {
  let settings = VolumeSettings::new(
    Bounds::new(Vec3::ZERO, Vec3::splat(1.0)),
    Dimensions::splat(6),
  )
  .expect("valid settings");
  VolumeGrid::untransformed(settings)
}

fn config() -> BakeConfig {
  BakeConfig::default().with_ray_count(32)
}

#[test]
fn test_wait_returns_completed_bake() {
  let job = BakeJob::spawn(small_grid(), vec![unit_cube()], config());
  match job.wait() {
    Ok(JobResult::Completed(result)) => {
      assert_eq!(result.distances.len(), 216);
      assert!(result.max_distance > 0.0);
      assert_eq!(result.stats.triangle_count, 12);
    }
    other => panic!("unexpected job result: {:?}", other),
  }
}

#[test]
fn test_poll_delivers_once() {
  let mut job = BakeJob::spawn(small_grid(), vec![unit_cube()], config());

  let mut result = None;
  for _ in 0..2000 {
    if let Some(r) = job.poll() {
      result = Some(r);
      break;
    }
    std::thread::sleep(Duration::from_millis(5));
  }

  assert!(matches!(result, Some(Ok(JobResult::Completed(_)))));
  assert!(job.is_done());
  assert!(job.poll().is_none());
}

#[test]
fn test_cancelled_token_reports_cancelled() {
  let token = CancellationToken::new();
  token.cancel();
  let job = BakeJob::spawn_with_token(small_grid(), vec![unit_cube()], config(), token);
  assert!(matches!(job.wait(), Ok(JobResult::Cancelled)));
}

#[test]
fn test_invalid_config_is_reported() {
  let job = BakeJob::spawn(
    small_grid(),
    vec![unit_cube()],
    BakeConfig::default().with_ray_count(0),
  );
  assert!(matches!(job.wait(), Err(BakeError::InvalidConfig(_))));
}

#[test]
fn test_cancel_through_handle() {
  let job = BakeJob::spawn(small_grid(), vec![unit_cube()], config());
  job.cancel();
  assert!(job.token().is_cancelled());
  // The bake may have finished before the cancel landed.
  assert!(job.wait().is_ok());
}
