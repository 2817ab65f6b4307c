//! Non-blocking bakes on the rayon pool.
//!
//! # Usage
//!
//! ```ignore
//! let mut job = BakeJob::spawn(grid, geometry, BakeConfig::default());
//!
//! // Poll each frame
//! if let Some(result) = job.poll() {
//!     match result? {
//!         JobResult::Completed(bake) => store(bake),
//!         JobResult::Cancelled => {}
//!     }
//! }
//! ```

use crossbeam_channel::{bounded, Receiver, TryRecvError};

use crate::baker::{bake, BakeConfig, BakeOutcome, BakeResult, CancellationToken};
use crate::error::{BakeError, Result};
use crate::geometry::GeometryEntry;
use crate::grid::VolumeGrid;

/// What a finished job produced.
#[derive(Clone, Debug)]
pub enum JobResult {
  Completed(BakeResult),
  Cancelled,
}

/// Handle to a bake running in the background.
pub struct BakeJob {
  receiver: Receiver<Result<JobResult>>,
  token: CancellationToken,
  done: bool,
}

impl BakeJob {
  /// Start baking `geometry` into `grid` on the rayon pool.
  pub fn spawn(grid: VolumeGrid, geometry: Vec<GeometryEntry>, config: BakeConfig) -> Self {
    Self::spawn_with_token(grid, geometry, config, CancellationToken::new())
  }

  /// Start a bake that stops when `token` is cancelled.
  pub fn spawn_with_token(
    grid: VolumeGrid,
    geometry: Vec<GeometryEntry>,
    config: BakeConfig,
    token: CancellationToken,
  ) -> Self {
    let (sender, receiver) = bounded(1);
    let worker_token = token.clone();

    rayon::spawn(move || {
      let mut completed = None;
      let outcome = bake(&grid, &geometry, &config, &worker_token, |result| {
        completed = Some(result);
      });
      let message = outcome.map(|outcome| match (outcome, completed) {
        (BakeOutcome::Completed(_), Some(result)) => JobResult::Completed(result),
        _ => JobResult::Cancelled,
      });
      // The handle may already be gone; nobody is left to tell.
      let _ = sender.send(message);
    });

    Self {
      receiver,
      token,
      done: false,
    }
  }

  /// Ask the bake to stop at the next slice boundary.
  pub fn cancel(&self) {
    self.token.cancel();
  }

  pub fn token(&self) -> &CancellationToken {
    &self.token
  }

  /// Whether a result has already been taken with [`poll`](Self::poll).
  pub fn is_done(&self) -> bool {
    self.done
  }

  /// Non-blocking check for the result.
  ///
  /// Returns `Some` exactly once, when the bake has finished.
  pub fn poll(&mut self) -> Option<Result<JobResult>> {
    if self.done {
      return None;
    }
    match self.receiver.try_recv() {
      Ok(message) => {
        self.done = true;
        Some(message)
      }
      Err(TryRecvError::Empty) => None,
      Err(TryRecvError::Disconnected) => {
        self.done = true;
        Some(Err(BakeError::JobUnavailable))
      }
    }
  }

  /// Block until the bake finishes.
  ///
  /// Fails with [`BakeError::JobUnavailable`] if the result was already taken
  /// by [`poll`](Self::poll).
  pub fn wait(self) -> Result<JobResult> {
    if self.done {
      return Err(BakeError::JobUnavailable);
    }
    self.receiver.recv().unwrap_or(Err(BakeError::JobUnavailable))
  }
}

#[cfg(test)]
#[path = "job_test.rs"]
mod job_test;
