//! Error types for baking.

use thiserror::Error;

/// Errors raised while validating, collecting or packing a bake.
///
/// Validation and collection errors are raised before any sampling starts.
/// Sampling itself never fails: a ray that hits nothing is treated as far.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BakeError {
  /// A grid axis is outside `1..=max`.
  #[error("invalid dimension on {axis} axis: {value} (must be within 1..={max})")]
  InvalidDimension { axis: char, value: u32, max: u32 },

  /// The collector found nothing to bake.
  #[error("no geometry found to bake")]
  NoGeometryFound,

  /// Every sampled distance is zero, so the field cannot be normalized.
  #[error("degenerate field: maximum distance magnitude is zero")]
  DegenerateField,

  /// A bake option is out of range.
  #[error("invalid bake configuration: {0}")]
  InvalidConfig(String),

  /// Triangle data is malformed.
  #[error("invalid mesh: {0}")]
  InvalidMesh(String),

  /// A background bake has no result to hand out.
  #[error("bake job result is unavailable")]
  JobUnavailable,
}

/// Result type alias for bake operations.
pub type Result<T> = std::result::Result<T, BakeError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_display() {
    let err = BakeError::InvalidDimension {
      axis: 'x',
      value: 257,
      max: 256,
    };
    assert_eq!(
      err.to_string(),
      "invalid dimension on x axis: 257 (must be within 1..=256)"
    );
    assert_eq!(
      BakeError::NoGeometryFound.to_string(),
      "no geometry found to bake"
    );
  }
}
