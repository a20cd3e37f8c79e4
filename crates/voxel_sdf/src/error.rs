//! Error type shared by every grid, channel and engine operation.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors raised by grid construction, channel configuration and the
/// closest-point engine.
///
/// Configuration problems are reported at construction time and never
/// silently clamped. Numerical degeneracies inside the algorithms are
/// handled by tolerances and do not surface here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
  #[error("channel bit count {bits} does not fit in a 64-bit attribute word")]
  BitCountTooLarge { bits: u32 },

  #[error("channel field of {bits} bits at shift {shift} overflows the 64-bit attribute word")]
  FieldOverflow { bits: u32, shift: u32 },

  #[error("channel value range is degenerate: min and max are both {value}")]
  DegenerateRange { value: f64 },

  #[error("grid dimensions {width}x{height}x{depth} contain no voxels")]
  EmptyGrid {
    width: usize,
    height: usize,
    depth: usize,
  },

  #[error(
    "grid of {voxels} voxels exceeds the compact index range of {limit}; \
     use AttributeGrid::new_wide for larger volumes"
  )]
  TooManyVoxels { voxels: u128, limit: u64 },

  #[error("attribute layout needs {required} bits but the row storage holds {available}")]
  AttributeTooWide { required: u32, available: u32 },

  #[error("grid dimensions differ: expected {expected:?}, found {found:?}")]
  DimensionMismatch {
    expected: [usize; 3],
    found: [usize; 3],
  },

  #[error("point coordinates are in {found} units, operation needs {expected} units")]
  UnitsMismatch {
    expected: &'static str,
    found: &'static str,
  },

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("failed to build worker pool: {0}")]
  ThreadPool(String),

  #[error("worker failed during {phase}: {message}")]
  WorkerPanicked { phase: String, message: String },
}
