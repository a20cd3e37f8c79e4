//! Closest-point distance transform.
//!
//! Resolves every voxel of a partially seeded index grid to the identifier
//! of its nearest point, then derives signed distance or density grids.
//!
//! # Pipeline
//!
//! ```text
//!   seed_shell ──► sweep XYZ ──┬──────────────────────────► relax ──► field
//!   (optional)                 │  multi-pass:                  (optional)
//!                 snapshot ────┼─► sweep YZX ─► combine ─┐
//!                              └─► sweep ZXY ─► combine ─┘
//! ```
//!
//! Each sweep runs the 1D lower-envelope pass along every line of one axis,
//! then the next axis consumes the result. Off-grid points make the
//! separable result approximate; the extra orderings and the relaxation
//! step narrow the error.
//!
//! # Ties
//!
//! An assignment is only ever replaced by a strictly closer point. Inside a
//! line, a cell center lying exactly on the boundary between two points
//! belongs to the point with the lower coordinate along the swept axis.
//!
//! # Usage
//!
//! ```ignore
//! let indexer = ClosestPointIndexer::new(IndexerConfig::default())?;
//! let (index, stats) = indexer.index(&points, seeds)?;
//! ```

mod combine;
mod envelope;
mod field;
mod relax;
mod seed;
mod stats;
mod sweep;

pub use combine::combine_grids;
pub use envelope::{nearest_on_line, Envelope, LinePoints, LineScratch, EPS, HALF};
pub use field::{make_density_grid, make_distance_grid, step10};
pub use relax::{neighbor_ball, relax, relax_once, RelaxSummary};
pub use seed::seed_shell;
pub use stats::IndexerStats;
pub use sweep::{sweep, sweep_axis, Axis, LineCounts, SweepOrder};

use web_time::Instant;

use crate::config::{FieldConfig, IndexerConfig, SeedConfig, SweepMode};
use crate::error::{GridError, Result};
use crate::grid::AttributeGrid;
use crate::points::{PointSet, Units};
use crate::threading::WorkerPool;

/// Runs the distance transform on a dedicated worker pool.
pub struct ClosestPointIndexer {
  config: IndexerConfig,
  pool: WorkerPool,
}

impl ClosestPointIndexer {
  pub fn new(config: IndexerConfig) -> Result<Self> {
    config.validate()?;
    let pool = WorkerPool::new(config.threads)?;
    Ok(Self { config, pool })
  }

  pub fn config(&self) -> &IndexerConfig {
    &self.config
  }

  pub fn num_threads(&self) -> usize {
    self.pool.num_threads()
  }

  /// Seed a thin shell of voxels around every point. See [`seed_shell`].
  pub fn seed_shell(&self, grid: &mut AttributeGrid, points: &PointSet, config: &SeedConfig) -> Result<u64> {
    seed::seed_shell(grid, points, config)
  }

  /// Resolve every voxel of `grid` to its nearest point.
  ///
  /// `points` must be in grid units of `grid`. The grid is consumed and
  /// returned only when every stage succeeded.
  #[tracing::instrument(skip_all, name = "closest_point::index")]
  pub fn index(&self, points: &PointSet, grid: AttributeGrid) -> Result<(AttributeGrid, IndexerStats)> {
    let start = Instant::now();
    points.require_units(Units::Grid)?;
    check_identifier_width(points, &grid)?;

    let max_d2 = self.config.max_distance2();
    let mut stats = IndexerStats { seeded_voxels: grid.count_assigned(), ..Default::default() };

    let mut grid = grid;
    match self.config.sweep {
      SweepMode::Single => {
        stats.add_lines(sweep::sweep(&mut grid, points, SweepOrder::XYZ, max_d2, &self.pool)?);
        stats.passes = 1;
      }
      SweepMode::MultiPass => {
        let [first, rest @ ..] = SweepOrder::MULTI_PASS;
        let snapshot = grid.clone();
        stats.add_lines(sweep::sweep(&mut grid, points, first, max_d2, &self.pool)?);
        stats.passes = 1;

        let mut candidate = snapshot.empty_like();
        for order in rest {
          candidate.copy_from(&snapshot)?;
          stats.add_lines(sweep::sweep(&mut candidate, points, order, max_d2, &self.pool)?);
          stats.combine_replacements +=
            self.pool.phase("combine", || combine::combine_grids(&mut grid, &candidate, points))??;
          stats.passes += 1;
        }
      }
    }

    let (grid, summary) = relax::relax(
      grid,
      points,
      self.config.relax_radius,
      max_d2,
      self.config.relax_iterations,
      &self.pool,
    )?;
    stats.add_relaxation(summary);

    stats.assigned_voxels = grid.count_assigned();
    stats.elapsed_us = start.elapsed().as_micros() as u64;
    tracing::debug!(
      passes = stats.passes,
      assigned = stats.assigned_voxels,
      replaced = stats.total_replacements(),
      elapsed_us = stats.elapsed_us,
      "index resolved"
    );
    Ok((grid, stats))
  }

  /// Derive a signed distance grid into `out`. See [`make_distance_grid`].
  pub fn distance_grid(
    &self,
    index: &AttributeGrid,
    interior: Option<&AttributeGrid>,
    points: &PointSet,
    out: &mut AttributeGrid,
    config: &FieldConfig,
  ) -> Result<u64> {
    self.pool.phase("distance", || field::make_distance_grid(index, interior, points, out, config))?
  }

  /// Derive a density grid into `out`. See [`make_density_grid`].
  pub fn density_grid(
    &self,
    index: &AttributeGrid,
    interior: Option<&AttributeGrid>,
    points: &PointSet,
    out: &mut AttributeGrid,
    config: &FieldConfig,
  ) -> Result<u64> {
    self.pool.phase("density", || field::make_density_grid(index, interior, points, out, config))?
  }
}

/// Error unless every point identifier fits in the grid's attribute words.
fn check_identifier_width(points: &PointSet, grid: &AttributeGrid) -> Result<()> {
  let required = u64::BITS - (points.len() as u64).leading_zeros();
  let available = grid.storage().attribute_bits();
  if required > available {
    return Err(GridError::AttributeTooWide { required, available });
  }
  Ok(())
}
