//! Counters gathered while resolving an index grid.

use super::relax::RelaxSummary;
use super::sweep::LineCounts;

/// Statistics from one [`ClosestPointIndexer::index`](super::ClosestPointIndexer::index) run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexerStats {
  /// Voxels holding a point before the first sweep.
  pub seeded_voxels: u64,
  /// Three-axis sweep passes run (1 or 3).
  pub passes: u32,
  /// Lines visited over all sweeps.
  pub lines_swept: u64,
  /// Visited lines without any assigned cell.
  pub empty_lines: u64,
  /// Cells cleared by the distance cutoff.
  pub cells_cut: u64,
  /// Voxels improved while combining passes.
  pub combine_replacements: u64,
  /// Relaxation iterations run.
  pub relax_iterations: u32,
  /// Voxels improved by relaxation.
  pub relax_replacements: u64,
  /// Voxels holding a point after the run.
  pub assigned_voxels: u64,
  /// Wall time of the run in microseconds.
  pub elapsed_us: u64,
}

impl IndexerStats {
  pub(crate) fn add_lines(&mut self, counts: LineCounts) {
    self.lines_swept += counts.lines;
    self.empty_lines += counts.empty_lines;
    self.cells_cut += counts.cells_cut;
  }

  pub(crate) fn add_relaxation(&mut self, summary: RelaxSummary) {
    self.relax_iterations += summary.iterations;
    self.relax_replacements += summary.replacements;
  }

  /// Lines that carried at least one point.
  #[inline]
  pub fn lines_with_points(&self) -> u64 {
    self.lines_swept - self.empty_lines
  }

  /// Voxels improved after the first pass, by combination and relaxation.
  #[inline]
  pub fn total_replacements(&self) -> u64 {
    self.combine_replacements + self.relax_replacements
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_totals() {
    let mut stats = IndexerStats { combine_replacements: 4, ..Default::default() };
    stats.add_lines(LineCounts { lines: 10, empty_lines: 3, cells_cut: 1 });
    stats.add_lines(LineCounts { lines: 5, empty_lines: 5, cells_cut: 0 });
    stats.add_relaxation(RelaxSummary { iterations: 2, replacements: 6 });
    assert_eq!(stats.lines_swept, 15);
    assert_eq!(stats.lines_with_points(), 7);
    assert_eq!(stats.cells_cut, 1);
    assert_eq!(stats.total_replacements(), 10);
    assert_eq!(stats.relax_iterations, 2);
  }
}
