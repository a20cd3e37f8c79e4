//! Neighbourhood relaxation of a resolved index grid.
//!
//! Each iteration reads one grid and writes every voxel of another, then the
//! two swap roles. A voxel adopts a neighbour's point only when that point is
//! strictly closer to its own center and within the distance cutoff, so
//! cells a sweep left empty beyond the cutoff stay empty.

use rayon::prelude::*;

use crate::error::Result;
use crate::grid::AttributeGrid;
use crate::points::PointSet;
use crate::threading::WorkerPool;

/// Outcome of [`relax`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelaxSummary {
  /// Iterations run, including the final one that changed nothing.
  pub iterations: u32,
  /// Voxel reassignments over all iterations.
  pub replacements: u64,
}

/// Integer offsets `d` with `0 < |d|^2 <= radius^2`.
pub fn neighbor_ball(radius: f64) -> Vec<[i64; 3]> {
  let r2 = radius * radius;
  let reach = radius.floor() as i64;
  let mut offsets = Vec::new();
  for dy in -reach..=reach {
    for dx in -reach..=reach {
      for dz in -reach..=reach {
        let d2 = (dx * dx + dy * dy + dz * dz) as f64;
        if d2 > 0.0 && d2 <= r2 {
          offsets.push([dx, dy, dz]);
        }
      }
    }
  }
  offsets
}

/// One relaxation step from `src` into `dst`. Returns the number of voxels
/// whose point changed. Candidates farther than `max_d2` (squared, scaled
/// by the grid's axis scale) are never adopted.
///
/// Uses rayon's current pool; call it through [`WorkerPool::phase`].
pub fn relax_once(
  src: &AttributeGrid,
  dst: &mut AttributeGrid,
  points: &PointSet,
  offsets: &[[i64; 3]],
  max_d2: f64,
) -> u64 {
  let geometry = *src.geometry();
  let (width, depth) = (geometry.width, geometry.depth);
  let scale = geometry.axis_scale();

  dst
    .rows_mut()
    .par_iter_mut()
    .enumerate()
    .map(|(y, row)| {
      let mut changed = 0u64;
      for x in 0..width {
        for z in 0..depth {
          let current = src.get_attribute(x, y, z);
          let mut best = current;
          let mut best_d2 = points.scaled_distance2_to_cell(current as u32, x, y, z, scale);

          for &[dx, dy, dz] in offsets {
            let (nx, ny, nz) = (x as i64 + dx, y as i64 + dy, z as i64 + dz);
            if !geometry.contains(nx, ny, nz) {
              continue;
            }
            let candidate = src.get_attribute(nx as usize, ny as usize, nz as usize);
            if candidate == 0 || candidate == best {
              continue;
            }
            let d2 = points.scaled_distance2_to_cell(candidate as u32, x, y, z, scale);
            if d2 < best_d2 && d2 <= max_d2 {
              best = candidate;
              best_d2 = d2;
            }
          }

          row.set(x * depth + z, best);
          if best != current {
            changed += 1;
          }
        }
      }
      changed
    })
    .sum()
}

/// Relax `grid` until an iteration changes nothing or `max_iterations` ran.
#[tracing::instrument(skip_all, name = "closest_point::relax")]
pub fn relax(
  grid: AttributeGrid,
  points: &PointSet,
  radius: f64,
  max_d2: f64,
  max_iterations: usize,
  pool: &WorkerPool,
) -> Result<(AttributeGrid, RelaxSummary)> {
  let mut summary = RelaxSummary::default();
  if max_iterations == 0 {
    return Ok((grid, summary));
  }

  let offsets = neighbor_ball(radius);
  let mut dst = grid.empty_like();
  let mut src = grid;

  for iteration in 0..max_iterations {
    let changed = pool.phase("relax", || relax_once(&src, &mut dst, points, &offsets, max_d2))?;
    std::mem::swap(&mut src, &mut dst);
    summary.iterations += 1;
    summary.replacements += changed;
    tracing::debug!(iteration, changed, "relaxation step");
    if changed == 0 {
      break;
    }
  }
  Ok((src, summary))
}

#[cfg(test)]
mod tests {
  use glam::DVec3;

  use super::*;
  use crate::grid::GridGeometry;
  use crate::points::Units;

  #[test]
  fn test_default_ball_has_eighteen_neighbours() {
    let ball = neighbor_ball(1.5);
    assert_eq!(ball.len(), 18);
    assert!(!ball.contains(&[0, 0, 0]));
    assert!(!ball.contains(&[1, 1, 1]));
    assert!(ball.contains(&[1, 0, -1]));
    assert_eq!(neighbor_ball(1.0).len(), 6);
    assert_eq!(neighbor_ball(2.0).len(), 32);
  }

  #[test]
  fn test_relaxation_fixes_wrong_assignment() {
    let points = PointSet::from_positions(Units::Grid, &[DVec3::new(0.5, 0.5, 0.5), DVec3::new(5.5, 0.5, 0.5)]);
    let mut grid = AttributeGrid::index_grid(GridGeometry::unit(6, 1, 1)).unwrap();
    for x in 0..6 {
      grid.set_attribute(x, 0, 0, 1);
    }
    grid.set_attribute(5, 0, 0, 2);

    let pool = WorkerPool::new(2).unwrap();
    let (relaxed, summary) = relax(grid, &points, 1.5, f64::INFINITY, 10, &pool).unwrap();
    let ids: Vec<u64> = (0..6).map(|x| relaxed.get_attribute(x, 0, 0)).collect();
    assert_eq!(ids, vec![1, 1, 1, 2, 2, 2]);
    // one change per iteration from x=4 down to x=3, then a quiet pass
    assert_eq!(summary.replacements, 2);
    assert_eq!(summary.iterations, 3);
  }

  #[test]
  fn test_iteration_cap_is_respected() {
    let points = PointSet::from_positions(Units::Grid, &[DVec3::new(0.5, 0.5, 0.5), DVec3::new(9.5, 0.5, 0.5)]);
    let mut grid = AttributeGrid::index_grid(GridGeometry::unit(10, 1, 1)).unwrap();
    for x in 0..10 {
      grid.set_attribute(x, 0, 0, 1);
    }
    grid.set_attribute(9, 0, 0, 2);

    let pool = WorkerPool::new(2).unwrap();
    let (relaxed, summary) = relax(grid, &points, 1.5, f64::INFINITY, 2, &pool).unwrap();
    assert_eq!(summary.iterations, 2);
    assert_eq!(relaxed.get_attribute(7, 0, 0), 2);
    assert_eq!(relaxed.get_attribute(6, 0, 0), 1, "stopped before the front reached x=6");
  }

  #[test]
  fn test_cutoff_stops_spreading_into_empty_cells() {
    let points = PointSet::from_positions(Units::Grid, &[DVec3::new(0.5, 0.5, 0.5)]);
    let mut grid = AttributeGrid::index_grid(GridGeometry::unit(8, 1, 1)).unwrap();
    for x in 0..3 {
      grid.set_attribute(x, 0, 0, 1);
    }

    let pool = WorkerPool::new(2).unwrap();
    let (relaxed, summary) = relax(grid, &points, 1.5, 9.0, 10, &pool).unwrap();
    let ids: Vec<u64> = (0..8).map(|x| relaxed.get_attribute(x, 0, 0)).collect();
    // x = 3 is exactly 3 away and joins; x = 4 at 4 stays empty
    assert_eq!(ids, vec![1, 1, 1, 1, 0, 0, 0, 0]);
    assert_eq!(summary.replacements, 1);
  }

  #[test]
  fn test_zero_iterations_returns_input() {
    let points = PointSet::new(Units::Grid);
    let grid = AttributeGrid::index_grid(GridGeometry::unit(2, 2, 2)).unwrap();
    let pool = WorkerPool::new(1).unwrap();
    let (same, summary) = relax(grid.clone(), &points, 1.5, f64::INFINITY, 0, &pool).unwrap();
    assert_eq!(same, grid);
    assert_eq!(summary, RelaxSummary::default());
  }
}
