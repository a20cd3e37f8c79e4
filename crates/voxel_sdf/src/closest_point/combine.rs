//! Per-voxel combination of two candidate index grids.

use rayon::prelude::*;

use crate::error::Result;
use crate::grid::AttributeGrid;
use crate::points::PointSet;

/// Replace each voxel of `target` with the point of `candidate` when that
/// point is strictly closer to the voxel center. Returns the number of
/// voxels replaced.
///
/// Uses rayon's current pool; call it through
/// [`WorkerPool::phase`](crate::threading::WorkerPool::phase).
pub fn combine_grids(target: &mut AttributeGrid, candidate: &AttributeGrid, points: &PointSet) -> Result<u64> {
  target.check_same_dims(candidate)?;
  let depth = target.depth();
  let slice_size = target.geometry().slice_size();
  let scale = target.geometry().axis_scale();

  let replaced = target
    .rows_mut()
    .par_iter_mut()
    .zip(candidate.rows().par_iter())
    .enumerate()
    .map(|(y, (row, other))| {
      let mut replaced = 0u64;
      for pos in 0..slice_size {
        let theirs = other.get(pos);
        if theirs == 0 {
          continue;
        }
        let ours = row.get(pos);
        if ours == theirs {
          continue;
        }
        let (x, z) = (pos / depth, pos % depth);
        let d2 = |id: u64| points.scaled_distance2_to_cell(id as u32, x, y, z, scale);
        if d2(theirs) < d2(ours) {
          row.set(pos, theirs);
          replaced += 1;
        }
      }
      replaced
    })
    .sum();
  Ok(replaced)
}
