//! Separable axis sweeps over the index grid.
//!
//! A sweep along an axis runs the 1D pass on every grid line parallel to
//! it. Lines along X and Z lie inside one Y slice, so each worker owns a
//! slice row and rewrites it in place. Lines along Y cross every slice and
//! run in two steps:
//!
//! ```text
//!   gather (par over x)            scatter (par over y)
//!   rows[0..h] ──read──► plane[x]  plane[0..w] ──write──► rows[y]
//!                        [z * h + y]
//! ```
//!
//! Offsets and coordinates are scaled by the grid's axis scale, so a slice
//! height unlike the X/Z voxel size still yields true nearest points.

use std::fmt;
use std::ops::{Add, AddAssign};

use glam::DVec3;
use rayon::prelude::*;

use super::envelope::{nearest_on_line, LinePoints, LineScratch, HALF};
use crate::error::Result;
use crate::grid::{AttributeGrid, GridGeometry};
use crate::points::PointSet;
use crate::threading::WorkerPool;

/// Grid axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
  X,
  Y,
  Z,
}

impl Axis {
  pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

  /// The two axes perpendicular to this one, in X, Y, Z order.
  #[inline]
  pub fn others(self) -> (Axis, Axis) {
    match self {
      Axis::X => (Axis::Y, Axis::Z),
      Axis::Y => (Axis::X, Axis::Z),
      Axis::Z => (Axis::X, Axis::Y),
    }
  }

  /// Component of `v` along this axis.
  #[inline]
  pub fn of(self, v: DVec3) -> f64 {
    match self {
      Axis::X => v.x,
      Axis::Y => v.y,
      Axis::Z => v.z,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Axis::X => "x",
      Axis::Y => "y",
      Axis::Z => "z",
    }
  }

  fn phase_name(self) -> &'static str {
    match self {
      Axis::X => "sweep x",
      Axis::Y => "sweep y",
      Axis::Z => "sweep z",
    }
  }
}

/// Order in which the three axis sweeps of one pass run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepOrder(pub [Axis; 3]);

impl SweepOrder {
  pub const XYZ: SweepOrder = SweepOrder([Axis::X, Axis::Y, Axis::Z]);
  pub const YZX: SweepOrder = SweepOrder([Axis::Y, Axis::Z, Axis::X]);
  pub const ZXY: SweepOrder = SweepOrder([Axis::Z, Axis::X, Axis::Y]);

  /// Orderings of a multi-pass run; the first one is the single sweep.
  pub const MULTI_PASS: [SweepOrder; 3] = [Self::XYZ, Self::YZX, Self::ZXY];

  #[inline]
  pub fn axes(&self) -> [Axis; 3] {
    self.0
  }
}

impl fmt::Display for SweepOrder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for axis in self.0 {
      f.write_str(axis.name())?;
    }
    Ok(())
  }
}

/// Line tallies of one or more sweeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineCounts {
  /// Lines visited.
  pub lines: u64,
  /// Lines without any assigned cell.
  pub empty_lines: u64,
  /// Cells cleared by the distance cutoff.
  pub cells_cut: u64,
}

impl Add for LineCounts {
  type Output = LineCounts;

  fn add(self, rhs: LineCounts) -> LineCounts {
    LineCounts {
      lines: self.lines + rhs.lines,
      empty_lines: self.empty_lines + rhs.empty_lines,
      cells_cut: self.cells_cut + rhs.cells_cut,
    }
  }
}

impl AddAssign for LineCounts {
  fn add_assign(&mut self, rhs: LineCounts) {
    *self = *self + rhs;
  }
}

/// Run the three axis sweeps of `order`, one phase per axis.
#[tracing::instrument(skip_all, name = "closest_point::sweep", fields(order = %order))]
pub fn sweep(
  grid: &mut AttributeGrid,
  points: &PointSet,
  order: SweepOrder,
  max_d2: f64,
  pool: &WorkerPool,
) -> Result<LineCounts> {
  let mut counts = LineCounts::default();
  for axis in order.axes() {
    counts += pool.phase(axis.phase_name(), || sweep_axis(grid, points, axis, max_d2))?;
  }
  tracing::debug!(
    lines = counts.lines,
    empty = counts.empty_lines,
    cut = counts.cells_cut,
    "sweep done"
  );
  Ok(counts)
}

/// Run the 1D pass on every line along `axis`.
///
/// Uses rayon's current pool; call it through [`WorkerPool::phase`].
pub fn sweep_axis(grid: &mut AttributeGrid, points: &PointSet, axis: Axis, max_d2: f64) -> LineCounts {
  match axis {
    Axis::X | Axis::Z => sweep_within_slices(grid, points, axis, max_d2),
    Axis::Y => sweep_across_slices(grid, points, max_d2),
  }
}

/// Fill `line` with the points referenced by `ids`, a line's cells in order.
/// `centers` are the cell-center coordinates of the line on the two other
/// axes. Coordinates and offsets are multiplied by the per-axis `scale`.
fn collect_line(
  line: &mut LinePoints,
  points: &PointSet,
  axis: Axis,
  scale: DVec3,
  centers: [f64; 2],
  ids: impl Iterator<Item = u64>,
) {
  line.clear();
  let along = points.coord(axis);
  let (a, b) = axis.others();
  let (coords_a, coords_b) = (points.coord(a), points.coord(b));
  let (s_along, s_a, s_b) = (axis.of(scale), a.of(scale), b.of(scale));

  let mut previous = 0;
  for id in ids {
    if id == 0 || id == previous {
      continue;
    }
    previous = id;
    let i = id as usize;
    let da = (coords_a[i] - centers[0]) * s_a;
    let db = (coords_b[i] - centers[1]) * s_b;
    line.insert_sorted(id as u32, along[i] * s_along, da * da + db * db);
  }
}

fn sweep_within_slices(grid: &mut AttributeGrid, points: &PointSet, axis: Axis, max_d2: f64) -> LineCounts {
  let geometry = *grid.geometry();
  let GridGeometry { width, depth, .. } = geometry;
  let scale = geometry.axis_scale();
  let s_along = axis.of(scale);

  // line `l` starts at `l * line_step`; its cells are `stride` apart
  let (lines, len, line_step, stride) = match axis {
    Axis::X => (depth, width, 1, depth),
    _ => (width, depth, depth, 1),
  };

  grid
    .rows_mut()
    .par_iter_mut()
    .enumerate()
    .map_init(
      || LineScratch::new(geometry.max_dim()),
      |scratch, (y, row)| {
        let mut counts = LineCounts::default();
        let yc = y as f64 + HALF;
        for l in 0..lines {
          let start = l * line_step;
          let lc = l as f64 + HALF;
          let centers = match axis {
            Axis::X => [yc, lc],
            _ => [lc, yc],
          };
          collect_line(
            &mut scratch.points,
            points,
            axis,
            scale,
            centers,
            (0..len).map(|i| row.get(start + i * stride)),
          );

          counts.lines += 1;
          if scratch.points.is_empty() {
            counts.empty_lines += 1;
            continue;
          }

          let cells = &mut scratch.cells[..len];
          counts.cells_cut +=
            nearest_on_line(&scratch.points, s_along, max_d2, &mut scratch.envelope, cells) as u64;

          for (i, &id) in cells.iter().enumerate() {
            let pos = start + i * stride;
            let id = id as u64;
            if row.get(pos) != id {
              row.set(pos, id);
            }
          }
        }
        counts
      },
    )
    .reduce(LineCounts::default, |a, b| a + b)
}

fn sweep_across_slices(grid: &mut AttributeGrid, points: &PointSet, max_d2: f64) -> LineCounts {
  let geometry = *grid.geometry();
  let GridGeometry { width, height, depth, .. } = geometry;
  let scale = geometry.axis_scale();

  let rows = grid.rows();
  let gathered: Vec<(Vec<u32>, LineCounts)> = (0..width)
    .into_par_iter()
    .map_init(
      || LineScratch::new(geometry.max_dim()),
      |scratch, x| {
        let mut plane = vec![0u32; depth * height];
        let mut counts = LineCounts::default();
        let xc = x as f64 + HALF;
        for z in 0..depth {
          let pos = x * depth + z;
          collect_line(
            &mut scratch.points,
            points,
            Axis::Y,
            scale,
            [xc, z as f64 + HALF],
            rows.iter().map(|row| row.get(pos)),
          );

          counts.lines += 1;
          if scratch.points.is_empty() {
            counts.empty_lines += 1;
            continue;
          }
          let cells = &mut plane[z * height..(z + 1) * height];
          counts.cells_cut +=
            nearest_on_line(&scratch.points, scale.y, max_d2, &mut scratch.envelope, cells) as u64;
        }
        (plane, counts)
      },
    )
    .collect();

  let counts = gathered.iter().fold(LineCounts::default(), |acc, (_, c)| acc + *c);
  let planes: Vec<Vec<u32>> = gathered.into_iter().map(|(plane, _)| plane).collect();

  grid.rows_mut().par_iter_mut().enumerate().for_each(|(y, row)| {
    for (x, plane) in planes.iter().enumerate() {
      for z in 0..depth {
        let pos = x * depth + z;
        let id = plane[z * height + y] as u64;
        if row.get(pos) != id {
          row.set(pos, id);
        }
      }
    }
  });

  counts
}
