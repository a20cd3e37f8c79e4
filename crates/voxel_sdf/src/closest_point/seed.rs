//! Thin-shell seeding of an index grid around surface points.

use glam::DVec3;

use crate::config::SeedConfig;
use crate::error::Result;
use crate::grid::AttributeGrid;
use crate::points::{PointSet, Units};

/// Assign every voxel within `layer_thickness` of a point to its closest
/// such point. Returns the number of voxels this call assigned.
///
/// Distances are compared after rounding to `1 / subvoxel_resolution`
/// voxels, and a point wins only with a strictly smaller rounded distance.
/// Voxels already holding a point compete with that point's distance, so
/// seeding twice, or on top of external seeds, never moves a voxel to a
/// farther point. Points must be in grid units; distances use the grid's
/// axis scale.
#[tracing::instrument(skip_all, name = "closest_point::seed_shell")]
pub fn seed_shell(grid: &mut AttributeGrid, points: &PointSet, config: &SeedConfig) -> Result<u64> {
  points.require_units(Units::Grid)?;
  config.validate()?;

  let geometry = *grid.geometry();
  let scale = geometry.axis_scale();
  let subvoxel = config.subvoxel_resolution as f64;
  let accept = config.layer_thickness + 1.0 / subvoxel;
  let reach = (DVec3::splat(accept) / scale + 1.0).ceil();
  let (rx, ry, rz) = (reach.x as i64, reach.y as i64, reach.z as i64);
  let quantize = |d2: f64| (d2.sqrt() * subvoxel).round() as u32;

  let voxels = geometry.voxel_count() as usize;
  let mut best = vec![u32::MAX; voxels];
  for y in 0..geometry.height {
    for x in 0..geometry.width {
      for z in 0..geometry.depth {
        let id = grid.get_attribute(x, y, z);
        if id != 0 && id as usize <= points.len() {
          best[geometry.linear_index(x, y, z)] =
            quantize(points.scaled_distance2_to_cell(id as u32, x, y, z, scale));
        }
      }
    }
  }

  let mut claimed = vec![false; voxels];
  let mut seeded = 0u64;

  for id in 1..=points.len() as u32 {
    let p = points.position(id);
    if !p.is_finite() {
      continue;
    }
    let cell = p.floor();
    let (cx, cy, cz) = (cell.x as i64, cell.y as i64, cell.z as i64);

    for dy in -ry..=ry {
      for dx in -rx..=rx {
        for dz in -rz..=rz {
          let (x, y, z) = (cx + dx, cy + dy, cz + dz);
          if !geometry.contains(x, y, z) {
            continue;
          }
          let (x, y, z) = (x as usize, y as usize, z as usize);
          let d2 = points.scaled_distance2_to_cell(id, x, y, z, scale);
          if d2.sqrt() > accept {
            continue;
          }
          let q = quantize(d2);
          let slot = geometry.linear_index(x, y, z);
          if q < best[slot] {
            if !claimed[slot] {
              claimed[slot] = true;
              seeded += 1;
            }
            best[slot] = q;
            grid.set_attribute(x, y, z, id as u64);
          }
        }
      }
    }
  }

  tracing::debug!(points = points.len(), seeded, "shell seeded");
  Ok(seeded)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grid::GridGeometry;

  #[test]
  fn test_shell_covers_ball_around_point() {
    let mut grid = AttributeGrid::index_grid(GridGeometry::unit(9, 9, 9)).unwrap();
    let points = PointSet::from_positions(Units::Grid, &[DVec3::splat(4.5)]);
    let seeded = seed_shell(&mut grid, &points, &SeedConfig::default()).unwrap();
    // center, 6 face neighbours at 1.0; edge neighbours at 1.414 are outside 1.1
    assert_eq!(seeded, 7);
    assert_eq!(grid.get_attribute(4, 4, 4), 1);
    assert_eq!(grid.get_attribute(5, 4, 4), 1);
    assert_eq!(grid.get_attribute(5, 5, 4), 0);
  }

  #[test]
  fn test_closer_point_wins_shared_voxels() {
    let mut grid = AttributeGrid::index_grid(GridGeometry::unit(8, 3, 3)).unwrap();
    let points = PointSet::from_positions(
      Units::Grid,
      &[DVec3::new(2.5, 1.5, 1.5), DVec3::new(4.1, 1.5, 1.5)],
    );
    let config = SeedConfig::default().with_layer_thickness(2.0);
    seed_shell(&mut grid, &points, &config).unwrap();
    assert_eq!(grid.get_attribute(2, 1, 1), 1);
    assert_eq!(grid.get_attribute(3, 1, 1), 2, "|3.5-4.1| beats |3.5-2.5|");
    assert_eq!(grid.get_attribute(4, 1, 1), 2);
  }

  #[test]
  fn test_equal_rounded_distance_keeps_first_point() {
    let mut grid = AttributeGrid::index_grid(GridGeometry::unit(4, 1, 1)).unwrap();
    let points = PointSet::from_positions(
      Units::Grid,
      &[DVec3::new(1.0, 0.5, 0.5), DVec3::new(2.01, 0.5, 0.5)],
    );
    seed_shell(&mut grid, &points, &SeedConfig::default()).unwrap();
    // cell 1 center 1.5: 0.5 and 0.51 both round to 5 tenths
    assert_eq!(grid.get_attribute(1, 0, 0), 1);
  }

  #[test]
  fn test_existing_assignments_keep_closer_points() {
    let mut grid = AttributeGrid::index_grid(GridGeometry::unit(6, 1, 1)).unwrap();
    let points = PointSet::from_positions(
      Units::Grid,
      &[DVec3::new(0.5, 0.5, 0.5), DVec3::new(2.58, 0.5, 0.5)],
    );
    // voxel 1 already holds point 1 at distance 1.0
    grid.set_attribute(1, 0, 0, 1);

    let seeded = seed_shell(&mut grid, &points, &SeedConfig::default()).unwrap();
    assert_eq!(grid.get_attribute(1, 0, 0), 1, "1.08 away does not beat 1.0");
    assert_eq!(grid.get_attribute(0, 0, 0), 1);
    assert_eq!(grid.get_attribute(2, 0, 0), 2);
    assert_eq!(grid.get_attribute(3, 0, 0), 2);
    assert_eq!(seeded, 3);

    let snapshot = grid.clone();
    assert_eq!(seed_shell(&mut grid, &points, &SeedConfig::default()).unwrap(), 0);
    assert_eq!(grid, snapshot);
  }

  #[test]
  fn test_tall_slices_shrink_the_shell_along_y() {
    let mut grid = AttributeGrid::index_grid(GridGeometry::new(5, 5, 5, 1.0, 4.0)).unwrap();
    let points = PointSet::from_positions(Units::Grid, &[DVec3::splat(2.5)]);
    let seeded = seed_shell(&mut grid, &points, &SeedConfig::default()).unwrap();
    // the slice above is 4 voxel widths away
    assert_eq!(seeded, 5);
    assert_eq!(grid.get_attribute(3, 2, 2), 1);
    assert_eq!(grid.get_attribute(2, 3, 2), 0);
  }

  #[test]
  fn test_points_outside_grid_are_clipped() {
    let mut grid = AttributeGrid::index_grid(GridGeometry::unit(3, 3, 3)).unwrap();
    let points = PointSet::from_positions(Units::Grid, &[DVec3::new(-0.5, 1.5, 1.5)]);
    assert_eq!(seed_shell(&mut grid, &points, &SeedConfig::default()).unwrap(), 1);
    assert_eq!(grid.get_attribute(0, 1, 1), 1);
  }

  #[test]
  fn test_requires_grid_units() {
    let mut grid = AttributeGrid::index_grid(GridGeometry::unit(3, 3, 3)).unwrap();
    let points = PointSet::from_positions(Units::World, &[DVec3::splat(1.0)]);
    assert!(seed_shell(&mut grid, &points, &SeedConfig::default()).is_err());
  }
}
