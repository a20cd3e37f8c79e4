//! Grid dimensions and the index <-> world mapping.

use glam::DVec3;

use super::bounds::GridBounds;

/// Dimensions, voxel size and placement of a voxel grid.
///
/// Voxel `(x, y, z)` covers `origin + [index, index + 1) * voxel_size`; its
/// center is `origin + (index + 0.5) * voxel_size`. The Y component of
/// `voxel_size` is the slice height and may differ from X/Z.
///
/// ```text
///   origin                      origin + width * voxel_size.x
///     │ ┌─────┬─────┬─────┬─────┐ │
///     └►│  ·  │  ·  │  ·  │  ·  │◄┘      · = voxel center
///       └─────┴─────┴─────┴─────┘
///        x=0   x=1   x=2   x=3
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
  pub width: usize,
  pub height: usize,
  pub depth: usize,
  pub voxel_size: DVec3,
  pub origin: DVec3,
}

impl GridGeometry {
  /// Grid at the world origin with cubic voxels of `voxel_size` except for
  /// a slice height of `slice_height`.
  pub fn new(width: usize, height: usize, depth: usize, voxel_size: f64, slice_height: f64) -> Self {
    Self {
      width,
      height,
      depth,
      voxel_size: DVec3::new(voxel_size, slice_height, voxel_size),
      origin: DVec3::ZERO,
    }
  }

  /// Grid with unit voxels at the origin; grid and world units coincide.
  pub fn unit(width: usize, height: usize, depth: usize) -> Self {
    Self::new(width, height, depth, 1.0, 1.0)
  }

  /// Grid covering `bounds` with the given voxel size and slice height.
  pub fn from_bounds(bounds: &GridBounds, voxel_size: f64, slice_height: f64) -> Self {
    let size = DVec3::new(voxel_size, slice_height, voxel_size);
    let [width, height, depth] = bounds.grid_dims(size);
    Self { width, height, depth, voxel_size: size, origin: bounds.min }
  }

  pub fn with_origin(mut self, origin: DVec3) -> Self {
    self.origin = origin;
    self
  }

  #[inline]
  pub fn dims(&self) -> [usize; 3] {
    [self.width, self.height, self.depth]
  }

  /// Cells in one Y slice.
  #[inline]
  pub fn slice_size(&self) -> usize {
    self.width * self.depth
  }

  /// Largest of the three dimensions.
  #[inline]
  pub fn max_dim(&self) -> usize {
    self.width.max(self.height).max(self.depth)
  }

  /// Voxel count as an exact wide product.
  pub fn voxel_count(&self) -> u128 {
    self.width as u128 * self.height as u128 * self.depth as u128
  }

  /// Flat index `y * slice_size + x * depth + z`.
  #[inline]
  pub fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
    y * self.slice_size() + x * self.depth + z
  }

  /// Voxel size relative to the X voxel size. Grid-unit offsets scaled by
  /// this are true distances measured in X voxel widths; `ONE` for cubic
  /// voxels.
  #[inline]
  pub fn axis_scale(&self) -> DVec3 {
    self.voxel_size / self.voxel_size.x
  }

  #[inline]
  pub fn contains(&self, x: i64, y: i64, z: i64) -> bool {
    x >= 0
      && y >= 0
      && z >= 0
      && (x as u64) < self.width as u64
      && (y as u64) < self.height as u64
      && (z as u64) < self.depth as u64
  }

  /// World-space box covered by the grid.
  pub fn bounds(&self) -> GridBounds {
    let size = DVec3::new(self.width as f64, self.height as f64, self.depth as f64);
    GridBounds::new(self.origin, self.origin + size * self.voxel_size)
  }

  /// World-space center of voxel `(x, y, z)`.
  #[inline]
  pub fn world_coords(&self, x: usize, y: usize, z: usize) -> DVec3 {
    self.origin + (DVec3::new(x as f64, y as f64, z as f64) + 0.5) * self.voxel_size
  }

  /// Continuous grid-unit position of a world point; voxel centers land on
  /// `index + 0.5`.
  #[inline]
  pub fn to_grid_units(&self, world: DVec3) -> DVec3 {
    (world - self.origin) / self.voxel_size
  }

  /// World position of a continuous grid-unit position.
  #[inline]
  pub fn to_world_units(&self, grid: DVec3) -> DVec3 {
    grid * self.voxel_size + self.origin
  }

  /// Integer voxel coordinates containing `world`, which may lie outside
  /// the grid.
  #[inline]
  pub fn grid_coords(&self, world: DVec3) -> [i64; 3] {
    let g = self.to_grid_units(world).floor();
    [g.x as i64, g.y as i64, g.z as i64]
  }

  /// Voxel containing `world`, or `None` outside the grid.
  #[inline]
  pub fn cell_at(&self, world: DVec3) -> Option<[usize; 3]> {
    let [x, y, z] = self.grid_coords(world);
    self.contains(x, y, z).then(|| [x as usize, y as usize, z as usize])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_world_coords_use_cell_centers() {
    let geometry = GridGeometry::new(4, 4, 4, 0.5, 0.25).with_origin(DVec3::new(-1.0, 0.0, 2.0));
    assert_eq!(geometry.world_coords(0, 0, 0), DVec3::new(-0.75, 0.125, 2.25));
    assert_eq!(geometry.world_coords(3, 2, 1), DVec3::new(0.75, 0.625, 2.75));
  }

  #[test]
  fn test_grid_coords_invert_world_coords() {
    let geometry = GridGeometry::new(8, 6, 5, 0.1, 0.2).with_origin(DVec3::splat(-0.4));
    for (x, y, z) in [(0, 0, 0), (7, 5, 4), (3, 1, 2)] {
      let world = geometry.world_coords(x, y, z);
      assert_eq!(geometry.cell_at(world), Some([x, y, z]));
    }
    assert_eq!(geometry.cell_at(DVec3::splat(-1.0)), None);
    assert_eq!(geometry.grid_coords(DVec3::splat(-1.0)), [-6, -3, -6]);
  }

  #[test]
  fn test_bounds_and_linear_index() {
    let geometry = GridGeometry::new(10, 4, 3, 2.0, 1.0);
    let bounds = geometry.bounds();
    assert_eq!(bounds.min, DVec3::ZERO);
    assert_eq!(bounds.max, DVec3::new(20.0, 4.0, 6.0));
    assert_eq!(geometry.slice_size(), 30);
    assert_eq!(geometry.linear_index(2, 1, 1), 30 + 6 + 1);
    assert_eq!(geometry.voxel_count(), 120);
  }

  #[test]
  fn test_from_bounds_round_trips_geometry() {
    let geometry = GridGeometry::new(12, 7, 9, 0.25, 0.5).with_origin(DVec3::new(1.0, 2.0, 3.0));
    let rebuilt = GridGeometry::from_bounds(&geometry.bounds(), 0.25, 0.5);
    assert_eq!(rebuilt, geometry);
  }
}
