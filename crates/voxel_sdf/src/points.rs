//! Flat, 1-indexed point coordinate arrays.

use std::fmt;

use glam::DVec3;

use crate::closest_point::Axis;
use crate::error::{GridError, Result};
use crate::grid::{AttributeGrid, GridGeometry};

/// Units the coordinates of a [`PointSet`] are expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Units {
  /// World-space coordinates.
  World,
  /// Continuous grid coordinates: `(world - origin) / voxel_size`, so the
  /// center of voxel `i` is at `i + 0.5`.
  Grid,
}

impl Units {
  pub fn name(&self) -> &'static str {
    match self {
      Units::World => "world",
      Units::Grid => "grid",
    }
  }
}

impl fmt::Display for Units {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Surface sample points stored as parallel x/y/z arrays.
///
/// Index 0 is a sentinel meaning "no point"; real points are numbered from
/// 1, matching the identifiers stored in index grids.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
  x: Vec<f64>,
  y: Vec<f64>,
  z: Vec<f64>,
  units: Units,
}

impl PointSet {
  /// Empty set holding only the sentinel.
  pub fn new(units: Units) -> Self {
    Self { x: vec![0.0], y: vec![0.0], z: vec![0.0], units }
  }

  pub fn with_capacity(units: Units, capacity: usize) -> Self {
    let mut set = Self {
      x: Vec::with_capacity(capacity + 1),
      y: Vec::with_capacity(capacity + 1),
      z: Vec::with_capacity(capacity + 1),
      units,
    };
    set.x.push(0.0);
    set.y.push(0.0);
    set.z.push(0.0);
    set
  }

  /// Set holding `positions` as points `1..=positions.len()`.
  pub fn from_positions(units: Units, positions: &[DVec3]) -> Self {
    let mut set = Self::with_capacity(units, positions.len());
    for &p in positions {
      set.push(p);
    }
    set
  }

  /// Append a point and return its identifier.
  pub fn push(&mut self, position: DVec3) -> u32 {
    self.x.push(position.x);
    self.y.push(position.y);
    self.z.push(position.z);
    (self.x.len() - 1) as u32
  }

  /// Number of real points (the sentinel is not counted).
  #[inline]
  pub fn len(&self) -> usize {
    self.x.len() - 1
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  #[inline]
  pub fn units(&self) -> Units {
    self.units
  }

  /// Error unless the coordinates are in `expected` units.
  pub fn require_units(&self, expected: Units) -> Result<()> {
    if self.units != expected {
      return Err(GridError::UnitsMismatch { expected: expected.name(), found: self.units.name() });
    }
    Ok(())
  }

  #[inline]
  pub fn position(&self, id: u32) -> DVec3 {
    let i = id as usize;
    DVec3::new(self.x[i], self.y[i], self.z[i])
  }

  pub fn xs(&self) -> &[f64] {
    &self.x
  }

  pub fn ys(&self) -> &[f64] {
    &self.y
  }

  pub fn zs(&self) -> &[f64] {
    &self.z
  }

  /// Coordinate array along `axis`, sentinel included.
  #[inline]
  pub fn coord(&self, axis: Axis) -> &[f64] {
    match axis {
      Axis::X => &self.x,
      Axis::Y => &self.y,
      Axis::Z => &self.z,
    }
  }

  /// Convert world coordinates to grid units of `geometry`, in place. A set
  /// already in grid units is left untouched.
  pub fn to_grid_units(&mut self, geometry: &GridGeometry) {
    if self.units == Units::Grid {
      return;
    }
    self.map_real_points(|p| geometry.to_grid_units(p));
    self.units = Units::Grid;
  }

  /// Convert grid units of `geometry` back to world coordinates, in place.
  pub fn to_world_units(&mut self, geometry: &GridGeometry) {
    if self.units == Units::World {
      return;
    }
    self.map_real_points(|p| geometry.to_world_units(p));
    self.units = Units::World;
  }

  /// Move every point (in grid units) to the center of its voxel.
  pub fn snap_to_voxels(&mut self) -> Result<()> {
    self.require_units(Units::Grid)?;
    self.map_real_points(|p| p.floor() + 0.5);
    Ok(())
  }

  /// Squared grid-unit distance from point `id` to the center of voxel
  /// `(x, y, z)`; infinite for the sentinel.
  #[inline]
  pub fn distance2_to_cell(&self, id: u32, x: usize, y: usize, z: usize) -> f64 {
    self.scaled_distance2_to_cell(id, x, y, z, DVec3::ONE)
  }

  /// Like [`distance2_to_cell`](Self::distance2_to_cell) with each axis
  /// offset multiplied by `scale`, usually
  /// [`GridGeometry::axis_scale`].
  #[inline]
  pub fn scaled_distance2_to_cell(&self, id: u32, x: usize, y: usize, z: usize, scale: DVec3) -> f64 {
    if id == 0 {
      return f64::INFINITY;
    }
    let i = id as usize;
    let dx = (self.x[i] - (x as f64 + 0.5)) * scale.x;
    let dy = (self.y[i] - (y as f64 + 0.5)) * scale.y;
    let dz = (self.z[i] - (z as f64 + 0.5)) * scale.z;
    dx * dx + dy * dy + dz * dz
  }

  /// Push every point no voxel of `index_grid` refers to out to infinity,
  /// so later sweeps can never pick it. Returns the number of points still
  /// referenced.
  pub fn remove_unused(&mut self, index_grid: &AttributeGrid) -> usize {
    let mut used = vec![false; self.x.len()];
    let geometry = index_grid.geometry();
    for y in 0..geometry.height {
      for x in 0..geometry.width {
        for z in 0..geometry.depth {
          let id = index_grid.get_attribute(x, y, z) as usize;
          if let Some(flag) = used.get_mut(id) {
            *flag = true;
          }
        }
      }
    }
    let mut count = 0;
    for (i, &is_used) in used.iter().enumerate().skip(1) {
      if is_used {
        count += 1;
      } else {
        self.x[i] = f64::INFINITY;
        self.y[i] = f64::INFINITY;
        self.z[i] = f64::INFINITY;
      }
    }
    count
  }

  fn map_real_points(&mut self, f: impl Fn(DVec3) -> DVec3) {
    for i in 1..self.x.len() {
      let p = f(DVec3::new(self.x[i], self.y[i], self.z[i]));
      self.x[i] = p.x;
      self.y[i] = p.y;
      self.z[i] = p.z;
    }
  }
}

#[cfg(test)]
#[path = "points_test.rs"]
mod points_test;
