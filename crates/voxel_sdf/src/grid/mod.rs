//! Voxel attribute grids.
//!
//! An [`AttributeGrid`] stores one packed attribute word per voxel. Storage
//! is organised as one [`Row`] per Y slice; inside a slice the position of
//! voxel `(x, z)` is `x * depth + z`, so Z varies fastest:
//!
//! ```text
//!   rows[y]:  x=0: z0 z1 .. z(d-1) │ x=1: z0 z1 .. │ ... │ x=w-1: ..
//!             └────────── slice_size = width * depth ──────────────┘
//!
//!   linear index = y * slice_size + x * depth + z
//! ```
//!
//! Slices are independent rows, so stages can hand each worker a disjoint
//! `&mut Row`.

mod bounds;
mod geometry;
mod sample;

pub use bounds::GridBounds;
pub use geometry::GridGeometry;

use glam::DVec3;
use rayon::prelude::*;

use crate::channel::GridDataDesc;
use crate::error::{GridError, Result};
use crate::row::{CellWidth, Row, RowStorage};

/// Largest voxel count of a compact grid: every flat index and every
/// in-slice position fits in a `u32`.
pub const MAX_COMPACT_VOXELS: u64 = u32::MAX as u64;

/// 3D grid of packed attribute words.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeGrid {
  geometry: GridGeometry,
  desc: GridDataDesc,
  storage: RowStorage,
  wide: bool,
  rows: Vec<Row>,
}

impl AttributeGrid {
  /// Create a zero-filled compact grid.
  ///
  /// Fails if a dimension is zero, the voxel count exceeds
  /// [`MAX_COMPACT_VOXELS`], the voxel size is not positive, or `storage`
  /// is too narrow for `desc`.
  pub fn new(geometry: GridGeometry, desc: GridDataDesc, storage: RowStorage) -> Result<Self> {
    Self::build(geometry, desc, storage, false)
  }

  /// Create a zero-filled dense grid without the compact index limit.
  ///
  /// Interval rows address positions with `u32`, so wide grids are always
  /// dense.
  pub fn new_wide(geometry: GridGeometry, desc: GridDataDesc, width: CellWidth) -> Result<Self> {
    Self::build(geometry, desc, RowStorage::Dense(width), true)
  }

  /// Dense 32-bit point-index grid, all voxels unassigned.
  pub fn index_grid(geometry: GridGeometry) -> Result<Self> {
    Self::new(geometry, GridDataDesc::point_index()?, RowStorage::Dense(CellWidth::U32))
  }

  fn build(geometry: GridGeometry, desc: GridDataDesc, storage: RowStorage, wide: bool) -> Result<Self> {
    let GridGeometry { width, height, depth, .. } = geometry;
    if width == 0 || height == 0 || depth == 0 {
      return Err(GridError::EmptyGrid { width, height, depth });
    }

    let voxels = geometry.voxel_count();
    let limit = if wide && storage.supports_wide_positions() {
      usize::MAX as u64
    } else {
      MAX_COMPACT_VOXELS
    };
    if voxels > limit as u128 {
      return Err(GridError::TooManyVoxels { voxels, limit });
    }

    let voxel_size = geometry.voxel_size;
    if !(voxel_size.is_finite() && voxel_size.min_element() > 0.0) || !geometry.origin.is_finite() {
      return Err(GridError::InvalidConfig(format!(
        "voxel size {voxel_size} must be positive and origin {} finite",
        geometry.origin
      )));
    }

    let required = desc.required_bits();
    let available = storage.attribute_bits();
    if required > available {
      return Err(GridError::AttributeTooWide { required, available });
    }

    let slice_size = geometry.slice_size();
    let rows = (0..height).map(|_| storage.make_row(slice_size)).collect();
    Ok(Self { geometry, desc, storage, wide, rows })
  }

  /// New zero-filled grid with the same storage, attribute layout and origin
  /// but different dimensions and voxel size.
  pub fn create_empty(
    &self,
    width: usize,
    height: usize,
    depth: usize,
    voxel_size: f64,
    slice_height: f64,
  ) -> Result<Self> {
    let geometry =
      GridGeometry::new(width, height, depth, voxel_size, slice_height).with_origin(self.geometry.origin);
    Self::build(geometry, self.desc.clone(), self.storage, self.wide)
  }

  /// New zero-filled grid identical to this one in every respect but content.
  pub fn empty_like(&self) -> Self {
    Self {
      geometry: self.geometry,
      desc: self.desc.clone(),
      storage: self.storage,
      wide: self.wide,
      rows: (0..self.geometry.height)
        .map(|_| self.storage.make_row(self.geometry.slice_size()))
        .collect(),
    }
  }

  /// Overwrite every voxel with the attribute of the same voxel in `other`.
  pub fn copy_from(&mut self, other: &AttributeGrid) -> Result<()> {
    self.check_same_dims(other)?;
    if self.storage == other.storage {
      self.rows.clone_from(&other.rows);
      return Ok(());
    }
    let slice_size = self.geometry.slice_size();
    self.rows.par_iter_mut().zip(other.rows.par_iter()).for_each(|(dst, src)| {
      dst.clear();
      for pos in 0..slice_size {
        let value = src.get(pos);
        if value != 0 {
          dst.set(pos, value);
        }
      }
    });
    Ok(())
  }

  /// Error unless `other` has the same dimensions.
  pub fn check_same_dims(&self, other: &AttributeGrid) -> Result<()> {
    if self.geometry.dims() != other.geometry.dims() {
      return Err(GridError::DimensionMismatch {
        expected: self.geometry.dims(),
        found: other.geometry.dims(),
      });
    }
    Ok(())
  }

  #[inline]
  pub fn geometry(&self) -> &GridGeometry {
    &self.geometry
  }

  #[inline]
  pub fn desc(&self) -> &GridDataDesc {
    &self.desc
  }

  #[inline]
  pub fn storage(&self) -> RowStorage {
    self.storage
  }

  #[inline]
  pub fn width(&self) -> usize {
    self.geometry.width
  }

  #[inline]
  pub fn height(&self) -> usize {
    self.geometry.height
  }

  #[inline]
  pub fn depth(&self) -> usize {
    self.geometry.depth
  }

  /// Voxel size along X (and Z).
  #[inline]
  pub fn voxel_size(&self) -> f64 {
    self.geometry.voxel_size.x
  }

  #[inline]
  pub fn slice_height(&self) -> f64 {
    self.geometry.voxel_size.y
  }

  #[inline]
  pub fn get_attribute(&self, x: usize, y: usize, z: usize) -> u64 {
    self.rows[y].get(x * self.geometry.depth + z)
  }

  #[inline]
  pub fn set_attribute(&mut self, x: usize, y: usize, z: usize, value: u64) {
    let pos = x * self.geometry.depth + z;
    self.rows[y].set(pos, value);
  }

  /// Attribute of the voxel containing `world`, `None` outside the grid.
  pub fn get_attribute_world(&self, world: DVec3) -> Option<u64> {
    let [x, y, z] = self.geometry.cell_at(world)?;
    Some(self.get_attribute(x, y, z))
  }

  /// Set the voxel containing `world`; returns false outside the grid.
  pub fn set_attribute_world(&mut self, world: DVec3, value: u64) -> bool {
    match self.geometry.cell_at(world) {
      Some([x, y, z]) => {
        self.set_attribute(x, y, z, value);
        true
      }
      None => false,
    }
  }

  /// Decode channel `channel` of voxel `(x, y, z)`.
  pub fn get_value(&self, x: usize, y: usize, z: usize, channel: usize) -> Option<f64> {
    let codec = self.desc.channel(channel)?;
    Some(codec.decode(self.get_attribute(x, y, z)))
  }

  /// Encode `value` into channel `channel` of voxel `(x, y, z)`, keeping
  /// the other channels. Returns false for an unknown channel.
  pub fn set_value(&mut self, x: usize, y: usize, z: usize, channel: usize, value: f64) -> bool {
    let Some(codec) = self.desc.channel(channel) else {
      return false;
    };
    let word = codec.store(self.get_attribute(x, y, z), value);
    self.set_attribute(x, y, z, word);
    true
  }

  pub fn grid_bounds(&self) -> GridBounds {
    self.geometry.bounds()
  }

  /// World-space center of voxel `(x, y, z)`.
  #[inline]
  pub fn world_coords(&self, x: usize, y: usize, z: usize) -> DVec3 {
    self.geometry.world_coords(x, y, z)
  }

  /// Voxel coordinates containing `world`, unclamped.
  #[inline]
  pub fn grid_coords(&self, world: DVec3) -> [i64; 3] {
    self.geometry.grid_coords(world)
  }

  /// Set every voxel to `value`.
  pub fn fill(&mut self, value: u64) {
    let slice_size = self.geometry.slice_size();
    self.rows.par_iter_mut().for_each(|row| {
      if let Row::Dense(dense) = row {
        dense.fill(value);
        return;
      }
      row.clear();
      if value != 0 {
        for pos in 0..slice_size {
          row.set(pos, value);
        }
      }
    });
  }

  /// Set every voxel to 0, keeping row allocations.
  pub fn clear(&mut self) {
    self.rows.par_iter_mut().for_each(Row::clear);
  }

  /// Number of voxels holding a non-zero attribute.
  pub fn count_assigned(&self) -> u64 {
    let slice_size = self.geometry.slice_size();
    self
      .rows
      .par_iter()
      .map(|row| (0..slice_size).filter(|&pos| row.get(pos) != 0).count() as u64)
      .sum()
  }

  /// Bytes of row storage currently allocated.
  pub fn memory_bytes(&self) -> usize {
    self.rows.iter().map(Row::memory_bytes).sum()
  }

  /// Slice rows, indexed by Y.
  #[inline]
  pub(crate) fn rows(&self) -> &[Row] {
    &self.rows
  }

  #[inline]
  pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
    &mut self.rows
  }
}
