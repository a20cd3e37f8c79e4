//! Configuration for the closest-point engine and field derivation.

use crate::error::{GridError, Result};

/// How many separable sweeps the indexer runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SweepMode {
  /// One X-Y-Z sweep. Fastest, largest error for off-grid points.
  Single,
  /// X-Y-Z, Y-Z-X and Z-X-Y sweeps from the same seed, keeping the closer
  /// assignment per voxel.
  #[default]
  MultiPass,
}

/// Configuration for [`ClosestPointIndexer`](crate::ClosestPointIndexer).
#[derive(Clone, Debug, PartialEq)]
pub struct IndexerConfig {
  /// Worker threads; 0 lets rayon choose.
  pub threads: usize,

  /// Sweep strategy.
  pub sweep: SweepMode,

  /// Maximum relaxation iterations; 0 disables relaxation.
  pub relax_iterations: usize,

  /// Neighbourhood radius of a relaxation step, in voxels.
  pub relax_radius: f64,

  /// Voxels farther than this from every point stay unassigned, through
  /// every sweep and relaxation step. Measured in X voxel widths, with Y
  /// offsets scaled by the slice height. `None` resolves the whole grid.
  pub max_distance: Option<f64>,
}

impl Default for IndexerConfig {
  fn default() -> Self {
    Self {
      threads: 0,
      sweep: SweepMode::default(),
      relax_iterations: 0,
      relax_radius: 1.5,
      max_distance: None,
    }
  }
}

impl IndexerConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_threads(mut self, threads: usize) -> Self {
    self.threads = threads;
    self
  }

  pub fn with_sweep(mut self, sweep: SweepMode) -> Self {
    self.sweep = sweep;
    self
  }

  pub fn with_relax_iterations(mut self, iterations: usize) -> Self {
    self.relax_iterations = iterations;
    self
  }

  pub fn with_relax_radius(mut self, radius: f64) -> Self {
    self.relax_radius = radius;
    self
  }

  pub fn with_max_distance(mut self, distance: f64) -> Self {
    self.max_distance = Some(distance);
    self
  }

  /// Squared cutoff distance, infinite when there is no cutoff.
  #[inline]
  pub fn max_distance2(&self) -> f64 {
    self.max_distance.map_or(f64::INFINITY, |d| d * d)
  }

  pub fn validate(&self) -> Result<()> {
    if !(self.relax_radius >= 1.0 && self.relax_radius.is_finite()) {
      return Err(GridError::InvalidConfig(format!(
        "relax_radius must be a finite value >= 1, got {}",
        self.relax_radius
      )));
    }
    if let Some(d) = self.max_distance {
      if !(d > 0.0) {
        return Err(GridError::InvalidConfig(format!("max_distance must be positive, got {d}")));
      }
    }
    Ok(())
  }
}

/// Clamp range for derived distance and density grids, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
  /// Largest magnitude of negative (interior) distances.
  pub max_in_distance: f64,
  /// Largest positive (exterior) distance.
  pub max_out_distance: f64,
}

impl Default for FieldConfig {
  fn default() -> Self {
    Self { max_in_distance: 1.0, max_out_distance: 1.0 }
  }
}

impl FieldConfig {
  pub fn new(max_in_distance: f64, max_out_distance: f64) -> Self {
    Self { max_in_distance, max_out_distance }
  }

  pub fn with_max_in_distance(mut self, distance: f64) -> Self {
    self.max_in_distance = distance;
    self
  }

  pub fn with_max_out_distance(mut self, distance: f64) -> Self {
    self.max_out_distance = distance;
    self
  }

  pub fn validate(&self) -> Result<()> {
    if !(self.max_in_distance >= 0.0 && self.max_out_distance >= 0.0)
      || !(self.max_in_distance.is_finite() && self.max_out_distance.is_finite())
    {
      return Err(GridError::InvalidConfig(format!(
        "distance clamps must be finite and non-negative, got in={} out={}",
        self.max_in_distance, self.max_out_distance
      )));
    }
    Ok(())
  }
}

/// Thin-shell seeding parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedConfig {
  /// Shell half-thickness around each point, in voxels.
  pub layer_thickness: f64,
  /// Sub-voxel steps used to compare candidate distances.
  pub subvoxel_resolution: u32,
}

impl Default for SeedConfig {
  fn default() -> Self {
    Self { layer_thickness: 1.0, subvoxel_resolution: 10 }
  }
}

impl SeedConfig {
  pub fn with_layer_thickness(mut self, thickness: f64) -> Self {
    self.layer_thickness = thickness;
    self
  }

  pub fn with_subvoxel_resolution(mut self, resolution: u32) -> Self {
    self.subvoxel_resolution = resolution;
    self
  }

  pub fn validate(&self) -> Result<()> {
    if !(self.layer_thickness >= 0.0 && self.layer_thickness.is_finite()) {
      return Err(GridError::InvalidConfig(format!(
        "layer_thickness must be finite and non-negative, got {}",
        self.layer_thickness
      )));
    }
    if self.subvoxel_resolution == 0 {
      return Err(GridError::InvalidConfig("subvoxel_resolution must be positive".into()));
    }
    Ok(())
  }
}
