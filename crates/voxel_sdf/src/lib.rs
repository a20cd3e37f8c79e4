//! voxel_sdf - Voxel attribute grids and closest-point distance fields
//!
//! This crate stores packed per-voxel attributes and turns a sparse set of
//! surface sample points into a dense nearest-point index, from which signed
//! distance or density grids are derived.
//!
//! # Features
//!
//! - **Channel codecs**: typed bit fields quantizing physical values
//!   (density, distance, color, material, point id) into one attribute word
//! - **Row storage**: dense rows or binary/value interval rows for sparse
//!   content, chosen per grid
//! - **Closest-point transform**: separable lower-envelope sweeps with
//!   multi-pass combination and neighbourhood relaxation
//! - **Field derivation**: clamped signed distance and density grids,
//!   sampled with trilinear interpolation
//!
//! # Example
//!
//! ```ignore
//! use voxel_sdf::{AttributeGrid, ClosestPointIndexer, GridGeometry, IndexerConfig, PointSet, SeedConfig, Units};
//!
//! let geometry = GridGeometry::new(64, 64, 64, 0.1, 0.1);
//! let mut points = PointSet::from_positions(Units::World, &samples);
//! points.to_grid_units(&geometry);
//!
//! let indexer = ClosestPointIndexer::new(IndexerConfig::default())?;
//! let mut seeds = AttributeGrid::index_grid(geometry)?;
//! indexer.seed_shell(&mut seeds, &points, &SeedConfig::default())?;
//! let (index, stats) = indexer.index(&points, seeds)?;
//!
//! println!("resolved {} voxels in {} us", stats.assigned_voxels, stats.elapsed_us);
//! ```

pub mod config;
pub mod error;
pub mod points;
pub mod threading;

pub use config::{FieldConfig, IndexerConfig, SeedConfig, SweepMode};
pub use error::{GridError, Result};
pub use points::{PointSet, Units};
pub use threading::WorkerPool;

// Attribute packing
pub mod channel;
pub use channel::{AttributeChannel, BitField, ChannelKind, GridDataDesc};

// Row representations
pub mod row;
pub use row::{BitIntervals, CellWidth, DenseRow, Row, RowStorage, ValueIntervals};

// Voxel grids
pub mod grid;
pub use grid::{AttributeGrid, GridBounds, GridGeometry};

// Distance transform engine
pub mod closest_point;
pub use closest_point::{ClosestPointIndexer, IndexerStats};
