//! Signed distance and density grids derived from a resolved index grid.

use rayon::prelude::*;

use crate::channel::{AttributeChannel, ChannelKind};
use crate::config::FieldConfig;
use crate::error::{GridError, Result};
use crate::grid::AttributeGrid;
use crate::points::{PointSet, Units};

/// Clamped linear step of width `width` centered on 0: 1 at or below
/// `-width / 2`, 0 at or above `width / 2`.
#[inline]
pub fn step10(x: f64, width: f64) -> f64 {
  let half = 0.5 * width;
  if x <= -half {
    1.0
  } else if x >= half {
    0.0
  } else {
    0.5 - x / width
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldKind {
  Distance,
  Density,
}

/// Encode the clamped signed distance of every voxel into `out`.
///
/// `interior` marks voxels inside the solid with a non-zero attribute;
/// their distances are negative. Without an interior grid every voxel is
/// outside. Voxels without a point take
/// `-max_in_distance` inside and `max_out_distance` outside. Points must be
/// in world units. Returns the number of voxels without a point.
///
/// Uses rayon's current pool; call it through
/// [`WorkerPool::phase`](crate::threading::WorkerPool::phase).
#[tracing::instrument(skip_all, name = "closest_point::make_distance_grid")]
pub fn make_distance_grid(
  index: &AttributeGrid,
  interior: Option<&AttributeGrid>,
  points: &PointSet,
  out: &mut AttributeGrid,
  config: &FieldConfig,
) -> Result<u64> {
  let channel = out
    .desc()
    .channel_with_kind(ChannelKind::Distance)
    .or_else(|| out.desc().default_channel())
    .cloned();
  derive(index, interior, points, out, config, channel, FieldKind::Distance)
}

/// Encode a density of `step10(signed distance, voxel size)` for every
/// voxel into `out`. Voxels without a point are 1 inside, 0 outside.
#[tracing::instrument(skip_all, name = "closest_point::make_density_grid")]
pub fn make_density_grid(
  index: &AttributeGrid,
  interior: Option<&AttributeGrid>,
  points: &PointSet,
  out: &mut AttributeGrid,
  config: &FieldConfig,
) -> Result<u64> {
  let channel = out.desc().density_channel().or_else(|| out.desc().default_channel()).cloned();
  derive(index, interior, points, out, config, channel, FieldKind::Density)
}

fn derive(
  index: &AttributeGrid,
  interior: Option<&AttributeGrid>,
  points: &PointSet,
  out: &mut AttributeGrid,
  config: &FieldConfig,
  channel: Option<AttributeChannel>,
  kind: FieldKind,
) -> Result<u64> {
  points.require_units(Units::World)?;
  config.validate()?;
  if let Some(interior) = interior {
    index.check_same_dims(interior)?;
  }
  index.check_same_dims(out)?;
  let channel =
    channel.ok_or_else(|| GridError::InvalidConfig("output grid has no attribute channel".into()))?;

  let geometry = *index.geometry();
  let depth = geometry.depth;
  let slice_size = geometry.slice_size();
  let voxel = geometry.voxel_size.x;
  let (max_in, max_out) = (config.max_in_distance, config.max_out_distance);

  let unresolved: u64 = out
    .rows_mut()
    .par_iter_mut()
    .enumerate()
    .map(|(y, row)| {
      let mut unresolved = 0u64;
      for pos in 0..slice_size {
        let (x, z) = (pos / depth, pos % depth);
        let inside = interior.is_some_and(|grid| grid.get_attribute(x, y, z) != 0);
        let id = index.get_attribute(x, y, z);

        let value = if id == 0 {
          unresolved += 1;
          match (kind, inside) {
            (FieldKind::Distance, true) => -max_in,
            (FieldKind::Distance, false) => max_out,
            (FieldKind::Density, true) => 1.0,
            (FieldKind::Density, false) => 0.0,
          }
        } else {
          let d = points.position(id as u32).distance(geometry.world_coords(x, y, z));
          let signed = if inside { -d } else { d };
          let clamped = signed.clamp(-max_in, max_out);
          match kind {
            FieldKind::Distance => clamped,
            FieldKind::Density => step10(clamped, voxel),
          }
        };

        let word = channel.store(row.get(pos), value);
        row.set(pos, word);
      }
      unresolved
    })
    .sum();

  tracing::debug!(?kind, unresolved, "field derived");
  Ok(unresolved)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_step10_shape() {
    assert_eq!(step10(-1.0, 1.0), 1.0);
    assert_eq!(step10(-0.5, 1.0), 1.0);
    assert_eq!(step10(0.0, 1.0), 0.5);
    assert_eq!(step10(0.25, 1.0), 0.25);
    assert_eq!(step10(0.5, 1.0), 0.0);
    assert_eq!(step10(3.0, 2.0), 0.0);
    assert_eq!(step10(-0.5, 2.0), 0.75);
  }
}
