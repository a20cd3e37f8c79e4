//! Trilinear sampling of decoded channel values.

use glam::DVec3;

use super::AttributeGrid;

impl AttributeGrid {
  /// Trilinearly interpolated value of channel `channel` at `world`.
  ///
  /// Samples sit at voxel centers; positions outside the outermost centers
  /// are clamped to the border voxels. Returns `None` for an unknown
  /// channel.
  pub fn sample_trilinear(&self, world: DVec3, channel: usize) -> Option<f64> {
    let codec = self.desc().channel(channel)?;
    let geometry = self.geometry();
    let max = DVec3::new(
      (geometry.width - 1) as f64,
      (geometry.height - 1) as f64,
      (geometry.depth - 1) as f64,
    );
    let g = (geometry.to_grid_units(world) - 0.5).clamp(DVec3::ZERO, max);
    let base = g.floor();
    let t = g - base;

    let x0 = base.x as usize;
    let y0 = base.y as usize;
    let z0 = base.z as usize;
    let x1 = (x0 + 1).min(geometry.width - 1);
    let y1 = (y0 + 1).min(geometry.height - 1);
    let z1 = (z0 + 1).min(geometry.depth - 1);

    let v = |x, y, z| codec.decode(self.get_attribute(x, y, z));
    let lerp = |a: f64, b: f64, t: f64| a + (b - a) * t;

    let c00 = lerp(v(x0, y0, z0), v(x1, y0, z0), t.x);
    let c10 = lerp(v(x0, y1, z0), v(x1, y1, z0), t.x);
    let c01 = lerp(v(x0, y0, z1), v(x1, y0, z1), t.x);
    let c11 = lerp(v(x0, y1, z1), v(x1, y1, z1), t.x);
    let c0 = lerp(c00, c10, t.y);
    let c1 = lerp(c01, c11, t.y);
    Some(lerp(c0, c1, t.z))
  }
}
