//! World-space box covered by a voxel grid, in double precision.

use glam::DVec3;

use super::geometry::GridGeometry;

/// Double-precision axis-aligned box.
///
/// Grids cover `[min, max]` with `max = min + dims * voxel_size`; voxel
/// centers sit half a voxel inside the faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridBounds {
	/// World origin of voxel (0, 0, 0)'s lower corner.
	pub min: DVec3,
	/// Upper corner of the last voxel.
	pub max: DVec3,
}

impl GridBounds {
	/// Box spanning `min..=max`; `min` must not exceed `max` on any axis.
	pub fn new(min: DVec3, max: DVec3) -> Self {
		debug_assert!(min.cmple(max).all(), "inverted bounds {min} > {max}");
		GridBounds { min, max }
	}

	/// Box covered by `geometry`.
	pub fn from_geometry(geometry: &GridGeometry) -> Self {
		geometry.bounds()
	}

	/// Check if these bounds contain a point, faces included.
	#[inline]
	pub fn contains_point(&self, point: DVec3) -> bool {
		point.cmpge(self.min).all() && point.cmple(self.max).all()
	}

	/// Extent along each axis.
	#[inline]
	pub fn size(&self) -> DVec3 {
		self.max - self.min
	}

	#[inline]
	pub fn center(&self) -> DVec3 {
		(self.min + self.max) * 0.5
	}

	/// Voxel counts needed to cover the box with cells of `voxel_size`,
	/// rounded to the nearest whole cell and at least one per axis.
	pub fn grid_dims(&self, voxel_size: DVec3) -> [usize; 3] {
		let cells = (self.size() / voxel_size).round().max(DVec3::ONE);
		[cells.x as usize, cells.y as usize, cells.z as usize]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_size_and_center() {
		let bounds = GridBounds::new(DVec3::splat(-10.0), DVec3::new(10.0, 0.0, 4.0));
		assert_eq!(bounds.size(), DVec3::new(20.0, 10.0, 14.0));
		assert_eq!(bounds.center(), DVec3::new(0.0, -5.0, -3.0));
	}

	#[test]
	fn test_contains_point_includes_faces() {
		let bounds = GridBounds::new(DVec3::ZERO, DVec3::splat(10.0));
		assert!(bounds.contains_point(DVec3::splat(5.0)));
		assert!(bounds.contains_point(DVec3::ZERO));
		assert!(bounds.contains_point(DVec3::splat(10.0)));
		assert!(!bounds.contains_point(DVec3::new(5.0, -0.1, 5.0)));
		assert!(!bounds.contains_point(DVec3::splat(11.0)));
	}

	#[test]
	fn test_grid_dims_rounds_to_whole_cells() {
		let bounds = GridBounds::new(DVec3::ZERO, DVec3::new(10.0, 5.0, 0.1));
		assert_eq!(bounds.grid_dims(DVec3::new(0.5, 0.5, 0.5)), [20, 10, 1]);
		assert_eq!(bounds.grid_dims(DVec3::new(3.0, 0.5, 1.0)), [3, 10, 1]);
	}

	#[test]
	fn test_from_geometry_covers_all_voxels() {
		let geometry = GridGeometry::new(4, 2, 8, 0.5, 1.0).with_origin(DVec3::new(1.0, 0.0, -2.0));
		let bounds = GridBounds::from_geometry(&geometry);
		assert_eq!(bounds.min, DVec3::new(1.0, 0.0, -2.0));
		assert_eq!(bounds.max, DVec3::new(3.0, 2.0, 2.0));
		assert!(bounds.contains_point(geometry.world_coords(3, 1, 7)));
	}
}
