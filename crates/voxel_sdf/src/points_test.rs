use super::*;

#[test]
fn test_ids_start_at_one() {
  let mut points = PointSet::new(Units::World);
  assert!(points.is_empty());
  assert_eq!(points.push(DVec3::new(1.0, 2.0, 3.0)), 1);
  assert_eq!(points.push(DVec3::new(4.0, 5.0, 6.0)), 2);
  assert_eq!(points.len(), 2);
  assert_eq!(points.xs().len(), 3, "sentinel slot must be kept");
  assert_eq!(points.position(2), DVec3::new(4.0, 5.0, 6.0));
  assert_eq!(points.coord(Axis::Y), &[0.0, 2.0, 5.0]);
}

#[test]
fn test_unit_conversion_round_trip() {
  let geometry = GridGeometry::new(10, 10, 10, 0.5, 0.25).with_origin(DVec3::new(-1.0, 2.0, 0.0));
  let mut points = PointSet::from_positions(Units::World, &[DVec3::new(0.0, 2.5, 1.25)]);

  points.to_grid_units(&geometry);
  assert_eq!(points.units(), Units::Grid);
  assert_eq!(points.position(1), DVec3::new(2.0, 2.0, 2.5));
  assert_eq!(points.position(0), DVec3::ZERO, "sentinel must not be converted");

  // converting twice is a no-op
  points.to_grid_units(&geometry);
  assert_eq!(points.position(1), DVec3::new(2.0, 2.0, 2.5));

  points.to_world_units(&geometry);
  assert_eq!(points.units(), Units::World);
  assert_eq!(points.position(1), DVec3::new(0.0, 2.5, 1.25));
}

#[test]
fn test_snap_requires_grid_units() {
  let mut points = PointSet::from_positions(Units::World, &[DVec3::new(1.2, 3.9, 0.0)]);
  assert_eq!(
    points.snap_to_voxels(),
    Err(GridError::UnitsMismatch { expected: "grid", found: "world" })
  );
  points.to_grid_units(&GridGeometry::unit(4, 4, 4));
  points.snap_to_voxels().unwrap();
  assert_eq!(points.position(1), DVec3::new(1.5, 3.5, 0.5));
}

#[test]
fn test_distance_to_cell_center() {
  let points = PointSet::from_positions(Units::Grid, &[DVec3::new(1.5, 1.5, 1.5)]);
  assert_eq!(points.distance2_to_cell(1, 1, 1, 1), 0.0);
  assert_eq!(points.distance2_to_cell(1, 0, 1, 3), 1.0 + 4.0);
  assert_eq!(points.distance2_to_cell(0, 1, 1, 1), f64::INFINITY);
}

#[test]
fn test_scaled_distance_weights_each_axis() {
  let points = PointSet::from_positions(Units::Grid, &[DVec3::new(1.5, 1.5, 1.5)]);
  let scale = GridGeometry::new(4, 4, 4, 0.5, 2.0).axis_scale();
  assert_eq!(scale, DVec3::new(1.0, 4.0, 1.0));
  // one slice up is four voxel widths
  assert_eq!(points.scaled_distance2_to_cell(1, 1, 2, 1, scale), 16.0);
  assert_eq!(points.scaled_distance2_to_cell(1, 0, 1, 3, scale), 1.0 + 4.0);
  assert_eq!(points.scaled_distance2_to_cell(0, 1, 1, 1, scale), f64::INFINITY);
}

#[test]
fn test_remove_unused_moves_points_to_infinity() {
  let mut points = PointSet::from_positions(
    Units::Grid,
    &[DVec3::splat(0.5), DVec3::splat(1.5), DVec3::splat(2.5)],
  );
  let mut grid = AttributeGrid::index_grid(GridGeometry::unit(3, 3, 3)).unwrap();
  grid.set_attribute(0, 0, 0, 1);
  grid.set_attribute(2, 2, 2, 3);

  assert_eq!(points.remove_unused(&grid), 2);
  assert_eq!(points.position(1), DVec3::splat(0.5));
  assert!(points.position(2).x.is_infinite());
  assert_eq!(points.position(3), DVec3::splat(2.5));
  assert_eq!(points.distance2_to_cell(2, 1, 1, 1), f64::INFINITY);
}
