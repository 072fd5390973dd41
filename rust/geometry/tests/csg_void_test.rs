// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening subtraction on placed walls: ordering, placement and disjoint cavities.

use approx::assert_relative_eq;
use blueprint_lite_geometry::{
    plan_to_world, point_along_wall, segment_angle, segment_length, segment_midpoint,
    BooleanCutter, BoxDimensions, Mesh, Point2, Point3, Ray, Solid, Vector3,
};

const HEIGHT: f64 = 3.0;
const THICKNESS: f64 = 0.2;
const MARGIN: f64 = 0.02;

fn wall_between(from: Point2<f64>, to: Point2<f64>) -> Solid {
    let center = plan_to_world(&segment_midpoint(&from, &to), HEIGHT / 2.0);
    Solid::new_box(
        center,
        BoxDimensions::new(segment_length(&from, &to), HEIGHT, THICKNESS),
        segment_angle(&from, &to),
    )
    .unwrap()
}

fn cavity_at(from: Point2<f64>, to: Point2<f64>, offset: f64, width: f64, sill: f64, height: f64) -> Solid {
    let plan = point_along_wall(&from, &to, offset).unwrap();
    // Openings at floor level reach below the wall base to avoid a coplanar bottom face
    let bottom = if sill <= 0.0 { sill - MARGIN } else { sill };
    let top = sill + height;
    Solid::new_box(
        plan_to_world(&plan, (bottom + top) / 2.0),
        BoxDimensions::new(width, top - bottom, THICKNESS + MARGIN),
        segment_angle(&from, &to),
    )
    .unwrap()
}

fn analyze_mesh(mesh: &Mesh, name: &str) {
    let (min, max) = mesh.bounds();
    println!("\n=== {} ===", name);
    println!("  Triangles: {}", mesh.triangle_count());
    println!("  Vertices: {}", mesh.vertex_count());
    println!(
        "  Bounds: min=({:.2}, {:.2}, {:.2}), max=({:.2}, {:.2}, {:.2})",
        min.x, min.y, min.z, max.x, max.y, max.z
    );
    println!("  Volume: {:.4}", mesh.signed_volume());

    let has_nan = mesh.positions.iter().any(|&v| !v.is_finite())
        || mesh.normals.iter().any(|&v| !v.is_finite());
    assert!(!has_nan, "{} has NaN/Inf values", name);
    assert_eq!(mesh.positions.len(), mesh.normals.len());
}

#[test]
fn subtraction_order_does_not_change_volume() {
    let from = Point2::new(0.0, 0.0);
    let to = Point2::new(6.0, 0.0);
    let wall = wall_between(from, to);
    let a = cavity_at(from, to, 1.5, 1.0, 0.8, 1.2);
    let b = cavity_at(from, to, 4.5, 1.2, 0.0, 2.1);

    let cutter = BooleanCutter::new();
    let ab = cutter.cut(&wall, &[a.clone(), b.clone()]).unwrap();
    let ba = cutter.cut(&wall, &[b, a]).unwrap();

    analyze_mesh(&ab.world_mesh(), "A then B");
    analyze_mesh(&ba.world_mesh(), "B then A");

    let expected = 6.0 * HEIGHT * THICKNESS - (1.0 * 1.2 + 1.2 * 2.1) * THICKNESS;
    assert_relative_eq!(ab.volume(), expected, epsilon = 1e-3);
    assert_relative_eq!(ab.volume(), ba.volume(), epsilon = 1e-4);
}

#[test]
fn rotated_wall_keeps_its_placement() {
    // Diagonal wall exercises the rotation convention on both wall and cavity
    let from = Point2::new(1.0, 1.0);
    let to = Point2::new(4.0, 5.0);
    let wall = wall_between(from, to);
    let cavity = cavity_at(from, to, 2.5, 1.0, 0.0, 2.0);

    let cut = BooleanCutter::new().cut(&wall, &[cavity]).unwrap();
    assert_eq!(cut.placement(), wall.placement());

    let (min_before, max_before) = wall.world_bounds();
    let (min_after, max_after) = cut.world_bounds();
    assert_relative_eq!(min_before, min_after, epsilon = 1e-5);
    assert_relative_eq!(max_before, max_after, epsilon = 1e-5);

    let expected = 5.0 * HEIGHT * THICKNESS - 1.0 * 2.0 * THICKNESS;
    assert_relative_eq!(cut.volume(), expected, epsilon = 1e-3);
}

#[test]
fn two_disjoint_cavities_leave_wall_between() {
    let from = Point2::new(0.0, 0.0);
    let to = Point2::new(5.0, 0.0);
    let wall = wall_between(from, to);
    let cavities = [
        cavity_at(from, to, 1.0, 1.0, 0.0, 2.0),
        cavity_at(from, to, 4.0, 1.0, 0.0, 2.0),
    ];

    let cut = BooleanCutter::new().cut(&wall, &cavities).unwrap();
    let mesh = cut.world_mesh();
    analyze_mesh(&mesh, "two doors");

    let through = |x: f64| Ray::new(Point3::new(x, 1.0, 5.0), -Vector3::z());
    assert!(mesh.raycast(&through(1.0)).is_none(), "first cavity should be open");
    assert!(mesh.raycast(&through(4.0)).is_none(), "second cavity should be open");
    assert!(mesh.raycast(&through(2.5)).is_some(), "wall between cavities should remain");
}

#[test]
fn overlapping_cavities_remove_their_union() {
    let from = Point2::new(0.0, 0.0);
    let to = Point2::new(5.0, 0.0);
    let wall = wall_between(from, to);
    let a = cavity_at(from, to, 2.0, 1.0, 0.0, 2.0);
    let b = cavity_at(from, to, 2.5, 1.0, 0.0, 2.0);

    let cutter = BooleanCutter::new();
    let ab = cutter.cut(&wall, &[a.clone(), b.clone()]).unwrap();
    let ba = cutter.cut(&wall, &[b, a]).unwrap();
    analyze_mesh(&ab.world_mesh(), "overlapping A then B");

    // Union spans x in [1.5, 3.0]
    let expected = 5.0 * HEIGHT * THICKNESS - 1.5 * 2.0 * THICKNESS;
    assert_relative_eq!(ab.volume(), expected, epsilon = 1e-3);
    assert_relative_eq!(ba.volume(), expected, epsilon = 1e-3);

    let mesh = ab.world_mesh();
    let through = |x: f64| Ray::new(Point3::new(x, 1.0, 5.0), -Vector3::z());
    assert!(mesh.raycast(&through(1.75)).is_none());
    assert!(mesh.raycast(&through(2.25)).is_none());
    assert!(mesh.raycast(&through(2.75)).is_none());
    assert!(mesh.raycast(&through(3.5)).is_some());
}
