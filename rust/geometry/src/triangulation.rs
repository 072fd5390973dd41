// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation for floor outlines and cut faces
//!
//! Convex rings are fanned; anything else goes through earcutr. Indices
//! refer to the input ring.

use crate::{Error, Point2, Point3, Result, Vector3};

/// Largest ring fanned without running earcut
const MAX_FAN_VERTICES: usize = 8;

/// True when every non-degenerate corner turns the same way
fn is_convex(ring: &[Point2<f64>]) -> bool {
    let n = ring.len();
    let mut turn = 0.0f64;
    for i in 0..n {
        let (a, b, c) = (ring[i], ring[(i + 1) % n], ring[(i + 2) % n]);
        let cross = (b - a).perp(&(c - b));
        if cross.abs() <= 1e-10 {
            continue;
        }
        if turn != 0.0 && turn.signum() != cross.signum() {
            return false;
        }
        turn = cross;
    }
    n >= 3
}

/// Triangulate a simple ring without holes
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();
    if n < 3 {
        return Err(Error::TriangulationError(format!(
            "need at least 3 points, got {}",
            n
        )));
    }

    if n <= MAX_FAN_VERTICES && is_convex(points) {
        return Ok((1..n - 1).flat_map(|i| [0, i, i + 1]).collect());
    }

    let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    let indices = earcutr::earcut(&coords, &[], 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;
    if indices.is_empty() {
        return Err(Error::TriangulationError("ring produced no triangles".to_string()));
    }
    Ok(indices)
}

/// Shoelace area of a closed polygon, positive for counter-clockwise order
pub fn polygon_signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| points[i].coords.perp(&points[(i + 1) % n].coords))
        .sum::<f64>()
        / 2.0
}

/// Project points onto the plane through the first point with `normal`
///
/// Returns the 2D points plus the plane basis `(u, v, origin)`; `u x v` is
/// `normal`, so counter-clockwise rings about the normal stay
/// counter-clockwise in 2D.
pub fn project_to_2d(
    points_3d: &[Point3<f64>],
    normal: &Vector3<f64>,
) -> (Vec<Point2<f64>>, Vector3<f64>, Vector3<f64>, Point3<f64>) {
    if points_3d.is_empty() {
        return (
            Vec::new(),
            Vector3::zeros(),
            Vector3::zeros(),
            Point3::origin(),
        );
    }

    let origin = points_3d[0];

    // Axis least parallel to the normal gives a stable cross product
    let abs_x = normal.x.abs();
    let abs_y = normal.y.abs();
    let abs_z = normal.z.abs();

    let reference = if abs_x <= abs_y && abs_x <= abs_z {
        Vector3::new(1.0, 0.0, 0.0)
    } else if abs_y <= abs_z {
        Vector3::new(0.0, 1.0, 0.0)
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    };

    let u_axis = normal.cross(&reference).normalize();
    let v_axis = normal.cross(&u_axis).normalize();

    let points_2d = points_3d
        .iter()
        .map(|p| {
            let v = p - origin;
            Point2::new(v.dot(&u_axis), v.dot(&v_axis))
        })
        .collect();

    (points_2d, u_axis, v_axis, origin)
}

/// Unit normal of a planar ring (Newell's method), +Z when degenerate
pub fn calculate_polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let normal = (0..n).fold(Vector3::zeros(), |acc, i| {
        let (p, q) = (points[i], points[(i + 1) % n]);
        acc + Vector3::new(
            (p.y - q.y) * (p.z + q.z),
            (p.z - q.z) * (p.x + q.x),
            (p.x - q.x) * (p.y + q.y),
        )
    });
    normal.try_normalize(1e-10).unwrap_or_else(Vector3::z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_convexity() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(is_convex(&square));
        let dart = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(4.0, 0.0),
            Point2::new(2.0, 3.0),
        ];
        assert!(!is_convex(&dart));
    }

    #[test]
    fn test_triangulate_square() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];

        let indices = triangulate_polygon(&points).unwrap();
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn test_triangulate_l_shape() {
        // Concave outline, goes through earcutr
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 4.0),
            Point2::new(0.0, 4.0),
        ];

        let indices = triangulate_polygon(&points).unwrap();
        assert_eq!(indices.len(), 4 * 3);

        let area: f64 = indices
            .chunks(3)
            .map(|t| polygon_signed_area(&[points[t[0]], points[t[1]], points[t[2]]]).abs())
            .sum();
        assert_relative_eq!(area, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_triangulate_insufficient_points() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(triangulate_polygon(&points).is_err());
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 3.0),
            Point2::new(0.0, 3.0),
        ];
        assert_relative_eq!(polygon_signed_area(&ccw), 6.0);

        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert_relative_eq!(polygon_signed_area(&cw), -6.0);
    }

    #[test]
    fn test_calculate_polygon_normal() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];

        let normal = calculate_polygon_normal(&points);
        assert!((normal.z.abs() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_project_to_2d() {
        let points = vec![
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(1.0, 0.0, 5.0),
            Point3::new(1.0, 1.0, 5.0),
            Point3::new(0.0, 1.0, 5.0),
        ];

        let normal = Vector3::new(0.0, 0.0, 1.0);
        let (projected, _, _, _) = project_to_2d(&points, &normal);

        assert_eq!(projected.len(), 4);
        assert_relative_eq!(polygon_signed_area(&projected).abs(), 1.0, epsilon = 1e-12);
    }
}
