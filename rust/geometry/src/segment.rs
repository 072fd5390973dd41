// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan-view segment math
//!
//! Blueprint points live in the horizontal plane and are stored as
//! `Point2 { x, y }` where `y` is the world Z coordinate. The world frame is
//! Y-up, so a plan point `(x, z)` sits at `(x, elevation, z)` in 3D.
//!
//! # Rotation convention
//!
//! [`segment_angle`] is the right-handed rotation about +Y that carries the
//! local +X axis onto the segment direction. For a direction `(dx, dz)` that
//! is `atan2(-dz, dx)`. Walls, cavities, door pivots and window panes all
//! consume this value unchanged.

use crate::error::{Error, Result};
use nalgebra::{Point2, Point3, Vector2};

/// Segments shorter than this are treated as zero-length
pub const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Euclidean length of a plan segment
#[inline]
pub fn segment_length(from: &Point2<f64>, to: &Point2<f64>) -> f64 {
    (to - from).norm()
}

/// Rotation about the vertical axis for a directed segment (radians)
#[inline]
pub fn segment_angle(from: &Point2<f64>, to: &Point2<f64>) -> f64 {
    let d = to - from;
    (-d.y).atan2(d.x)
}

/// Unit direction from `from` toward `to`
pub fn segment_direction(from: &Point2<f64>, to: &Point2<f64>) -> Result<Vector2<f64>> {
    let d = to - from;
    let length = d.norm();
    if !length.is_finite() || length < MIN_SEGMENT_LENGTH {
        return Err(Error::geometry(format!(
            "zero-length segment ({:.3}, {:.3}) -> ({:.3}, {:.3})",
            from.x, from.y, to.x, to.y
        )));
    }
    Ok(d / length)
}

/// Point at arc-length `offset` from `from` toward `to`
///
/// Offsets outside `[0, length]` extrapolate along the same line.
pub fn point_along_wall(from: &Point2<f64>, to: &Point2<f64>, offset: f64) -> Result<Point2<f64>> {
    if !offset.is_finite() {
        return Err(Error::geometry(format!("non-finite wall offset {}", offset)));
    }
    let dir = segment_direction(from, to)?;
    Ok(from + dir * offset)
}

/// Offset vector perpendicular to the segment
///
/// Positive distances point toward the wall's local +Z face, i.e. the
/// direction rotated by -90 degrees in plan: `(-dz, dx)`.
pub fn perpendicular_offset(from: &Point2<f64>, to: &Point2<f64>, distance: f64) -> Result<Vector2<f64>> {
    let dir = segment_direction(from, to)?;
    Ok(Vector2::new(-dir.y, dir.x) * distance)
}

/// Arc-length coordinate of the orthogonal projection of `point` onto the segment line
pub fn project_onto_segment(from: &Point2<f64>, to: &Point2<f64>, point: &Point2<f64>) -> Result<f64> {
    let dir = segment_direction(from, to)?;
    Ok((point - from).dot(&dir))
}

/// Midpoint of a plan segment
#[inline]
pub fn segment_midpoint(from: &Point2<f64>, to: &Point2<f64>) -> Point2<f64> {
    Point2::new((from.x + to.x) * 0.5, (from.y + to.y) * 0.5)
}

/// Lift a plan point into the Y-up world frame
#[inline]
pub fn plan_to_world(point: &Point2<f64>, elevation: f64) -> Point3<f64> {
    Point3::new(point.x, elevation, point.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn angular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn length_is_symmetric() {
        let a = Point2::new(1.0, -2.0);
        let b = Point2::new(4.0, 2.0);
        assert_relative_eq!(segment_length(&a, &b), 5.0);
        assert_relative_eq!(segment_length(&a, &b), segment_length(&b, &a));
    }

    #[test]
    fn angle_reverses_by_half_turn() {
        let cases = [
            (Point2::new(0.0, 0.0), Point2::new(5.0, 0.0)),
            (Point2::new(1.0, 1.0), Point2::new(-3.0, 4.0)),
            (Point2::new(-2.0, 7.5), Point2::new(-2.0, -1.0)),
        ];
        for (a, b) in cases {
            let forward = segment_angle(&a, &b);
            let backward = segment_angle(&b, &a);
            assert!(angular_distance(forward, backward + PI) < 1e-12);
        }
    }

    #[test]
    fn angle_convention_is_y_up_right_handed() {
        let origin = Point2::new(0.0, 0.0);
        assert_relative_eq!(segment_angle(&origin, &Point2::new(5.0, 0.0)), 0.0);
        // +Z in plan is a -90 degree turn about +Y
        assert_relative_eq!(segment_angle(&origin, &Point2::new(0.0, 3.0)), -FRAC_PI_2);
        assert_relative_eq!(segment_angle(&origin, &Point2::new(0.0, -3.0)), FRAC_PI_2);
    }

    #[test]
    fn point_along_wall_endpoints() {
        let from = Point2::new(1.0, 2.0);
        let to = Point2::new(4.0, 6.0);
        let length = segment_length(&from, &to);

        let start = point_along_wall(&from, &to, 0.0).unwrap();
        assert_relative_eq!(start, from);

        let end = point_along_wall(&from, &to, length).unwrap();
        assert_relative_eq!(end, to, epsilon = 1e-12);
    }

    #[test]
    fn point_along_wall_stays_on_segment() {
        let from = Point2::new(-1.0, 0.5);
        let to = Point2::new(3.0, -2.5);
        let length = segment_length(&from, &to);

        for i in 0..=10 {
            let offset = length * i as f64 / 10.0;
            let p = point_along_wall(&from, &to, offset).unwrap();
            // collinear with the segment and within its extent
            let cross = (to - from).perp(&(p - from));
            assert!(cross.abs() < 1e-9);
            assert_relative_eq!(segment_length(&from, &p), offset, epsilon = 1e-9);
            assert_relative_eq!(segment_length(&p, &to), length - offset, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_length_segment_is_rejected() {
        let p = Point2::new(2.0, 2.0);
        assert!(matches!(
            point_along_wall(&p, &p, 1.0),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(segment_direction(&p, &p).is_err());
    }

    #[test]
    fn perpendicular_matches_local_z_axis() {
        let from = Point2::new(0.0, 0.0);
        let to = Point2::new(5.0, 0.0);
        let n = perpendicular_offset(&from, &to, 0.1).unwrap();
        assert_relative_eq!(n, Vector2::new(0.0, 0.1));
    }

    #[test]
    fn projection_recovers_offset() {
        let from = Point2::new(0.0, 0.0);
        let to = Point2::new(0.0, 4.0);
        let p = Point2::new(0.3, 2.5);
        assert_relative_eq!(project_onto_segment(&from, &to, &p).unwrap(), 2.5);
    }
}
