// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rays for picking

use nalgebra::{Isometry3, Point3, Vector3};

/// A ray with origin and normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray through two points, or `None` if they coincide
    pub fn through(from: Point3<f64>, to: Point3<f64>) -> Option<Self> {
        let direction = (to - from).try_normalize(1e-12)?;
        Some(Self { origin: from, direction })
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// Express the ray in the frame whose placement is `frame`
    ///
    /// Distances along the ray are preserved because the transform is rigid.
    #[inline]
    pub fn to_local(&self, frame: &Isometry3<f64>) -> Ray {
        Ray {
            origin: frame.inverse_transform_point(&self.origin),
            direction: frame.inverse_transform_vector(&self.direction),
        }
    }
}

/// Möller–Trumbore ray-triangle intersection
///
/// Returns the distance along the ray for hits strictly in front of the origin.
pub fn intersect_triangle(
    ray: &Ray,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < 1e-12 {
        return None; // ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > 1e-12).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::placement;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn unit_triangle() -> (Point3<f64>, Point3<f64>, Point3<f64>) {
        (
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn hit_in_front() {
        let (a, b, c) = unit_triangle();
        let ray = Ray::new(Point3::new(0.25, 0.25, 2.0), Vector3::new(0.0, 0.0, -3.0));
        assert_relative_eq!(intersect_triangle(&ray, &a, &b, &c).unwrap(), 2.0);
    }

    #[test]
    fn miss_behind_origin() {
        let (a, b, c) = unit_triangle();
        let ray = Ray::new(Point3::new(0.25, 0.25, 2.0), Vector3::z());
        assert!(intersect_triangle(&ray, &a, &b, &c).is_none());
    }

    #[test]
    fn miss_outside_and_parallel() {
        let (a, b, c) = unit_triangle();
        let outside = Ray::new(Point3::new(0.8, 0.8, 1.0), -Vector3::z());
        assert!(intersect_triangle(&outside, &a, &b, &c).is_none());

        let parallel = Ray::new(Point3::new(-1.0, 0.2, 0.0), Vector3::x());
        assert!(intersect_triangle(&parallel, &a, &b, &c).is_none());
    }

    #[test]
    fn local_frame_preserves_distance() {
        let frame = placement(Point3::new(4.0, 1.0, -2.0), FRAC_PI_2);
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), Vector3::new(1.0, 0.0, -1.0));
        let local = ray.to_local(&frame);

        let world_point = ray.at(3.0);
        let local_point = frame.inverse_transform_point(&world_point);
        assert_relative_eq!(local.at(3.0), local_point, epsilon = 1e-12);
    }

    #[test]
    fn through_rejects_coincident_points() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!(Ray::through(p, p).is_none());
        let r = Ray::through(p, Point3::new(1.0, 2.0, 5.0)).unwrap();
        assert_relative_eq!(r.direction, Vector3::z());
    }
}
