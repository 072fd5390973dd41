// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placed solids
//!
//! A [`Solid`] keeps its geometry in a local frame together with the rigid
//! placement that puts it in the world. Boxes are centered on their local
//! origin with length along X, height along Y and thickness along Z, so a
//! wall placed with [`segment_angle`](crate::segment::segment_angle) runs
//! along its plan segment.

use crate::csg::{add_triangle_to_mesh, Triangle};
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::segment::plan_to_world;
use crate::transform::{placement, transform_mesh};
use crate::triangulation::{polygon_signed_area, triangulate_polygon};
use nalgebra::{Isometry3, Point2, Point3, Vector3};

/// Extents of a box solid in its local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDimensions {
    /// Along local X (the wall direction)
    pub length: f64,
    /// Along local Y (vertical)
    pub height: f64,
    /// Along local Z (through the wall)
    pub thickness: f64,
}

impl BoxDimensions {
    pub fn new(length: f64, height: f64, thickness: f64) -> Self {
        Self { length, height, thickness }
    }

    #[inline]
    pub fn half_extents(&self) -> Vector3<f64> {
        Vector3::new(self.length, self.height, self.thickness) * 0.5
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.length * self.height * self.thickness
    }

    fn validate(&self) -> Result<()> {
        let values = [self.length, self.height, self.thickness];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(Error::geometry(format!(
                "box dimensions must be finite and non-negative, got {:?}",
                values
            )));
        }
        Ok(())
    }
}

/// Geometry in a local frame plus the placement that positions it
#[derive(Debug, Clone)]
pub struct Solid {
    mesh: Mesh,
    placement: Isometry3<f64>,
}

impl Solid {
    /// Wrap a local-frame mesh with its placement
    pub fn from_mesh(mesh: Mesh, placement: Isometry3<f64>) -> Self {
        Self { mesh, placement }
    }

    /// Box of the given size, centered at `center`, rotated about +Y by `angle`
    ///
    /// Zero-sized boxes are allowed here; callers decide whether a flat box
    /// is acceptable.
    pub fn new_box(center: Point3<f64>, dims: BoxDimensions, angle: f64) -> Result<Self> {
        dims.validate()?;
        if !angle.is_finite() || !center.coords.iter().all(|c| c.is_finite()) {
            return Err(Error::geometry("box placement must be finite"));
        }

        let half = dims.half_extents();
        let mesh = box_mesh(Point3::from(-half), Point3::from(half));
        Ok(Self::from_mesh(mesh, placement(center, angle)))
    }

    /// Prism over a plan outline, spanning `[top - thickness, top]` vertically
    pub fn slab(outline: &[Point2<f64>], top: f64, thickness: f64) -> Result<Self> {
        if outline.len() < 3 {
            return Err(Error::geometry(format!(
                "floor outline needs at least 3 points, got {}",
                outline.len()
            )));
        }
        if !(thickness.is_finite() && thickness > 0.0) {
            return Err(Error::geometry(format!("slab thickness must be positive, got {}", thickness)));
        }

        // Counter-clockwise in plan keeps the side normals pointing outward
        let mut ring: Vec<Point2<f64>> = outline.to_vec();
        let area = polygon_signed_area(&ring);
        if area.abs() < 1e-12 {
            return Err(Error::geometry("floor outline has zero area"));
        }
        if area < 0.0 {
            ring.reverse();
        }

        let indices = triangulate_polygon(&ring)?;
        let bottom = top - thickness;
        let mut mesh = Mesh::with_capacity(indices.len() * 2 + ring.len() * 6, indices.len() * 2 + ring.len() * 6);

        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [ring[tri[0]], ring[tri[1]], ring[tri[2]]];
            push_oriented(
                &mut mesh,
                Triangle::new(plan_to_world(&a, top), plan_to_world(&b, top), plan_to_world(&c, top)),
                &Vector3::y(),
            );
            push_oriented(
                &mut mesh,
                Triangle::new(plan_to_world(&a, bottom), plan_to_world(&b, bottom), plan_to_world(&c, bottom)),
                &-Vector3::y(),
            );
        }

        let n = ring.len();
        for i in 0..n {
            let p = ring[i];
            let q = ring[(i + 1) % n];
            let edge = q - p;
            // outward for a counter-clockwise ring in (x, z)
            let outward = Vector3::new(edge.y, 0.0, -edge.x);
            let (p0, q0) = (plan_to_world(&p, bottom), plan_to_world(&q, bottom));
            let (p1, q1) = (plan_to_world(&p, top), plan_to_world(&q, top));
            push_oriented(&mut mesh, Triangle::new(p0, q0, q1), &outward);
            push_oriented(&mut mesh, Triangle::new(p0, q1, p1), &outward);
        }

        Ok(Self::from_mesh(mesh, Isometry3::identity()))
    }

    /// Geometry in the solid's local frame
    #[inline]
    pub fn local_mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn placement(&self) -> &Isometry3<f64> {
        &self.placement
    }

    /// Geometry with the placement applied
    pub fn world_mesh(&self) -> Mesh {
        transform_mesh(&self.mesh, &self.placement)
    }

    /// Enclosed volume (placement does not change it)
    #[inline]
    pub fn volume(&self) -> f64 {
        self.mesh.signed_volume()
    }

    /// World-space axis-aligned bounds
    pub fn world_bounds(&self) -> (Point3<f64>, Point3<f64>) {
        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);
        if self.mesh.is_empty() {
            let origin = Point3::from(self.placement.translation.vector);
            return (origin, origin);
        }
        for i in 0..self.mesh.vertex_count() {
            let p = self.placement * self.mesh.vertex(i);
            min = min.inf(&p);
            max = max.sup(&p);
        }
        (min, max)
    }

    /// Copy of this solid expressed relative to `frame`
    pub fn relative_to(&self, frame: &Isometry3<f64>) -> Mesh {
        transform_mesh(&self.mesh, &(frame.inverse() * self.placement))
    }
}

/// Create a box mesh from AABB min/max bounds
/// Returns a mesh with 12 triangles (2 per face, 6 faces)
pub fn box_mesh(min: Point3<f64>, max: Point3<f64>) -> Mesh {
    let mut mesh = Mesh::with_capacity(36, 36);

    let v0 = Point3::new(min.x, min.y, min.z); // 0: front-bottom-left
    let v1 = Point3::new(max.x, min.y, min.z); // 1: front-bottom-right
    let v2 = Point3::new(max.x, max.y, min.z); // 2: front-top-right
    let v3 = Point3::new(min.x, max.y, min.z); // 3: front-top-left
    let v4 = Point3::new(min.x, min.y, max.z); // 4: back-bottom-left
    let v5 = Point3::new(max.x, min.y, max.z); // 5: back-bottom-right
    let v6 = Point3::new(max.x, max.y, max.z); // 6: back-top-right
    let v7 = Point3::new(min.x, max.y, max.z); // 7: back-top-left

    // Counter-clockwise winding when viewed from outside
    // Front face (z = min.z)
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v2, v1));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v3, v2));

    // Back face (z = max.z)
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v4, v5, v6));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v4, v6, v7));

    // Left face (x = min.x)
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v4, v7));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v7, v3));

    // Right face (x = max.x)
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v1, v2, v6));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v1, v6, v5));

    // Bottom face (y = min.y)
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v1, v5));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v5, v4));

    // Top face (y = max.y)
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v3, v7, v6));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v3, v6, v2));

    mesh
}

/// Add a triangle, flipping its winding so the face normal agrees with `outward`
fn push_oriented(mesh: &mut Mesh, triangle: Triangle, outward: &Vector3<f64>) {
    let facing = (triangle.v1 - triangle.v0).cross(&(triangle.v2 - triangle.v0));
    if facing.dot(outward) < 0.0 {
        add_triangle_to_mesh(mesh, &Triangle::new(triangle.v0, triangle.v2, triangle.v1));
    } else {
        add_triangle_to_mesh(mesh, &triangle);
    }
}
