// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement helpers shared by solids, cavities and scene nodes
//!
//! Every generated element is a rigid placement: a rotation about the
//! vertical axis followed by a translation. Keeping them as `Isometry3`
//! lets the boolean cutter move cavities into a wall's local frame and
//! back without accumulating scale or shear.

use crate::mesh::Mesh;
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

/// Rotation about +Y by `angle` radians (right-handed)
#[inline]
pub fn rotation_about_y(angle: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle)
}

/// Placement that rotates about +Y and then moves the origin to `center`
#[inline]
pub fn placement(center: Point3<f64>, angle: f64) -> Isometry3<f64> {
    Isometry3::from_parts(Translation3::from(center.coords), rotation_about_y(angle))
}

/// Apply a rigid transform to every vertex and normal of a mesh
pub fn transform_mesh(mesh: &Mesh, transform: &Isometry3<f64>) -> Mesh {
    let mut out = Mesh::with_capacity(mesh.vertex_count(), mesh.indices.len());

    for (p, n) in mesh.positions.chunks_exact(3).zip(mesh.normals.chunks_exact(3)) {
        let position = transform * Point3::new(p[0] as f64, p[1] as f64, p[2] as f64);
        let normal = transform * Vector3::new(n[0] as f64, n[1] as f64, n[2] as f64);
        out.add_vertex(position, normal);
    }
    out.indices.extend_from_slice(&mesh.indices);

    out
}
