// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blueprint-Lite Geometry
//!
//! Parametric wall geometry: plan segment math, placed box solids, CSG
//! subtraction of door/window cavities (csgrs), earcutr triangulation for
//! floor outlines, and ray hit tests for picking. Math types come from
//! nalgebra; the world frame is Y-up.

pub mod csg;
pub mod error;
pub mod mesh;
pub mod ray;
pub mod segment;
pub mod solid;
pub mod transform;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Point2, Point3, Vector2, Vector3};

pub use csg::{BooleanCutter, Triangle};
pub use error::{Error, Result};
pub use mesh::Mesh;
pub use ray::{intersect_triangle, Ray};
pub use segment::{
    perpendicular_offset, plan_to_world, point_along_wall, project_onto_segment, segment_angle,
    segment_direction, segment_length, segment_midpoint,
};
pub use solid::{box_mesh, BoxDimensions, Solid};
pub use transform::{placement, rotation_about_y, transform_mesh};
pub use triangulation::triangulate_polygon;
