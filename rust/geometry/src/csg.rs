// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSG (Constructive Solid Geometry) Operations
//!
//! Subtracts opening cavities from wall solids. All boolean work happens in
//! the wall's local frame: cavities are brought into that frame, cut with
//! csgrs, and the wall's original placement is reattached to the result so
//! it renders exactly where the uncut wall did.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::solid::Solid;
use crate::triangulation::{calculate_polygon_normal, project_to_2d, triangulate_polygon};
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

/// Triangle definition
#[derive(Debug, Clone)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculate triangle normal
    pub fn normal(&self) -> Vector3<f64> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }
}

/// Cuts opening cavities out of wall solids
#[derive(Debug, Clone, Copy)]
pub struct BooleanCutter {
    /// Volume below which a cavity counts as degenerate, and slack for the
    /// bounds overlap test
    pub epsilon: f64,
}

impl BooleanCutter {
    pub fn new() -> Self {
        Self { epsilon: 1e-9 }
    }

    /// Reject cavities that enclose no volume
    pub fn check_cavity(&self, cavity: &Solid) -> Result<()> {
        let volume = cavity.volume();
        if !volume.is_finite() || volume.abs() <= self.epsilon {
            return Err(Error::opening(format!(
                "degenerate cavity with volume {:.3e}",
                volume
            )));
        }
        Ok(())
    }

    /// Subtract every cavity from `wall`, returning one solid with the wall's placement
    ///
    /// Cavities entirely outside the wall are skipped. Any degenerate cavity
    /// fails the whole call before cutting starts.
    pub fn cut(&self, wall: &Solid, cavities: &[Solid]) -> Result<Solid> {
        for cavity in cavities {
            self.check_cavity(cavity)?;
        }

        let (wall_min, wall_max) = wall.local_mesh().bounds();
        let wall_min = wall_min.cast::<f64>();
        let wall_max = wall_max.cast::<f64>();

        let local_cavities: SmallVec<[Mesh; 4]> = cavities
            .iter()
            .map(|cavity| cavity.relative_to(wall.placement()))
            .filter(|local| {
                let (min, max) = local.bounds();
                let overlaps = (0..3).all(|axis| {
                    (min[axis] as f64) < wall_max[axis] - self.epsilon
                        && (max[axis] as f64) > wall_min[axis] + self.epsilon
                });
                if !overlaps {
                    tracing::warn!("cavity lies outside wall bounds, skipping");
                }
                overlaps
            })
            .collect();

        // Fast path: nothing to remove
        if local_cavities.is_empty() {
            return Ok(wall.clone());
        }

        let mut host = Self::mesh_to_csgrs(wall.local_mesh());
        for cavity in &local_cavities {
            host = Self::difference(&host, &Self::mesh_to_csgrs(cavity));
        }

        let result = Self::csgrs_to_mesh(&host);
        if result.is_empty() {
            return Err(Error::EmptyMesh(
                "cavities removed the entire wall".to_string(),
            ));
        }

        Ok(Solid::from_mesh(result, *wall.placement()))
    }

    fn difference(host: &csgrs::mesh::Mesh<()>, opening: &csgrs::mesh::Mesh<()>) -> csgrs::mesh::Mesh<()> {
        use csgrs::traits::CSG;
        host.difference(opening)
    }

    /// Convert our Mesh format to csgrs Mesh format
    fn mesh_to_csgrs(mesh: &Mesh) -> csgrs::mesh::Mesh<()> {
        use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CSGMesh};
        use std::sync::OnceLock;

        if mesh.is_empty() {
            return CSGMesh {
                polygons: Vec::new(),
                bounding_box: OnceLock::new(),
                metadata: None,
            };
        }

        let mut polygons = Vec::with_capacity(mesh.triangle_count());

        for triangle in mesh.triangles() {
            // Degenerate triangles would propagate NaN normals
            let face_normal = match (triangle.v1 - triangle.v0)
                .cross(&(triangle.v2 - triangle.v0))
                .try_normalize(1e-10)
            {
                Some(n) => n,
                None => continue,
            };

            let vertices = vec![
                Vertex::new(triangle.v0, face_normal),
                Vertex::new(triangle.v1, face_normal),
                Vertex::new(triangle.v2, face_normal),
            ];

            polygons.push(Polygon::new(vertices, None));
        }

        CSGMesh::from_polygons(&polygons, None)
    }

    /// Convert csgrs Mesh format back to our Mesh format
    fn csgrs_to_mesh(csg_mesh: &csgrs::mesh::Mesh<()>) -> Mesh {
        let mut mesh = Mesh::new();

        for polygon in &csg_mesh.polygons {
            let vertices = &polygon.vertices;
            if vertices.len() < 3 {
                continue;
            }

            let points_3d: Vec<Point3<f64>> = vertices
                .iter()
                .map(|v| Point3::new(v.pos[0], v.pos[1], v.pos[2]))
                .collect();

            let raw_normal = Vector3::new(
                vertices[0].normal[0],
                vertices[0].normal[1],
                vertices[0].normal[2],
            );

            let csg_normal = match raw_normal.try_normalize(1e-10) {
                Some(n) if n.iter().all(|c| c.is_finite()) => n,
                _ => match calculate_polygon_normal(&points_3d).try_normalize(1e-10) {
                    Some(n) => n,
                    None => continue,
                },
            };

            let base_idx = mesh.vertex_count() as u32;
            for p in &points_3d {
                mesh.add_vertex(*p, csg_normal);
            }

            if points_3d.len() == 3 {
                mesh.add_triangle(base_idx, base_idx + 1, base_idx + 2);
                continue;
            }

            // Projection along the CSG normal preserves the winding intent
            let (points_2d, _, _, _) = project_to_2d(&points_3d, &csg_normal);
            let indices = match triangulate_polygon(&points_2d) {
                Ok(idx) => idx,
                Err(_) => {
                    // Drop the vertices we just pushed for this polygon
                    let keep = base_idx as usize * 3;
                    mesh.positions.truncate(keep);
                    mesh.normals.truncate(keep);
                    continue;
                }
            };

            for tri in indices.chunks_exact(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]];
                // earcut may emit either winding; keep faces outward
                let winding = (points_3d[b] - points_3d[a]).cross(&(points_3d[c] - points_3d[a]));
                let (b, c) = if winding.dot(&csg_normal) < 0.0 { (c, b) } else { (b, c) };
                mesh.add_triangle(base_idx + a as u32, base_idx + b as u32, base_idx + c as u32);
            }
        }

        mesh
    }
}

impl Default for BooleanCutter {
    fn default() -> Self {
        Self::new()
    }
}

/// Add a triangle to a mesh with its flat face normal
pub(crate) fn add_triangle_to_mesh(mesh: &mut Mesh, triangle: &Triangle) {
    let base_idx = mesh.vertex_count() as u32;

    let normal = triangle.normal();

    mesh.add_vertex(triangle.v0, normal);
    mesh.add_vertex(triangle.v1, normal);
    mesh.add_vertex(triangle.v2, normal);

    mesh.add_triangle(base_idx, base_idx + 1, base_idx + 2);
}
