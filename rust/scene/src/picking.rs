// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pointer picking
//!
//! Unprojects a normalized device coordinate into a world ray, tests it
//! against registered interactive nodes and their descendants, and resolves
//! the nearest hit to its interactive owner.

use crate::keys::{Interactive, NodeKey};
use crate::scene::SceneContext;
use blueprint_lite_geometry::{Isometry3, Point3, Ray, Vector3};
use nalgebra::Perspective3;

/// Perspective camera looking from `eye` toward `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    /// Vertical field of view in radians
    pub fovy: f64,
    /// Width over height
    pub aspect: f64,
    pub znear: f64,
    pub zfar: f64,
}

impl Camera {
    pub fn look_at(eye: Point3<f64>, target: Point3<f64>) -> Self {
        Self {
            eye,
            target,
            up: Vector3::y(),
            fovy: std::f64::consts::FRAC_PI_4,
            aspect: 1.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    /// World-to-view transform
    pub fn view(&self) -> Isometry3<f64> {
        Isometry3::look_at_rh(&self.eye, &self.target, &self.up)
    }

    /// World ray through an NDC point, `None` outside [-1, 1] or for a
    /// degenerate camera
    pub fn ray_from_ndc(&self, ndc: [f64; 2]) -> Option<Ray> {
        let [x, y] = ndc;
        if !(x.is_finite() && y.is_finite()) || x.abs() > 1.0 || y.abs() > 1.0 {
            return None;
        }
        let valid = self.aspect.is_finite()
            && self.aspect > 0.0
            && self.fovy > 0.0
            && self.fovy < std::f64::consts::PI
            && self.znear > 0.0
            && self.zfar > self.znear
            && (self.target - self.eye).cross(&self.up).norm() > 1e-12;
        if !valid {
            return None;
        }

        let projection = Perspective3::new(self.aspect, self.fovy, self.znear, self.zfar);
        let view_to_world = self.view().inverse();
        let near = view_to_world * projection.unproject_point(&Point3::new(x, y, -1.0));
        let far = view_to_world * projection.unproject_point(&Point3::new(x, y, 1.0));
        Ray::through(near, far)
    }
}

/// Nearest hit resolved to its interactive owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Node whose geometry was hit
    pub node: NodeKey,
    pub distance: f64,
    pub point: Point3<f64>,
    pub target: Interactive,
}

/// Nearest hit among registered nodes and their descendants
///
/// Returns `None` for a miss, or when the nearest hit has no registered
/// ancestor.
pub fn pick(scene: &SceneContext, ray: &Ray) -> Option<PickHit> {
    let mut nearest: Option<(NodeKey, f64)> = None;

    for &root in scene.registry().roots() {
        let Ok(world) = scene.world_transform(root) else {
            continue;
        };
        let mut stack = vec![(root, world)];
        while let Some((key, world)) = stack.pop() {
            let Some(node) = scene.node(key) else {
                continue;
            };
            if let Some(mesh) = &node.mesh {
                if let Some(t) = mesh.raycast(&ray.to_local(&world)) {
                    if nearest.map_or(true, |(_, best)| t < best) {
                        nearest = Some((key, t));
                    }
                }
            }
            for &child in &node.children {
                if let Some(c) = scene.node(child) {
                    stack.push((child, world * c.local));
                }
            }
        }
    }

    let (node, distance) = nearest?;
    let target = scene.resolve_target(node)?;
    Some(PickHit {
        node,
        distance,
        point: ray.at(distance),
        target,
    })
}
