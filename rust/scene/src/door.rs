// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door kinematics: hinge placement, open/closed state and easing.
//!
//! A door is a pivot node at the hinge with the panel as its only child.
//! The pivot rotates about +Y; at `closed_angle` (the wall's own rotation)
//! the panel fills the cavity exactly.

use crate::blueprint::HingeSide;
use crate::keys::NodeKey;
use blueprint_lite_geometry::{
    placement, plan_to_world, segment_angle, segment_direction, Isometry3, Point2, Point3,
    Result, Vector3,
};
use std::f64::consts::FRAC_PI_2;

/// Angular state of one door pivot, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotState {
    pub closed_angle: f64,
    pub open_angle: f64,
    pub target_angle: f64,
    pub current_angle: f64,
    pub is_open: bool,
}

impl PivotState {
    /// A closed door. Left hinges swing +90°, right hinges -90°.
    pub fn closed(closed_angle: f64, hinge: HingeSide) -> Self {
        let swing = match hinge {
            HingeSide::Left => FRAC_PI_2,
            HingeSide::Right => -FRAC_PI_2,
        };
        Self {
            closed_angle,
            open_angle: closed_angle + swing,
            target_angle: closed_angle,
            current_angle: closed_angle,
            is_open: false,
        }
    }

    /// Flip `is_open` and retarget. The current angle is left where it is.
    pub fn toggled(self) -> Self {
        let is_open = !self.is_open;
        Self {
            is_open,
            target_angle: if is_open { self.open_angle } else { self.closed_angle },
            ..self
        }
    }

    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    pub fn is_fully_open(&self, tolerance: f64) -> bool {
        self.is_open && (self.current_angle - self.open_angle).abs() <= tolerance
    }

    pub fn is_fully_closed(&self, tolerance: f64) -> bool {
        !self.is_open && (self.current_angle - self.closed_angle).abs() <= tolerance
    }

    /// Remaining angular distance to the target.
    #[inline]
    pub fn remaining(&self) -> f64 {
        self.target_angle - self.current_angle
    }
}

/// Exponential easing toward the target angle.
///
/// At the reference rate each tick covers `factor_per_tick` of the remaining
/// distance; other `dt` values are scaled so the curve is frame-rate
/// independent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorEasing {
    pub factor_per_tick: f64,
    pub tick_rate: f64,
}

impl Default for DoorEasing {
    fn default() -> Self {
        Self {
            factor_per_tick: 0.18,
            tick_rate: 60.0,
        }
    }
}

impl DoorEasing {
    /// Fraction of the remaining distance covered in `dt` seconds, in [0, 1).
    pub fn fraction(&self, dt: f64) -> f64 {
        if !(dt.is_finite() && dt > 0.0) {
            return 0.0;
        }
        let f = 1.0 - (1.0 - self.factor_per_tick).powf(dt * self.tick_rate);
        f.clamp(0.0, 1.0 - f64::EPSILON)
    }

    pub fn advance(&self, state: PivotState, dt: f64) -> PivotState {
        let fraction = self.fraction(dt);
        PivotState {
            current_angle: state.current_angle + state.remaining() * fraction,
            ..state
        }
    }
}

/// Advance with the default easing.
pub fn advance(state: PivotState, dt: f64) -> PivotState {
    DoorEasing::default().advance(state, dt)
}

/// Where a door's pivot sits and how its panel hangs from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HingeLayout {
    /// World position of the hinge axis at the opening's vertical center.
    pub hinge_point: Point3<f64>,
    /// Panel center in the pivot's local frame.
    pub panel_offset: Vector3<f64>,
    pub hinge: HingeSide,
    pub state: PivotState,
}

impl HingeLayout {
    /// Layout for a door centered at `center` on the wall `from -> to`.
    pub fn new(
        from: &Point2<f64>,
        to: &Point2<f64>,
        center: &Point2<f64>,
        width: f64,
        sill: f64,
        height: f64,
        hinge: HingeSide,
    ) -> Result<Self> {
        let dir = segment_direction(from, to)?;
        let half = width / 2.0;
        let (hinge_plan, panel_x) = match hinge {
            HingeSide::Left => (*center - dir * half, half),
            HingeSide::Right => (*center + dir * half, -half),
        };
        let closed_angle = segment_angle(from, to);

        Ok(Self {
            hinge_point: plan_to_world(&hinge_plan, sill + height / 2.0),
            panel_offset: Vector3::new(panel_x, 0.0, 0.0),
            hinge,
            state: PivotState::closed(closed_angle, hinge),
        })
    }

    /// Pivot node transform for the given angle.
    pub fn pivot_transform(&self, angle: f64) -> Isometry3<f64> {
        placement(self.hinge_point, angle)
    }
}

/// A door registered in the scene.
#[derive(Debug, Clone)]
pub struct DoorPivot {
    /// Pivot node, rotated by the tick handler.
    pub node: NodeKey,
    /// Panel child of `node`.
    pub panel: NodeKey,
    pub hinge: HingeSide,
    pub hinge_point: Point3<f64>,
    /// Inverse world transform of the pivot node's parent
    pub parent_inverse: Isometry3<f64>,
    pub state: PivotState,
}

impl DoorPivot {
    /// Pivot transform in world space
    pub fn transform(&self) -> Isometry3<f64> {
        placement(self.hinge_point, self.state.current_angle)
    }

    /// Pivot transform relative to its parent node
    pub fn local_transform(&self) -> Isometry3<f64> {
        self.parent_inverse * self.transform()
    }
}
