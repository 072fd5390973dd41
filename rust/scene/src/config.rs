// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synthesis configuration.
//!
//! Precedence for wall dimensions: wall-level values, then blueprint-level
//! defaults, then this config.

use crate::door::DoorEasing;
use serde::{Deserialize, Serialize};

/// What to do when two openings on one wall overlap along the wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningOverlapPolicy {
    /// Skip the later opening with `InvalidOpening`.
    #[default]
    Reject,
    /// Log a warning and cut both.
    Warn,
}

impl std::str::FromStr for OpeningOverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "warn" => Ok(Self::Warn),
            other => Err(format!("unknown overlap policy: {}", other)),
        }
    }
}

/// Synthesis configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthesisConfig {
    /// Wall height when neither wall nor blueprint sets one.
    pub wall_height: f64,
    /// Wall thickness when neither wall nor blueprint sets one.
    pub wall_thickness: f64,
    /// Sill height for windows without an explicit `sill`.
    pub window_sill: f64,
    /// Extra cavity depth beyond the wall thickness.
    pub cavity_margin: f64,
    /// Door panel depth, clamped to half the wall thickness.
    pub door_panel_depth: f64,
    /// Window pane depth.
    pub window_pane_depth: f64,
    /// Floor slab thickness below y = 0.
    pub floor_thickness: f64,
    /// Fraction of the remaining angle covered per reference tick.
    pub door_ease_factor: f64,
    /// Reference tick rate for the ease factor, in Hz.
    pub tick_rate: f64,
    /// Angular tolerance for "fully open" / "fully closed", in radians.
    pub open_tolerance: f64,
    pub overlap_policy: OpeningOverlapPolicy,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            wall_height: 3.0,
            wall_thickness: 0.2,
            window_sill: 1.0,
            cavity_margin: 0.02,
            door_panel_depth: 0.05,
            window_pane_depth: 0.02,
            floor_thickness: 0.05,
            door_ease_factor: 0.18,
            tick_rate: 60.0,
            open_tolerance: 1e-3,
            overlap_policy: OpeningOverlapPolicy::Reject,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl SynthesisConfig {
    /// Defaults overridden by `BLUEPRINT_*` environment variables.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            wall_height: env_or("BLUEPRINT_WALL_HEIGHT", d.wall_height),
            wall_thickness: env_or("BLUEPRINT_WALL_THICKNESS", d.wall_thickness),
            window_sill: env_or("BLUEPRINT_WINDOW_SILL", d.window_sill),
            cavity_margin: env_or("BLUEPRINT_CAVITY_MARGIN", d.cavity_margin),
            door_panel_depth: env_or("BLUEPRINT_DOOR_PANEL_DEPTH", d.door_panel_depth),
            window_pane_depth: env_or("BLUEPRINT_WINDOW_PANE_DEPTH", d.window_pane_depth),
            floor_thickness: env_or("BLUEPRINT_FLOOR_THICKNESS", d.floor_thickness),
            door_ease_factor: env_or("BLUEPRINT_DOOR_EASE", d.door_ease_factor),
            tick_rate: env_or("BLUEPRINT_TICK_RATE", d.tick_rate),
            open_tolerance: env_or("BLUEPRINT_OPEN_TOLERANCE", d.open_tolerance),
            overlap_policy: env_or("BLUEPRINT_OVERLAP_POLICY", d.overlap_policy),
        }
    }

    /// Easing parameters for door pivots.
    ///
    /// Out-of-range factors fall back to the default so interpolation always
    /// converges.
    pub fn door_easing(&self) -> DoorEasing {
        let mut easing = DoorEasing::default();
        if self.door_ease_factor > 0.0 && self.door_ease_factor < 1.0 {
            easing.factor_per_tick = self.door_ease_factor;
        }
        if self.tick_rate.is_finite() && self.tick_rate > 0.0 {
            easing.tick_rate = self.tick_rate;
        }
        easing
    }
}
