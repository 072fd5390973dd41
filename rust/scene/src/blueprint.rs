// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blueprint document model
//!
//! The document is JSON with camelCase keys. Plan points are `[x, z]`
//! pairs in meters.
//!
//! ```json
//! {
//!   "wallHeight": 3.0,
//!   "rooms": [{
//!     "floor": [[0, 0], [5, 0], [5, 4], [0, 4]],
//!     "walls": [{
//!       "from": [0, 0], "to": [5, 0], "thickness": 0.2,
//!       "openings": [{ "type": "door", "width": 1, "height": 2, "offset": 2 }]
//!     }]
//!   }]
//! }
//! ```

use crate::error::{Error, Result};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A plan point `[x, z]`
pub type PlanPoint = [f64; 2];

#[inline]
pub fn to_point(p: &PlanPoint) -> Point2<f64> {
    Point2::new(p[0], p[1])
}

/// Top-level blueprint document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    /// Default height for walls that do not set their own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_height: Option<f64>,
    /// Default thickness for walls that do not set their own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_thickness: Option<f64>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Floor outline, implicitly closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<Vec<PlanPoint>>,
    #[serde(default)]
    pub walls: Vec<Wall>,
    /// Applied to every wall of the room that has no `openings` key
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub openings: Vec<Opening>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub from: PlanPoint,
    pub to: PlanPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    /// Present (even empty) means room-level openings are ignored for this wall
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openings: Option<Vec<Opening>>,
}

impl Wall {
    pub fn new(from: PlanPoint, to: PlanPoint) -> Self {
        Self {
            from,
            to,
            height: None,
            thickness: None,
            openings: None,
        }
    }

    /// Openings that apply to this wall given its room's defaults
    pub fn effective_openings<'a>(&'a self, room: &'a Room) -> &'a [Opening] {
        match &self.openings {
            Some(own) => own,
            None => &room.openings,
        }
    }
}

/// Door or window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Door,
    Window,
}

impl OpeningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpeningKind::Door => "door",
            OpeningKind::Window => "window",
        }
    }
}

/// Side of the opening the door hinges on, seen looking along the wall
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HingeSide {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opening {
    #[serde(rename = "type")]
    pub kind: OpeningKind,
    pub width: f64,
    pub height: f64,
    /// Absolute plan position; wins over `offset` when both are set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<PlanPoint>,
    /// Distance from the wall's `from` point to the opening center
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sill: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hinge: Option<HingeSide>,
}

impl Opening {
    pub fn door(width: f64, height: f64, offset: f64) -> Self {
        Self {
            kind: OpeningKind::Door,
            width,
            height,
            at: None,
            offset: Some(offset),
            sill: None,
            hinge: None,
        }
    }

    pub fn window(width: f64, height: f64, offset: f64) -> Self {
        Self {
            kind: OpeningKind::Window,
            ..Self::door(width, height, offset)
        }
    }
}

impl Blueprint {
    /// Decode a blueprint from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::BlueprintLoad(e.to_string()))
    }

    /// Read and decode a blueprint file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::BlueprintLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Total number of walls across all rooms
    pub fn wall_count(&self) -> usize {
        self.rooms.iter().map(|r| r.walls.len()).sum()
    }
}
