// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blueprint-Lite Scene
//!
//! Turns a blueprint (rooms, walls, floors, doors and windows) into a scene
//! of wall solids with their openings cut out, hinged door pivots and
//! clickable window panes.
//!
//! ```no_run
//! use blueprint_lite_scene::{build_scene, Blueprint, Camera, Point3, SynthesisConfig};
//!
//! let blueprint = Blueprint::from_path("house.json").unwrap();
//! let (mut scene, report) = build_scene(&blueprint, SynthesisConfig::default());
//! assert!(report.is_complete());
//!
//! let camera = Camera::look_at(Point3::new(2.0, 1.0, 5.0), Point3::new(2.0, 1.0, 0.0));
//! scene.click([0.0, 0.0], &camera);
//! for _ in 0..60 {
//!     scene.tick(1.0 / 60.0);
//! }
//! ```

pub mod blueprint;
pub mod config;
pub mod door;
pub mod error;
pub mod export;
pub mod keys;
pub mod openings;
pub mod picking;
pub mod scene;
pub mod translator;

pub use blueprint_lite_geometry::{Isometry3, Mesh, Point2, Point3, Ray, Vector3};

pub use blueprint::{Blueprint, HingeSide, Opening, OpeningKind, Room, Wall};
pub use config::{OpeningOverlapPolicy, SynthesisConfig};
pub use door::{advance, DoorEasing, DoorPivot, HingeLayout, PivotState};
pub use error::{Error, Result};
pub use export::{export_obj, write_mtl, write_obj};
pub use keys::{Interactive, NodeKey, PivotKey, WindowKey};
pub use openings::{place_opening, place_openings, PlacedOpening, WallFrame};
pub use picking::{pick, Camera, PickHit};
pub use scene::{
    CavityRecord, InteractiveRegistry, Material, NodeKind, PickOutcome, SceneContext, SceneNode,
    WallRecord, WindowPane,
};
pub use translator::{build_scene, load_scene, SkippedItem, SynthesisReport};
