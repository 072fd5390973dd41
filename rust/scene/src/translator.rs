// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blueprint translation
//!
//! Walls are cut in parallel; the results are inserted into the scene in
//! room/wall order so node and registry order are deterministic. A bad wall,
//! opening or floor is recorded in the report and skipped.

use crate::blueprint::{to_point, Blueprint, Room, Wall};
use crate::config::SynthesisConfig;
use crate::error::{Error, Result};
use crate::keys::{Interactive, NodeKey};
use crate::openings::{opening_element, place_openings, OpeningElement, PlacedOpening, WallFrame};
use crate::scene::{CavityRecord, Material, NodeKind, SceneContext, WallRecord};
use blueprint_lite_geometry::{BooleanCutter, Error as GeometryError, Isometry3, Mesh, Point2, Solid};
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Something that was left out of the scene
#[derive(Debug, Clone)]
pub struct SkippedItem {
    pub room: usize,
    /// `None` for the room's floor
    pub wall: Option<usize>,
    pub opening: Option<usize>,
    pub error: Error,
}

impl std::fmt::Display for SkippedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "room {}", self.room)?;
        match self.wall {
            Some(wall) => write!(f, ", wall {}", wall)?,
            None => write!(f, ", floor")?,
        }
        if let Some(opening) = self.opening {
            write!(f, ", opening {}", opening)?;
        }
        write!(f, ": {}", self.error)
    }
}

/// Counts and skipped items from one translation
#[derive(Debug, Clone, Default)]
pub struct SynthesisReport {
    pub rooms: usize,
    pub walls: usize,
    pub doors: usize,
    pub windows: usize,
    pub floors: usize,
    pub skipped: Vec<SkippedItem>,
}

impl SynthesisReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, item: SkippedItem) {
        warn!("skipped {}", item);
        self.skipped.push(item);
    }
}

/// A wall cut and ready for insertion
struct WallBuild {
    frame: WallFrame,
    solid: Solid,
    openings: Vec<(PlacedOpening, OpeningElement)>,
    skipped: Vec<SkippedItem>,
}

fn build_wall(
    blueprint: &Blueprint,
    room_index: usize,
    room: &Room,
    wall_index: usize,
    wall: &Wall,
    config: &SynthesisConfig,
) -> std::result::Result<WallBuild, SkippedItem> {
    let skipped_wall = |error: Error| SkippedItem {
        room: room_index,
        wall: Some(wall_index),
        opening: None,
        error,
    };

    let height = wall.height.or(blueprint.wall_height).unwrap_or(config.wall_height);
    let thickness = wall.thickness.or(blueprint.wall_thickness).unwrap_or(config.wall_thickness);
    let frame = WallFrame::new(to_point(&wall.from), to_point(&wall.to), height, thickness)
        .map_err(skipped_wall)?;

    let (placed, failed) = place_openings(&frame, wall.effective_openings(room), config);
    let mut skipped: Vec<SkippedItem> = failed
        .into_iter()
        .map(|(index, error)| SkippedItem {
            opening: Some(index),
            ..skipped_wall(error)
        })
        .collect();

    let mut openings = Vec::with_capacity(placed.len());
    for p in placed {
        match opening_element(&frame, &p, config) {
            Ok(element) => openings.push((p, element)),
            Err(error) => skipped.push(SkippedItem {
                opening: Some(p.index),
                ..skipped_wall(error)
            }),
        }
    }

    let cavities: Vec<Solid> = openings.iter().map(|(p, _)| p.cavity.clone()).collect();
    let body = frame.solid().map_err(skipped_wall)?;
    let solid = match BooleanCutter::new().cut(&body, &cavities) {
        Ok(solid) => solid,
        // Openings took the whole wall; their elements stay
        Err(GeometryError::EmptyMesh(_)) => {
            warn!(room = room_index, wall = wall_index, "openings remove the entire wall");
            Solid::from_mesh(Mesh::new(), *body.placement())
        }
        Err(e) => return Err(skipped_wall(e.into())),
    };

    debug!(
        room = room_index,
        wall = wall_index,
        length = frame.length,
        openings = openings.len(),
        "wall cut"
    );

    Ok(WallBuild {
        frame,
        solid,
        openings,
        skipped,
    })
}

fn insert_floor(
    scene: &mut SceneContext,
    room_node: NodeKey,
    outline: &[[f64; 2]],
) -> Result<NodeKey> {
    let points: Vec<Point2<f64>> = outline.iter().map(to_point).collect();
    let slab = Solid::slab(&points, 0.0, scene.config().floor_thickness)?;
    scene.add_mesh_node(
        room_node,
        "floor",
        NodeKind::Floor,
        *slab.placement(),
        slab.local_mesh().clone(),
        Material::FLOOR,
    )
}

fn insert_wall(
    scene: &mut SceneContext,
    report: &mut SynthesisReport,
    room_node: NodeKey,
    room_index: usize,
    wall_index: usize,
    build: WallBuild,
) -> Result<()> {
    let WallBuild {
        frame,
        solid,
        openings,
        skipped,
    } = build;
    for item in skipped {
        report.skip(item);
    }

    let name = format!("wall {}.{}", room_index, wall_index);
    let node = if solid.local_mesh().is_empty() {
        scene.add_node(room_node, name.as_str(), NodeKind::Wall, *solid.placement())?
    } else {
        scene.add_mesh_node(
            room_node,
            name.as_str(),
            NodeKind::Wall,
            *solid.placement(),
            solid.local_mesh().clone(),
            Material::WALL,
        )?
    };

    let mut cavities = Vec::with_capacity(openings.len());
    for (placed, element) in openings {
        let element_name = format!("{} {} {}", name, placed.kind.as_str(), placed.index);
        let interactive = match element {
            OpeningElement::Door { layout, panel } => {
                report.doors += 1;
                Interactive::from(scene.add_door(room_node, &element_name, &layout, panel)?)
            }
            OpeningElement::Window { placement, pane } => {
                report.windows += 1;
                Interactive::from(scene.add_window(room_node, &element_name, placement, pane)?)
            }
        };
        cavities.push(CavityRecord {
            kind: placed.kind,
            opening: placed.index,
            center: placed.center,
            offset: placed.offset,
            width: placed.width,
            bottom: placed.sill,
            top: placed.sill + placed.height,
            element: interactive,
        });
    }

    scene.push_wall(WallRecord {
        node,
        room: room_index,
        wall: wall_index,
        from: frame.from,
        to: frame.to,
        height: frame.height,
        thickness: frame.thickness,
        angle: frame.angle,
        cavities,
    });
    report.walls += 1;
    Ok(())
}

/// Build a scene from a blueprint
///
/// Never fails as a whole: anything that cannot be built is listed in the
/// report and the rest of the blueprint continues.
pub fn build_scene(blueprint: &Blueprint, config: SynthesisConfig) -> (SceneContext, SynthesisReport) {
    let jobs: Vec<(usize, usize)> = blueprint
        .rooms
        .iter()
        .enumerate()
        .flat_map(|(r, room)| (0..room.walls.len()).map(move |w| (r, w)))
        .collect();

    let builds: Vec<std::result::Result<WallBuild, SkippedItem>> = jobs
        .par_iter()
        .map(|&(r, w)| {
            let room = &blueprint.rooms[r];
            build_wall(blueprint, r, room, w, &room.walls[w], &config)
        })
        .collect::<Vec<_>>();

    let mut scene = SceneContext::new(config);
    let mut report = SynthesisReport::default();
    let mut builds = builds.into_iter();

    for (room_index, room) in blueprint.rooms.iter().enumerate() {
        let name = room
            .name
            .clone()
            .unwrap_or_else(|| format!("room {}", room_index));
        let room_node = match scene.add_node(scene.root(), name, NodeKind::Room, Isometry3::identity()) {
            Ok(node) => node,
            Err(error) => {
                report.skip(SkippedItem {
                    room: room_index,
                    wall: None,
                    opening: None,
                    error,
                });
                builds.by_ref().take(room.walls.len()).for_each(drop);
                continue;
            }
        };
        report.rooms += 1;

        if let Some(outline) = &room.floor {
            match insert_floor(&mut scene, room_node, outline) {
                Ok(_) => report.floors += 1,
                Err(error) => report.skip(SkippedItem {
                    room: room_index,
                    wall: None,
                    opening: None,
                    error,
                }),
            }
        }

        for wall_index in 0..room.walls.len() {
            let Some(build) = builds.next() else {
                break;
            };
            let result = match build {
                Ok(build) => insert_wall(&mut scene, &mut report, room_node, room_index, wall_index, build),
                Err(item) => {
                    report.skip(item);
                    Ok(())
                }
            };
            if let Err(error) = result {
                report.skip(SkippedItem {
                    room: room_index,
                    wall: Some(wall_index),
                    opening: None,
                    error,
                });
            }
        }
    }

    info!(
        rooms = report.rooms,
        walls = report.walls,
        doors = report.doors,
        windows = report.windows,
        floors = report.floors,
        skipped = report.skipped.len(),
        "scene built"
    );

    (scene, report)
}

/// Load a blueprint file and build its scene
///
/// Only loading can fail; synthesis problems end up in the report.
pub fn load_scene(path: impl AsRef<Path>, config: SynthesisConfig) -> Result<(SceneContext, SynthesisReport)> {
    let blueprint = Blueprint::from_path(path)?;
    Ok(build_scene(&blueprint, config))
}
