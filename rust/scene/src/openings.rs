// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening placement
//!
//! Resolves declarative door/window descriptors against a wall into cavity
//! solids for the boolean cutter, plus the visible element that fills each
//! cavity (door panel or window pane).

use crate::blueprint::{to_point, HingeSide, Opening, OpeningKind};
use crate::config::{OpeningOverlapPolicy, SynthesisConfig};
use crate::door::HingeLayout;
use crate::error::{Error, Result};
use blueprint_lite_geometry::{
    box_mesh, placement, plan_to_world, point_along_wall, project_onto_segment, segment_angle,
    segment_length, segment_midpoint, BooleanCutter, BoxDimensions, Error as GeometryError,
    Isometry3, Mesh, Point2, Point3, Solid, Vector3,
};

const SPAN_EPSILON: f64 = 1e-9;

fn positive(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::geometry(format!("{} must be positive, got {}", what, value)).into())
    }
}

/// A straight wall resolved to world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallFrame {
    pub from: Point2<f64>,
    pub to: Point2<f64>,
    pub height: f64,
    pub thickness: f64,
    pub length: f64,
    /// Rotation about +Y shared by the wall and everything cut into it
    pub angle: f64,
}

impl WallFrame {
    pub fn new(from: Point2<f64>, to: Point2<f64>, height: f64, thickness: f64) -> Result<Self> {
        let height = positive(height, "wall height")?;
        let thickness = positive(thickness, "wall thickness")?;
        if !(from.coords.iter().chain(to.coords.iter()).all(|c| c.is_finite())) {
            return Err(GeometryError::geometry("wall endpoints must be finite").into());
        }
        let length = segment_length(&from, &to);
        if length < blueprint_lite_geometry::segment::MIN_SEGMENT_LENGTH {
            return Err(GeometryError::geometry(format!(
                "zero-length wall at ({}, {})",
                from.x, from.y
            ))
            .into());
        }

        Ok(Self {
            from,
            to,
            height,
            thickness,
            length,
            angle: segment_angle(&from, &to),
        })
    }

    /// Uncut wall body standing on y = 0
    pub fn solid(&self) -> Result<Solid> {
        let center = plan_to_world(&segment_midpoint(&self.from, &self.to), self.height / 2.0);
        let dims = BoxDimensions::new(self.length, self.height, self.thickness);
        Ok(Solid::new_box(center, dims, self.angle)?)
    }

    /// Along-wall offset and plan point of an opening's center
    ///
    /// `at` wins over `offset`; with neither the opening is centered. An `at`
    /// point off the wall line is projected onto it.
    pub fn resolve_center(&self, opening: &Opening) -> Result<(f64, Point2<f64>)> {
        let offset = match (opening.at, opening.offset) {
            (Some(at), _) => project_onto_segment(&self.from, &self.to, &to_point(&at))?,
            (None, Some(offset)) => offset,
            (None, None) => self.length / 2.0,
        };
        if !offset.is_finite() {
            return Err(GeometryError::geometry("opening offset must be finite").into());
        }
        Ok((offset, point_along_wall(&self.from, &self.to, offset)?))
    }
}

/// An opening resolved against its wall
#[derive(Debug, Clone)]
pub struct PlacedOpening {
    /// Position in the wall's opening list
    pub index: usize,
    pub kind: OpeningKind,
    pub hinge: HingeSide,
    /// Distance from the wall start to the opening center
    pub offset: f64,
    pub center: Point2<f64>,
    pub width: f64,
    pub height: f64,
    pub sill: f64,
    /// Solid removed from the wall, slightly larger than the opening
    pub cavity: Solid,
}

impl PlacedOpening {
    /// Along-wall extent `[start, end]`
    pub fn span(&self) -> (f64, f64) {
        let half = self.width / 2.0;
        (self.offset - half, self.offset + half)
    }

    pub fn overlaps(&self, other: &PlacedOpening) -> bool {
        let (a0, a1) = self.span();
        let (b0, b1) = other.span();
        a0 < b1 - SPAN_EPSILON && b0 < a1 - SPAN_EPSILON
    }

    /// Center of the opening in world space
    pub fn world_center(&self) -> Point3<f64> {
        plan_to_world(&self.center, self.sill + self.height / 2.0)
    }
}

/// Resolve one opening and build its cavity
pub fn place_opening(
    wall: &WallFrame,
    opening: &Opening,
    index: usize,
    config: &SynthesisConfig,
) -> Result<PlacedOpening> {
    let width = positive(opening.width, "opening width")?;
    let height = positive(opening.height, "opening height")?;
    let sill = opening.sill.unwrap_or(match opening.kind {
        OpeningKind::Door => 0.0,
        OpeningKind::Window => config.window_sill,
    });
    if !(sill.is_finite() && sill >= 0.0) {
        return Err(GeometryError::geometry(format!("sill must be non-negative, got {}", sill)).into());
    }

    let (offset, center) = wall.resolve_center(opening)?;

    // Faces flush with the wall's bottom or top would be coplanar with it
    let margin = config.cavity_margin.max(0.0);
    let bottom = if sill <= 0.0 { sill - margin } else { sill };
    let top = if sill + height >= wall.height { sill + height + margin } else { sill + height };

    let cavity = Solid::new_box(
        plan_to_world(&center, (bottom + top) / 2.0),
        BoxDimensions::new(width, top - bottom, wall.thickness + margin),
        wall.angle,
    )?;
    BooleanCutter::new().check_cavity(&cavity)?;

    let placed = PlacedOpening {
        index,
        kind: opening.kind,
        hinge: opening.hinge.unwrap_or_default(),
        offset,
        center,
        width,
        height,
        sill,
        cavity,
    };

    let (start, end) = placed.span();
    if end <= SPAN_EPSILON || start >= wall.length - SPAN_EPSILON {
        return Err(GeometryError::opening(format!(
            "{} spans [{:.3}, {:.3}] entirely outside a wall of length {:.3}",
            opening.kind.as_str(),
            start,
            end,
            wall.length
        ))
        .into());
    }
    if sill >= wall.height {
        return Err(GeometryError::opening(format!(
            "{} sill {:.3} is at or above the wall top {:.3}",
            opening.kind.as_str(),
            sill,
            wall.height
        ))
        .into());
    }
    if start < -SPAN_EPSILON || end > wall.length + SPAN_EPSILON {
        tracing::warn!(
            kind = opening.kind.as_str(),
            start,
            end,
            wall_length = wall.length,
            "opening extends past the wall ends"
        );
    }
    if sill + height > wall.height {
        tracing::warn!(
            kind = opening.kind.as_str(),
            top = sill + height,
            wall_height = wall.height,
            "opening is taller than its wall"
        );
    }

    Ok(placed)
}

/// Resolve every opening of a wall
///
/// Openings that fail are returned separately with their index so the rest
/// of the wall can still be built. Overlap is checked against openings
/// accepted earlier in list order.
pub fn place_openings(
    wall: &WallFrame,
    openings: &[Opening],
    config: &SynthesisConfig,
) -> (Vec<PlacedOpening>, Vec<(usize, Error)>) {
    let mut placed: Vec<PlacedOpening> = Vec::with_capacity(openings.len());
    let mut failed = Vec::new();

    for (index, opening) in openings.iter().enumerate() {
        let candidate = match place_opening(wall, opening, index, config) {
            Ok(candidate) => candidate,
            Err(e) => {
                failed.push((index, e));
                continue;
            }
        };

        if let Some(other) = placed.iter().find(|p| p.overlaps(&candidate)) {
            let message = format!(
                "{} #{} overlaps {} #{} along the wall",
                candidate.kind.as_str(),
                index,
                other.kind.as_str(),
                other.index
            );
            match config.overlap_policy {
                OpeningOverlapPolicy::Reject => {
                    failed.push((index, GeometryError::opening(message).into()));
                    continue;
                }
                OpeningOverlapPolicy::Warn => tracing::warn!("{}", message),
            }
        }

        placed.push(candidate);
    }

    (placed, failed)
}

/// Visible element that fills a cavity
#[derive(Debug, Clone)]
pub enum OpeningElement {
    Door {
        layout: HingeLayout,
        /// Panel geometry centered on the panel's own origin
        panel: Mesh,
    },
    Window {
        placement: Isometry3<f64>,
        pane: Mesh,
    },
}

fn centered_box(width: f64, height: f64, depth: f64) -> Mesh {
    let half = Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
    box_mesh(Point3::from(-half), Point3::from(half))
}

/// Build the door panel or window pane for a placed opening
///
/// Both stay inside the wall thickness so neither protrudes past a face.
pub fn opening_element(
    wall: &WallFrame,
    placed: &PlacedOpening,
    config: &SynthesisConfig,
) -> Result<OpeningElement> {
    let max_depth = wall.thickness / 2.0;
    match placed.kind {
        OpeningKind::Door => {
            let depth = positive(config.door_panel_depth.min(max_depth), "door panel depth")?;
            let layout = HingeLayout::new(
                &wall.from,
                &wall.to,
                &placed.center,
                placed.width,
                placed.sill,
                placed.height,
                placed.hinge,
            )?;
            Ok(OpeningElement::Door {
                layout,
                panel: centered_box(placed.width, placed.height, depth),
            })
        }
        OpeningKind::Window => {
            let depth = positive(config.window_pane_depth.min(max_depth), "window pane depth")?;
            Ok(OpeningElement::Window {
                placement: placement(placed.world_center(), wall.angle),
                pane: centered_box(placed.width, placed.height, depth),
            })
        }
    }
}
