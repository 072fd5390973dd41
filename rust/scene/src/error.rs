// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scene synthesis and interaction.

use crate::keys::{NodeKey, PivotKey, WindowKey};

/// Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a blueprint or building its scene.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Geometry synthesis failed for one wall, opening or floor.
    #[error(transparent)]
    Geometry(#[from] blueprint_lite_geometry::Error),

    /// The blueprint document could not be read or decoded. Fatal.
    #[error("failed to load blueprint: {0}")]
    BlueprintLoad(String),

    #[error("scene node not found: {0:?}")]
    UnknownNode(NodeKey),

    #[error("door pivot not found: {0:?}")]
    UnknownPivot(PivotKey),

    #[error("window not found: {0:?}")]
    UnknownWindow(WindowKey),
}

impl Error {
    /// True for zero-length walls and non-positive dimensions.
    pub fn is_invalid_geometry(&self) -> bool {
        matches!(
            self,
            Error::Geometry(blueprint_lite_geometry::Error::InvalidGeometry(_))
        )
    }

    /// True for degenerate or overlapping openings.
    pub fn is_invalid_opening(&self) -> bool {
        matches!(
            self,
            Error::Geometry(blueprint_lite_geometry::Error::InvalidOpening(_))
        )
    }
}
