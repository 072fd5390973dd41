// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry synthesis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Zero-length segment, non-positive dimension or non-finite input
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Degenerate cavity or opening that collides with another opening
    #[error("Invalid opening: {0}")]
    InvalidOpening(String),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Empty mesh: {0}")]
    EmptyMesh(String),
}

impl Error {
    pub fn geometry(msg: impl Into<String>) -> Self {
        Error::InvalidGeometry(msg.into())
    }

    pub fn opening(msg: impl Into<String>) -> Self {
        Error::InvalidOpening(msg.into())
    }
}
