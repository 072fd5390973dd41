// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stable keys for scene arena entries.
//!
//! Keys are created by `slotmap::SlotMap` and stay valid for the lifetime of
//! the [`SceneContext`](crate::scene::SceneContext) that issued them.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a node in the scene hierarchy.
    pub struct NodeKey;

    /// Key for a door pivot (hinge state plus its panel).
    pub struct PivotKey;

    /// Key for a window pane.
    pub struct WindowKey;
}

/// Logical interactive unit a pointer hit can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interactive {
    Door { pivot: PivotKey },
    Window { window: WindowKey },
}

impl From<PivotKey> for Interactive {
    fn from(pivot: PivotKey) -> Self {
        Interactive::Door { pivot }
    }
}

impl From<WindowKey> for Interactive {
    fn from(window: WindowKey) -> Self {
        Interactive::Window { window }
    }
}
