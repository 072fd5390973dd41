// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene arena
//!
//! Nodes live in a `SlotMap` and link to their parent by key, so resolving
//! the logical owner of a hit node is a walk up `parent` links. Door pivots
//! and window panes are stored in their own arenas; the interactive registry
//! maps registered nodes to the entity they stand for.

use crate::blueprint::OpeningKind;
use crate::config::SynthesisConfig;
use crate::door::{DoorEasing, DoorPivot, HingeLayout, PivotState};
use crate::error::{Error, Result};
use crate::keys::{Interactive, NodeKey, PivotKey, WindowKey};
use crate::picking::{self, Camera};
use blueprint_lite_geometry::{transform_mesh, Isometry3, Mesh, Point2, Point3};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

/// Flat RGBA surface color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 4],
}

impl Material {
    pub const WALL: Material = Material::rgba(0.85, 0.85, 0.82, 1.0);
    pub const FLOOR: Material = Material::rgba(0.55, 0.55, 0.55, 1.0);
    pub const DOOR: Material = Material::rgba(0.55, 0.35, 0.2, 1.0);
    pub const WINDOW: Material = Material::rgba(0.6, 0.8, 0.95, 0.35);
    pub const WINDOW_HIGHLIGHT: Material = Material::rgba(1.0, 0.85, 0.2, 0.6);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { color: [r, g, b, a] }
    }

    #[inline]
    pub fn is_translucent(&self) -> bool {
        self.color[3] < 1.0
    }
}

/// What a scene node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Room,
    Wall,
    Floor,
    DoorPivot(PivotKey),
    DoorPanel(PivotKey),
    WindowPane(WindowKey),
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeKey>,
    pub children: Vec<NodeKey>,
    /// Transform relative to the parent
    pub local: Isometry3<f64>,
    /// Geometry in the node's own frame
    pub mesh: Option<Mesh>,
    pub material: Option<Material>,
}

impl SceneNode {
    fn new(name: impl Into<String>, kind: NodeKind, parent: Option<NodeKey>, local: Isometry3<f64>) -> Self {
        Self {
            name: name.into(),
            kind,
            parent,
            children: Vec::new(),
            local,
            mesh: None,
            material: None,
        }
    }
}

/// A stationary window pane; clicking it only recolors it
#[derive(Debug, Clone)]
pub struct WindowPane {
    pub node: NodeKey,
    pub highlighted: bool,
}

/// One cavity cut into a wall, kept for inspection
#[derive(Debug, Clone, PartialEq)]
pub struct CavityRecord {
    pub kind: OpeningKind,
    /// Index in the wall's effective opening list
    pub opening: usize,
    pub center: Point2<f64>,
    /// Along-wall distance from the wall start to `center`
    pub offset: f64,
    pub width: f64,
    /// Vertical extent of the opening itself, without the cut margin
    pub bottom: f64,
    pub top: f64,
    pub element: Interactive,
}

/// A wall built from the blueprint
#[derive(Debug, Clone)]
pub struct WallRecord {
    pub node: NodeKey,
    pub room: usize,
    pub wall: usize,
    pub from: Point2<f64>,
    pub to: Point2<f64>,
    pub height: f64,
    pub thickness: f64,
    /// Rotation about +Y
    pub angle: f64,
    pub cavities: Vec<CavityRecord>,
}

/// Registered interactive nodes, in registration order
///
/// Only grows; nodes are never unregistered while the scene lives.
#[derive(Debug, Clone, Default)]
pub struct InteractiveRegistry {
    entries: FxHashMap<NodeKey, Interactive>,
    order: Vec<NodeKey>,
}

impl InteractiveRegistry {
    pub fn register(&mut self, node: NodeKey, entity: Interactive) {
        if self.entries.insert(node, entity).is_none() {
            self.order.push(node);
        }
    }

    #[inline]
    pub fn get(&self, node: NodeKey) -> Option<Interactive> {
        self.entries.get(&node).copied()
    }

    #[inline]
    pub fn contains(&self, node: NodeKey) -> bool {
        self.entries.contains_key(&node)
    }

    /// Registered nodes, the roots of every pick traversal
    pub fn roots(&self) -> &[NodeKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Result of a pointer click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickOutcome {
    /// A door was toggled; carries its state after the toggle
    Toggled { pivot: PivotKey, state: PivotState },
    Highlighted { window: WindowKey },
    Nothing,
}

/// All state for one loaded blueprint
///
/// Built once by [`build_scene`](crate::translator::build_scene); dropped on
/// reload.
#[derive(Debug)]
pub struct SceneContext {
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,
    pivots: SlotMap<PivotKey, DoorPivot>,
    windows: SlotMap<WindowKey, WindowPane>,
    registry: InteractiveRegistry,
    walls: Vec<WallRecord>,
    config: SynthesisConfig,
    easing: DoorEasing,
}

impl SceneContext {
    pub fn new(config: SynthesisConfig) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new("root", NodeKind::Root, None, Isometry3::identity()));
        Self {
            nodes,
            root,
            pivots: SlotMap::with_key(),
            windows: SlotMap::with_key(),
            registry: InteractiveRegistry::default(),
            walls: Vec::new(),
            easing: config.door_easing(),
            config,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeKey {
        self.root
    }

    #[inline]
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &SceneNode)> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn pivot(&self, key: PivotKey) -> Option<&DoorPivot> {
        self.pivots.get(key)
    }

    pub fn pivots(&self) -> impl Iterator<Item = (PivotKey, &DoorPivot)> {
        self.pivots.iter()
    }

    pub fn window(&self, key: WindowKey) -> Option<&WindowPane> {
        self.windows.get(key)
    }

    pub fn windows(&self) -> impl Iterator<Item = (WindowKey, &WindowPane)> {
        self.windows.iter()
    }

    #[inline]
    pub fn registry(&self) -> &InteractiveRegistry {
        &self.registry
    }

    pub fn walls(&self) -> &[WallRecord] {
        &self.walls
    }

    /// Add a child node under `parent`
    pub fn add_node(
        &mut self,
        parent: NodeKey,
        name: impl Into<String>,
        kind: NodeKind,
        local: Isometry3<f64>,
    ) -> Result<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::UnknownNode(parent));
        }
        let key = self.nodes.insert(SceneNode::new(name, kind, Some(parent), local));
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(key);
        }
        Ok(key)
    }

    /// Add a node carrying geometry
    pub fn add_mesh_node(
        &mut self,
        parent: NodeKey,
        name: impl Into<String>,
        kind: NodeKind,
        local: Isometry3<f64>,
        mesh: Mesh,
        material: Material,
    ) -> Result<NodeKey> {
        let key = self.add_node(parent, name, kind, local)?;
        let node = self.nodes.get_mut(key).ok_or(Error::UnknownNode(key))?;
        node.mesh = Some(mesh);
        node.material = Some(material);
        Ok(key)
    }

    /// Add a door: a pivot node at the hinge with the panel as its child
    ///
    /// `layout` is in world space; the pivot's local transform is taken
    /// relative to `parent`. The pivot is registered as interactive; the
    /// panel is not.
    pub fn add_door(
        &mut self,
        parent: NodeKey,
        name: &str,
        layout: &HingeLayout,
        panel: Mesh,
    ) -> Result<PivotKey> {
        let parent_inverse = self.world_transform(parent)?.inverse();
        let key = self.pivots.insert(DoorPivot {
            node: NodeKey::default(),
            panel: NodeKey::default(),
            hinge: layout.hinge,
            hinge_point: layout.hinge_point,
            parent_inverse,
            state: layout.state,
        });

        let pivot_node = self.add_node(
            parent,
            format!("{} pivot", name),
            NodeKind::DoorPivot(key),
            parent_inverse * layout.pivot_transform(layout.state.current_angle),
        )?;
        let offset = layout.panel_offset;
        let panel_node = self.add_mesh_node(
            pivot_node,
            format!("{} panel", name),
            NodeKind::DoorPanel(key),
            Isometry3::translation(offset.x, offset.y, offset.z),
            panel,
            Material::DOOR,
        )?;

        if let Some(pivot) = self.pivots.get_mut(key) {
            pivot.node = pivot_node;
            pivot.panel = panel_node;
        }
        self.registry.register(pivot_node, Interactive::from(key));
        Ok(key)
    }

    /// Add a window pane and register it as interactive
    pub fn add_window(
        &mut self,
        parent: NodeKey,
        name: &str,
        placement: Isometry3<f64>,
        pane: Mesh,
    ) -> Result<WindowKey> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::UnknownNode(parent));
        }
        let key = self.windows.insert(WindowPane {
            node: NodeKey::default(),
            highlighted: false,
        });
        let node = self.add_mesh_node(parent, name, NodeKind::WindowPane(key), placement, pane, Material::WINDOW)?;
        if let Some(window) = self.windows.get_mut(key) {
            window.node = node;
        }
        self.registry.register(node, Interactive::from(key));
        Ok(key)
    }

    pub(crate) fn push_wall(&mut self, record: WallRecord) {
        self.walls.push(record);
    }

    /// Node transform in world space
    pub fn world_transform(&self, key: NodeKey) -> Result<Isometry3<f64>> {
        let mut node = self.nodes.get(key).ok_or(Error::UnknownNode(key))?;
        let mut world = node.local;
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent).ok_or(Error::UnknownNode(parent))?;
            world = node.local * world;
        }
        Ok(world)
    }

    /// Logical interactive entity owning `key`
    ///
    /// Walks parent links until a registered node is found; `None` once the
    /// root is passed without a match.
    pub fn resolve_target(&self, key: NodeKey) -> Option<Interactive> {
        let mut current = Some(key);
        while let Some(k) = current {
            if let Some(entity) = self.registry.get(k) {
                return Some(entity);
            }
            current = self.nodes.get(k)?.parent;
        }
        None
    }

    /// Flip a door between open and closed
    pub fn toggle_door(&mut self, key: PivotKey) -> Result<PivotState> {
        let pivot = self.pivots.get_mut(key).ok_or(Error::UnknownPivot(key))?;
        pivot.state.toggle();
        tracing::debug!(
            is_open = pivot.state.is_open,
            target = pivot.state.target_angle,
            "door toggled"
        );
        Ok(pivot.state)
    }

    /// Recolor a window pane; repeated calls leave it the same
    pub fn highlight_window(&mut self, key: WindowKey) -> Result<()> {
        let window = self.windows.get_mut(key).ok_or(Error::UnknownWindow(key))?;
        window.highlighted = true;
        let node = self.nodes.get_mut(window.node).ok_or(Error::UnknownNode(window.node))?;
        node.material = Some(Material::WINDOW_HIGHLIGHT);
        Ok(())
    }

    /// Advance every door pivot by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        for pivot in self.pivots.values_mut() {
            pivot.state = self.easing.advance(pivot.state, dt);
            if let Some(node) = self.nodes.get_mut(pivot.node) {
                node.local = pivot.local_transform();
            }
        }
    }

    /// Pick at a normalized device coordinate and apply the effect
    ///
    /// Misses, coordinates outside [-1, 1] and hits without an interactive
    /// owner all yield [`PickOutcome::Nothing`].
    pub fn click(&mut self, ndc: [f64; 2], camera: &Camera) -> PickOutcome {
        let Some(ray) = camera.ray_from_ndc(ndc) else {
            return PickOutcome::Nothing;
        };
        let Some(hit) = picking::pick(self, &ray) else {
            tracing::debug!(x = ndc[0], y = ndc[1], "click hit nothing");
            return PickOutcome::Nothing;
        };

        match hit.target {
            Interactive::Door { pivot } => match self.toggle_door(pivot) {
                Ok(state) => PickOutcome::Toggled { pivot, state },
                Err(_) => PickOutcome::Nothing,
            },
            Interactive::Window { window } => match self.highlight_window(window) {
                Ok(()) => PickOutcome::Highlighted { window },
                Err(_) => PickOutcome::Nothing,
            },
        }
    }

    /// Every node's geometry merged in world space
    pub fn world_mesh(&self) -> Mesh {
        let mut out = Mesh::new();
        for (_, mesh, world) in self.world_meshes() {
            out.merge(&transform_mesh(mesh, &world));
        }
        out
    }

    /// Nodes with geometry, with their world transforms, in depth-first order
    pub fn world_meshes(&self) -> Vec<(NodeKey, &Mesh, Isometry3<f64>)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, Isometry3::identity())];
        while let Some((key, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            let world = parent_world * node.local;
            if let Some(mesh) = &node.mesh {
                out.push((key, mesh, world));
            }
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }
        out
    }

    /// World position of a node's origin
    pub fn world_origin(&self, key: NodeKey) -> Result<Point3<f64>> {
        Ok(self.world_transform(key)? * Point3::origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::HingeSide;
    use approx::assert_relative_eq;
    use blueprint_lite_geometry::box_mesh;

    fn unit_box() -> Mesh {
        box_mesh(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5))
    }

    fn door_layout() -> HingeLayout {
        HingeLayout::new(
            &Point2::new(0.0, 0.0),
            &Point2::new(5.0, 0.0),
            &Point2::new(2.0, 0.0),
            1.0,
            0.0,
            2.0,
            HingeSide::Left,
        )
        .unwrap()
    }

    #[test]
    fn world_transform_composes_parents() {
        let mut scene = SceneContext::new(SynthesisConfig::default());
        let a = scene
            .add_node(scene.root(), "a", NodeKind::Room, Isometry3::translation(1.0, 0.0, 0.0))
            .unwrap();
        let b = scene
            .add_node(a, "b", NodeKind::Wall, Isometry3::translation(0.0, 2.0, 0.0))
            .unwrap();
        assert_relative_eq!(scene.world_origin(b).unwrap(), Point3::new(1.0, 2.0, 0.0));
        assert_eq!(scene.node(a).unwrap().children, vec![b]);
    }

    #[test]
    fn unknown_parent_is_an_error() {
        let mut scene = SceneContext::new(SynthesisConfig::default());
        let result = scene.add_node(NodeKey::default(), "x", NodeKind::Room, Isometry3::identity());
        assert!(matches!(result, Err(Error::UnknownNode(_))));
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn door_panel_resolves_to_pivot() {
        let mut scene = SceneContext::new(SynthesisConfig::default());
        let pivot = scene.add_door(scene.root(), "door", &door_layout(), unit_box()).unwrap();
        let door = scene.pivot(pivot).unwrap().clone();

        assert_eq!(scene.resolve_target(door.panel), Some(Interactive::Door { pivot }));
        assert_eq!(scene.resolve_target(door.node), Some(Interactive::Door { pivot }));
        assert_eq!(scene.resolve_target(scene.root()), None);
        assert!(!scene.registry().contains(door.panel));

        // Closed panel sits in the cavity
        assert_relative_eq!(
            scene.world_origin(door.panel).unwrap(),
            Point3::new(2.0, 1.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn tick_moves_pivot_node() {
        let mut scene = SceneContext::new(SynthesisConfig::default());
        let pivot = scene.add_door(scene.root(), "door", &door_layout(), unit_box()).unwrap();
        scene.toggle_door(pivot).unwrap();
        for _ in 0..600 {
            scene.tick(1.0 / 60.0);
        }
        let door = scene.pivot(pivot).unwrap();
        assert!(door.state.is_fully_open(scene.config().open_tolerance));

        // Left hinge at x = 1.5 swung +90° about Y: panel now along -Z
        assert_relative_eq!(
            scene.world_origin(door.panel).unwrap(),
            Point3::new(1.5, 1.0, -0.5),
            epsilon = 1e-6
        );
    }

    #[test]
    fn door_under_moved_parent_keeps_world_pose() {
        let mut scene = SceneContext::new(SynthesisConfig::default());
        let room = scene
            .add_node(
                scene.root(),
                "room",
                NodeKind::Room,
                blueprint_lite_geometry::placement(Point3::new(3.0, 0.5, -1.0), 0.7),
            )
            .unwrap();
        let pivot = scene.add_door(room, "door", &door_layout(), unit_box()).unwrap();
        let panel = scene.pivot(pivot).unwrap().panel;
        assert_relative_eq!(scene.world_origin(panel).unwrap(), Point3::new(2.0, 1.0, 0.0), epsilon = 1e-9);

        scene.toggle_door(pivot).unwrap();
        for _ in 0..600 {
            scene.tick(1.0 / 60.0);
        }
        assert_relative_eq!(scene.world_origin(panel).unwrap(), Point3::new(1.5, 1.0, -0.5), epsilon = 1e-6);
    }

    #[test]
    fn window_highlight_is_idempotent() {
        let mut scene = SceneContext::new(SynthesisConfig::default());
        let window = scene
            .add_window(scene.root(), "window", Isometry3::identity(), unit_box())
            .unwrap();
        scene.highlight_window(window).unwrap();
        scene.highlight_window(window).unwrap();
        let node = scene.window(window).unwrap().node;
        assert_eq!(scene.node(node).unwrap().material, Some(Material::WINDOW_HIGHLIGHT));
        assert!(scene.window(window).unwrap().highlighted);
    }

    #[test]
    fn registry_keeps_order_and_ignores_duplicates() {
        let mut scene = SceneContext::new(SynthesisConfig::default());
        let w1 = scene.add_window(scene.root(), "w1", Isometry3::identity(), unit_box()).unwrap();
        let w2 = scene.add_window(scene.root(), "w2", Isometry3::identity(), unit_box()).unwrap();
        let n1 = scene.window(w1).unwrap().node;
        let n2 = scene.window(w2).unwrap().node;
        assert_eq!(scene.registry().roots(), &[n1, n2]);

        scene.registry.register(n1, Interactive::from(w1));
        assert_eq!(scene.registry().len(), 2);
    }

    #[test]
    fn world_mesh_merges_all_geometry() {
        let mut scene = SceneContext::new(SynthesisConfig::default());
        scene.add_door(scene.root(), "door", &door_layout(), unit_box()).unwrap();
        scene
            .add_window(scene.root(), "window", Isometry3::translation(4.0, 1.5, 0.0), unit_box())
            .unwrap();
        let mesh = scene.world_mesh();
        assert_eq!(mesh.triangle_count(), 24);
        assert_relative_eq!(mesh.signed_volume(), 2.0, epsilon = 1e-5);
    }
}
