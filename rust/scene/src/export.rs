// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ export of the current scene pose
//!
//! One `o` object per node with geometry, in world space, Y-up. Materials go
//! to a companion MTL written by [`write_mtl`].

use crate::scene::{Material, SceneContext};
use blueprint_lite_geometry::transform_mesh;
use std::collections::BTreeMap;
use std::io::{self, Write};

fn material_name(material: &Material) -> String {
    let [r, g, b, a] = material.color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("mat_{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
}

fn object_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Write every node's geometry as OBJ
///
/// `mtl_file` adds an `mtllib` line and per-object `usemtl`.
pub fn write_obj<W: Write>(scene: &SceneContext, mtl_file: Option<&str>, out: &mut W) -> io::Result<()> {
    writeln!(out, "# Generated by blueprint-lite")?;
    writeln!(out, "# Coordinate system: Y-up")?;
    if let Some(mtl) = mtl_file {
        writeln!(out, "mtllib {}", mtl)?;
    }
    writeln!(out)?;

    let mut vertex_offset: u32 = 0;
    for (key, mesh, world) in scene.world_meshes() {
        let Some(node) = scene.node(key) else {
            continue;
        };
        let mesh = transform_mesh(mesh, &world);

        writeln!(out, "o {}", object_name(&node.name))?;
        if let (Some(_), Some(material)) = (mtl_file, node.material.as_ref()) {
            writeln!(out, "usemtl {}", material_name(material))?;
        }
        for p in mesh.positions.chunks_exact(3) {
            writeln!(out, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2])?;
        }
        for n in mesh.normals.chunks_exact(3) {
            writeln!(out, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2])?;
        }
        for tri in mesh.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0], tri[1], tri[2]].map(|i| i + vertex_offset + 1);
            writeln!(out, "f {}//{} {}//{} {}//{}", i0, i0, i1, i1, i2, i2)?;
        }
        vertex_offset += mesh.vertex_count() as u32;
        writeln!(out)?;
    }
    Ok(())
}

/// Write one MTL entry per distinct material in the scene
pub fn write_mtl<W: Write>(scene: &SceneContext, out: &mut W) -> io::Result<()> {
    let materials: BTreeMap<String, Material> = scene
        .nodes()
        .filter_map(|(_, node)| node.material)
        .map(|m| (material_name(&m), m))
        .collect();

    for (name, material) in materials {
        let [r, g, b, a] = material.color;
        writeln!(out, "newmtl {}", name)?;
        writeln!(out, "Kd {:.4} {:.4} {:.4}", r, g, b)?;
        writeln!(out, "d {:.4}", a)?;
        writeln!(out)?;
    }
    Ok(())
}

/// The scene as an OBJ string, without materials
pub fn export_obj(scene: &SceneContext) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_obj(scene, None, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthesisConfig;
    use crate::scene::NodeKind;
    use blueprint_lite_geometry::{box_mesh, Isometry3, Point3};

    fn two_box_scene() -> SceneContext {
        let mut scene = SceneContext::new(SynthesisConfig::default());
        let unit = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        scene
            .add_mesh_node(scene.root(), "wall 0.0", NodeKind::Wall, Isometry3::identity(), unit.clone(), Material::WALL)
            .unwrap();
        scene
            .add_window(scene.root(), "pane", Isometry3::translation(5.0, 0.0, 0.0), unit)
            .unwrap();
        scene
    }

    #[test]
    fn obj_has_objects_and_offset_faces() {
        let obj = export_obj(&two_box_scene());
        assert_eq!(obj.lines().filter(|l| l.starts_with("o ")).count(), 2);
        assert!(obj.contains("o wall_0_0"));
        assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 24);
        assert!(!obj.contains("usemtl"));

        // Second object's faces index past the first object's vertices
        let first_vertices = obj
            .split("o pane")
            .next()
            .unwrap()
            .lines()
            .filter(|l| l.starts_with("v "))
            .count();
        let max_index: usize = obj
            .lines()
            .filter(|l| l.starts_with("f "))
            .flat_map(|l| l[2..].split_whitespace().map(|v| v.split("//").next().unwrap().parse::<usize>().unwrap()))
            .max()
            .unwrap();
        assert_eq!(max_index, first_vertices * 2);
    }

    #[test]
    fn mtl_lists_distinct_materials() {
        let scene = two_box_scene();
        let mut mtl = Vec::new();
        write_mtl(&scene, &mut mtl).unwrap();
        let mtl = String::from_utf8(mtl).unwrap();
        assert_eq!(mtl.matches("newmtl").count(), 2);
        assert!(mtl.contains("d 0.3500"));

        let mut obj = Vec::new();
        write_obj(&scene, Some("scene.mtl"), &mut obj).unwrap();
        let obj = String::from_utf8(obj).unwrap();
        assert!(obj.contains("mtllib scene.mtl"));
        assert_eq!(obj.matches("usemtl").count(), 2);
    }
}
