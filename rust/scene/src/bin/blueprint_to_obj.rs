// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: build a blueprint's scene and write it as OBJ
//!
//! Usage:
//!   blueprint-to-obj house.json
//!   blueprint-to-obj house.json --output house.obj --click 0 0 --ticks 60

use anyhow::{bail, Context, Result};
use blueprint_lite_scene::{
    build_scene, write_mtl, write_obj, Blueprint, Camera, PickOutcome, Point3, SynthesisConfig,
};
use std::env;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

const TICK: f64 = 1.0 / 60.0;

struct Options {
    blueprint_path: String,
    output_path: String,
    click: Option<[f64; 2]>,
    ticks: usize,
}

fn parse_args(args: &[String]) -> Result<Option<Options>> {
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        return Ok(None);
    }

    let mut options = Options {
        blueprint_path: args[1].clone(),
        output_path: String::from("blueprint.obj"),
        click: None,
        ticks: 0,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                i += 1;
                options.output_path = args.get(i).context("--output needs a path")?.clone();
            }
            "--click" => {
                let x = args.get(i + 1).context("--click needs X and Y")?;
                let y = args.get(i + 2).context("--click needs X and Y")?;
                options.click = Some([
                    x.parse().with_context(|| format!("invalid click X: {}", x))?,
                    y.parse().with_context(|| format!("invalid click Y: {}", y))?,
                ]);
                i += 2;
            }
            "--ticks" => {
                i += 1;
                let n = args.get(i).context("--ticks needs a count")?;
                options.ticks = n.parse().with_context(|| format!("invalid tick count: {}", n))?;
            }
            other => bail!("unknown option: {}", other),
        }
        i += 1;
    }

    Ok(Some(options))
}

/// Camera in front of the scene (+Z), framing its bounds
fn framing_camera(min: Point3<f64>, max: Point3<f64>) -> Camera {
    let center = nalgebra::center(&min, &max);
    let extent = (max - min).norm().max(1.0);
    Camera::look_at(center + nalgebra::Vector3::new(0.0, 0.0, extent * 1.5), center)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(options) = parse_args(&args)? else {
        print_usage();
        return Ok(());
    };

    println!("=== Blueprint to OBJ ===");
    println!();

    println!("[1/4] Loading blueprint: {}", options.blueprint_path);
    let blueprint = Blueprint::from_path(&options.blueprint_path)?;
    println!("  Rooms: {}, walls: {}", blueprint.rooms.len(), blueprint.wall_count());

    println!("[2/4] Building scene...");
    let config = SynthesisConfig::from_env();
    let (mut scene, report) = build_scene(&blueprint, config);
    for item in &report.skipped {
        println!("  Skipped {}", item);
    }

    println!("[3/4] Interacting...");
    if let Some(ndc) = options.click {
        let (min, max) = scene.world_mesh().bounds();
        let camera = framing_camera(min.cast(), max.cast());
        match scene.click(ndc, &camera) {
            PickOutcome::Toggled { state, .. } => println!(
                "  Click ({:.2}, {:.2}): door {}",
                ndc[0],
                ndc[1],
                if state.is_open { "opening" } else { "closing" }
            ),
            PickOutcome::Highlighted { .. } => {
                println!("  Click ({:.2}, {:.2}): window highlighted", ndc[0], ndc[1])
            }
            PickOutcome::Nothing => println!("  Click ({:.2}, {:.2}): nothing hit", ndc[0], ndc[1]),
        }
    }
    for _ in 0..options.ticks {
        scene.tick(TICK);
    }
    if options.ticks > 0 {
        println!("  Advanced {} ticks ({:.2}s)", options.ticks, options.ticks as f64 * TICK);
    }

    println!("[4/4] Writing OBJ file: {}", options.output_path);
    let mtl_path = Path::new(&options.output_path).with_extension("mtl");
    let mtl_name = mtl_path
        .file_name()
        .and_then(|n| n.to_str())
        .context("output path has no file name")?
        .to_string();

    let obj = fs::File::create(&options.output_path)
        .with_context(|| format!("cannot create {}", options.output_path))?;
    let mut obj = BufWriter::new(obj);
    write_obj(&scene, Some(&mtl_name), &mut obj)?;
    obj.flush()?;
    let mtl = fs::File::create(&mtl_path)
        .with_context(|| format!("cannot create {}", mtl_path.display()))?;
    let mut mtl = BufWriter::new(mtl);
    write_mtl(&scene, &mut mtl)?;
    mtl.flush()?;

    let mesh = scene.world_mesh();
    println!();
    println!("=== Scene Summary ===");
    println!("  Rooms: {}", report.rooms);
    println!("  Walls: {}", report.walls);
    println!("  Doors: {}", report.doors);
    println!("  Windows: {}", report.windows);
    println!("  Floors: {}", report.floors);
    println!("  Skipped: {}", report.skipped.len());
    println!("  Total: {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count());

    if report.rooms == 0 && !blueprint.rooms.is_empty() {
        bail!("no rooms could be built");
    }
    Ok(())
}

fn print_usage() {
    println!(
        r#"Blueprint to OBJ
================

Builds wall solids with door/window openings from a blueprint JSON file
and writes the scene as Wavefront OBJ (plus an MTL beside it).

USAGE:
  blueprint-to-obj <blueprint.json> [OPTIONS]

OPTIONS:
  -o, --output <path>   Output OBJ path (default: blueprint.obj)
  --click <x> <y>       Click at a normalized device coordinate in [-1, 1]
                        with a camera framing the scene from +Z
  --ticks <n>           Advance door animation by n ticks at 60 Hz
  -h, --help            Show this help message

ENVIRONMENT:
  RUST_LOG                    Log filter (default: info)
  BLUEPRINT_WALL_HEIGHT       Default wall height in meters (3.0)
  BLUEPRINT_WALL_THICKNESS    Default wall thickness in meters (0.2)
  BLUEPRINT_WINDOW_SILL       Default window sill height (1.0)
  BLUEPRINT_OVERLAP_POLICY    reject | warn"#
    );
}
