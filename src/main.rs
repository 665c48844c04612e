//! Hitgrid command line
//!
//! `hitgrid <scene.json>` prints every colliding body pair and the traced
//! outlines of grid bodies as JSON. Without an argument it runs a quick
//! self-check.

use std::path::Path;

use anyhow::{Context, Result, bail};
use glam::Vec2;
use hitgrid::geom::Geometry;
use hitgrid::{Corner, OccupancyGrid, Outline, Shape, Tolerances, collides_with, trace_outlines};
use serde::{Deserialize, Serialize};

/// Scene file layout
#[derive(Debug, Deserialize)]
struct Scene {
    #[serde(default)]
    tolerances: Tolerances,
    bodies: Vec<Body>,
}

/// A named shape placed at an owner position
#[derive(Debug, Deserialize)]
struct Body {
    name: String,
    #[serde(default)]
    position: Vec2,
    shape: Shape,
}

#[derive(Debug, Serialize)]
struct BodyOutlines {
    body: String,
    outlines: Vec<Outline>,
}

#[derive(Debug, Serialize)]
struct Report {
    collisions: Vec<(String, String)>,
    outlines: Vec<BodyOutlines>,
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Hitgrid {} starting...", env!("CARGO_PKG_VERSION"));

    match std::env::args().nth(1) {
        Some(path) => {
            let report = run_scene(Path::new(&path))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        None => {
            println!("No scene given, running self-check...");
            self_check()?;
            println!("✓ Collision and contour checks passed!");
        }
    }
    Ok(())
}

fn run_scene(path: &Path) -> Result<Report> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scene {}", path.display()))?;
    let scene: Scene = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse scene {}", path.display()))?;
    log::info!(
        "Loaded {} bodies from {}",
        scene.bodies.len(),
        path.display()
    );
    Ok(evaluate(&scene))
}

fn evaluate(scene: &Scene) -> Report {
    let bodies = &scene.bodies;

    let mut collisions = Vec::new();
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if collides_with(&a.shape, a.position, &b.shape, b.position, &scene.tolerances) {
                log::debug!("{} ({}) hits {} ({})", a.name, a.shape.kind(), b.name, b.shape.kind());
                collisions.push((a.name.clone(), b.name.clone()));
            }
        }
    }

    let outlines = bodies
        .iter()
        .filter_map(|body| match body.shape.geometry() {
            Geometry::Grid(grid) => {
                let anchor = body.shape.anchor(body.position);
                Some(BodyOutlines {
                    body: body.name.clone(),
                    outlines: trace_outlines(grid)
                        .iter()
                        .map(|o| o.translated(anchor))
                        .collect(),
                })
            }
            _ => None,
        })
        .collect();

    log::info!("{} colliding pairs", collisions.len());
    Report {
        collisions,
        outlines,
    }
}

fn self_check() -> Result<()> {
    let tol = Tolerances::default();
    let block = Shape::new_box(Vec2::ZERO, Vec2::new(10.0, 10.0))?;
    let neighbor = Shape::new_box(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0))?;
    let ramp = Shape::right_triangle(Vec2::new(20.0, 0.0), Vec2::new(10.0, 10.0), Corner::NorthWest)?;
    let ball = Shape::circle(Vec2::new(27.0, 7.0), 2.0)?;

    let grid = OccupancyGrid::from_rows(10, 10, &["###", "#.#", "###"])?;
    let level = Shape::grid(Vec2::new(0.0, 20.0), grid)?;

    let checks = [
        ("abutting boxes", &block, &neighbor, true),
        ("box and ramp", &block, &ramp, false),
        ("ball on ramp", &ball, &ramp, true),
        ("block above level", &block, &level, false),
    ];
    for (name, a, b, expected) in checks {
        let hit = collides_with(a, Vec2::ZERO, b, Vec2::ZERO, &tol);
        if hit != expected {
            bail!("{name}: expected {expected}, got {hit}");
        }
        log::info!("{name}: ok");
    }

    let Geometry::Grid(grid) = level.geometry() else {
        bail!("level is not a grid");
    };
    let outlines = trace_outlines(grid);
    if outlines.len() != 2 || !outlines[1].is_hole() {
        bail!("expected a ring and its hole, got {} outlines", outlines.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_check_passes() {
        assert!(self_check().is_ok());
    }

    #[test]
    fn test_scene_report() {
        let json = r##"{
            "tolerances": { "line_thickness": 1.0 },
            "bodies": [
                { "name": "crate", "position": [0, 0], "shape": { "kind": "box", "size": [10, 10] } },
                { "name": "ball", "position": [14, 5], "shape": { "kind": "circle", "radius": 5 } },
                { "name": "far", "position": [100, 100], "shape": { "kind": "point" } },
                { "name": "wall", "position": [50, 0], "shape": {
                    "kind": "grid", "width": 20, "height": 10, "tile_width": 10, "tile_height": 10,
                    "tiles": [1, 1]
                } }
            ]
        }"##;
        let scene: Scene = serde_json::from_str(json).unwrap();
        assert_eq!(scene.tolerances.line_thickness, 1.0);

        let report = evaluate(&scene);
        assert_eq!(report.collisions, vec![("crate".to_string(), "ball".to_string())]);
        assert_eq!(report.outlines.len(), 1);
        assert_eq!(report.outlines[0].body, "wall");
        assert_eq!(report.outlines[0].outlines[0].points[0], Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_invalid_shape_is_rejected() {
        let json = r#"{ "bodies": [
            { "name": "bad", "shape": { "kind": "circle", "radius": -1 } }
        ] }"#;
        assert!(serde_json::from_str::<Scene>(json).is_err());
    }
}
