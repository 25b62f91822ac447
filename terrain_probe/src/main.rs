//! Terrain Probe
//!
//! Builds an octree over a terrain mesh and runs the queries a game issues
//! against it every frame:
//! - Picking the terrain vertex under a ray
//! - Altitude of a point above the ground
//! - Box collision against the leaf cells
//!
//! Usage: `terrain_probe [mesh.obj] [config.toml|config.ron]`
//!
//! Without a mesh a rolling height field is generated.

use mesh_octree::foundation::logging;
use mesh_octree::prelude::*;
use std::env;
use std::error::Error;

// Generated terrain
const GRID_SIZE: usize = 64;
const GRID_SPACING: f32 = 2.0;
const HILL_HEIGHT: f32 = 6.0;

// A box touching more leaf cells than this counts as a collision
const COLLISION_THRESHOLD: usize = 10;

// Probe box half-size
const PROBE_EXTENT: f32 = 4.0;

fn generated_terrain() -> TriangleMesh {
    TriangleMesh::height_field(GRID_SIZE, GRID_SIZE, GRID_SPACING, |x, z| {
        HILL_HEIGHT * ((x * 0.08).sin() + (z * 0.05).cos())
    })
}

fn load_config(path: Option<&String>) -> Result<OctreeConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            let config = OctreeConfig::load_from_file(path)?;
            config.validate()?;
            log::info!("Loaded octree config from {path}: {config:?}");
            Ok(config)
        }
        None => Ok(OctreeConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = load_config(args.get(1))?;

    let mesh = match args.first() {
        Some(path) => ObjLoader::load_obj(path)?,
        None => {
            log::info!("No mesh given, generating a {GRID_SIZE}x{GRID_SIZE} height field");
            generated_terrain()
        }
    };

    let octree = Octree::build(mesh, config)?;
    let Some(root) = octree.root() else {
        return Err("octree did not build".into());
    };
    let bounds = root.bounds;

    for (level, boxes) in octree.boxes_by_level(octree.stats().depth).iter().enumerate() {
        log::info!("Level {level}: {} boxes", boxes.len());
    }

    // Straight down through the middle of the terrain
    let above = Vec3::new(bounds.center().x, bounds.max.y + 10.0, bounds.center().z);
    match octree.pick_point(&Ray::downward(above)) {
        Some(pick) => log::info!(
            "Picked element {} at {:?} (leaf {:?})",
            pick.index,
            pick.position,
            pick.leaf_bounds
        ),
        None => log::info!("Pick ray hit nothing"),
    }

    match octree.altitude_above(above) {
        Some(altitude) => log::info!("Altitude above terrain at {above:?}: {altitude:.3}"),
        None => log::info!("No terrain below {above:?}"),
    }

    // Slide a probe box across the terrain surface
    let stopwatch = Stopwatch::start_new();
    let steps = 8;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let center = Vec3::new(
            bounds.min.x + t * bounds.size().x,
            bounds.center().y,
            bounds.min.z + t * bounds.size().z,
        );
        let probe = AABB::from_center_extents(center, Vec3::repeat(PROBE_EXTENT));
        let touched = octree.query_box(&probe).len();
        log::info!(
            "Probe at {center:?}: {touched} leaf boxes, collision: {}",
            octree.collides(&probe, COLLISION_THRESHOLD)
        );
    }
    log::info!("Collision sweep took {:.3} ms", stopwatch.elapsed_millis());

    Ok(())
}
