//! # Mesh Octree
//!
//! Octree spatial index over triangle meshes, built for the per-frame queries a
//! game issues against static terrain.
//!
//! ## Features
//!
//! - **Recursive Subdivision**: Eight-way splitting of the mesh bounds down to a configurable depth
//! - **Ray Picking**: First-hit descent returning the leaf a ray reaches, plus an opt-in
//!   nearest-hit variant
//! - **Box Collision**: Collects every leaf box overlapping a query box
//! - **Vertex or Face Indexing**: Leaves reference mesh vertices or whole triangles by index
//! - **OBJ Loading**: Builds indexable meshes straight from Wavefront OBJ files
//! - **File Configuration**: Octree settings load from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use mesh_octree::prelude::*;
//!
//! fn main() -> Result<(), OctreeError> {
//!     let mesh = TriangleMesh::from_vertices(vec![
//!         Vec3::new(0.0, 0.0, 0.0),
//!         Vec3::new(10.0, 10.0, 10.0),
//!     ]);
//!     let octree = Octree::build(mesh, OctreeConfig::with_max_depth(3))?;
//!
//!     let ray = Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
//!     let leaf = octree.query_ray(&ray).expect("ray enters the mesh bounds");
//!     assert_eq!(leaf.points, vec![0]);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_precision_loss)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod spatial;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        assets::{ObjError, ObjLoader},
        config::{Config, ConfigError},
        foundation::{
            math::Vec3,
            time::Stopwatch,
        },
        spatial::{
            IndexMode, MeshSource, Octree, OctreeConfig, OctreeError, OctreeNode,
            OctreeStats, Ray, Triangle, TriangleMesh, AABB,
        },
    };
}
