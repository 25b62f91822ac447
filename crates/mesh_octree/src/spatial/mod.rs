//! Spatial partitioning data structures
//!
//! Provides the octree index over triangle meshes together with the
//! geometric primitives its queries are phrased in.

mod aabb;
mod error;
pub mod mesh;
mod octree;
mod primitives;
mod query;

#[cfg(test)]
mod tests;

pub use aabb::AABB;
pub use error::OctreeError;
pub use mesh::{MeshSource, TriangleMesh};
pub use octree::{IndexMode, Octree, OctreeConfig, OctreeNode, OctreeStats, MAX_DEPTH};
pub use primitives::{Ray, Triangle};
pub use query::PointPick;
