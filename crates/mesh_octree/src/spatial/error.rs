//! Spatial index errors

use crate::foundation::math::Vec3;
use thiserror::Error;

/// Errors raised while building or querying an octree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OctreeError {
    /// The mesh cannot be indexed (no vertices, no faces in face mode, bad face indices)
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Requested subdivision depth is beyond what the builder supports
    #[error("Invalid depth: {requested} exceeds the supported maximum of {max}")]
    InvalidDepth {
        /// Depth that was asked for
        requested: u32,
        /// Largest accepted depth
        max: u32,
    },

    /// Ray direction has zero length or non-finite components
    #[error("Degenerate ray direction: {0:?}")]
    DegenerateRay(Vec3),
}
