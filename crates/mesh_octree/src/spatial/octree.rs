//! Octree spatial partitioning structure
//!
//! Indexes a static triangle mesh for ray picking and box collision. The tree
//! is built once from the mesh bounds: every node splits into eight octants
//! and hands each of its elements to the first octant that contains it.
//! Octants that receive nothing are dropped, so a node keeps between zero
//! and eight children. Splitting stops at the configured depth, at nodes
//! holding a single element, and at nodes whose elements all coincide.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::time::Stopwatch;
use super::mesh::{self, MeshSource, TriangleMesh};
use super::{OctreeError, AABB};

/// Deepest subdivision the builder accepts
pub const MAX_DEPTH: u32 = 16;

/// Which mesh elements the octree indexes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMode {
    /// Node point lists hold vertex indices
    #[default]
    Vertices,
    /// Node point lists hold face indices; a face belongs to a box only when
    /// all three corners are inside it
    Faces,
}

/// Configuration for octree behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Maximum subdivision depth (0 = root only)
    pub max_depth: u32,

    /// Elements stored in node point lists
    pub index_mode: IndexMode,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            index_mode: IndexMode::Vertices,
        }
    }
}

impl OctreeConfig {
    /// Vertex-indexed configuration with the given depth
    pub fn with_max_depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Same configuration indexing `index_mode` elements
    #[must_use]
    pub const fn index_mode(mut self, index_mode: IndexMode) -> Self {
        self.index_mode = index_mode;
        self
    }

    /// Check the depth against [`MAX_DEPTH`]
    pub const fn validate(&self) -> Result<(), OctreeError> {
        if self.max_depth > MAX_DEPTH {
            return Err(OctreeError::InvalidDepth {
                requested: self.max_depth,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }
}

impl Config for OctreeConfig {}

/// Single node in the octree hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct OctreeNode {
    /// World-space bounds of this node
    pub bounds: AABB,

    /// Indices of the mesh elements inside `bounds`
    pub points: Vec<usize>,

    /// Non-empty child octants in subdivision order; empty for a leaf
    pub children: Vec<OctreeNode>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl OctreeNode {
    /// Create a new leaf node
    pub const fn new(bounds: AABB, points: Vec<usize>, depth: u32) -> Self {
        Self {
            bounds,
            points,
            children: Vec::new(),
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Split this node and recurse into children that can still be refined
    fn subdivide<M: MeshSource + ?Sized>(&mut self, mesh: &M, mode: IndexMode, max_depth: u32) {
        if self.depth >= max_depth {
            return;
        }

        let mut unclaimed = self.points.clone();
        for child_bounds in self.bounds.subdivide8() {
            if unclaimed.is_empty() {
                break;
            }

            let claimed = elements_in_box(mesh, mode, &unclaimed, &child_bounds);
            if claimed.is_empty() {
                continue;
            }
            remove_claimed(&mut unclaimed, &claimed);

            let mut child = OctreeNode::new(child_bounds, claimed, self.depth + 1);
            if child.points.len() > 1 && !elements_coincide(mesh, mode, &child.points) {
                child.subdivide(mesh, mode, max_depth);
            }
            self.children.push(child);
        }

        if !unclaimed.is_empty() {
            log::debug!(
                "{} element(s) at depth {} fit no child octant and stay on the internal node",
                unclaimed.len(),
                self.depth
            );
        }
    }
}

fn elements_in_box<M: MeshSource + ?Sized>(
    mesh: &M,
    mode: IndexMode,
    candidates: &[usize],
    bounds: &AABB,
) -> Vec<usize> {
    match mode {
        IndexMode::Vertices => mesh::points_in_box(mesh, candidates, bounds),
        IndexMode::Faces => mesh::faces_in_box(mesh, candidates, bounds),
    }
}

/// Drop `claimed` (an ordered subsequence of `unclaimed`) from `unclaimed`
fn remove_claimed(unclaimed: &mut Vec<usize>, claimed: &[usize]) {
    let mut claimed = claimed.iter().peekable();
    unclaimed.retain(|index| {
        if claimed.peek() == Some(&index) {
            claimed.next();
            false
        } else {
            true
        }
    });
}

/// True when every element sits at the same position, so splitting cannot separate them
fn elements_coincide<M>(mesh: &M, mode: IndexMode, elements: &[usize]) -> bool
where
    M: MeshSource + ?Sized,
{
    match mode {
        IndexMode::Vertices => {
            let first = mesh.vertex(elements[0]);
            elements[1..].iter().all(|&i| mesh.vertex(i) == first)
        }
        IndexMode::Faces => {
            let first = mesh.triangle(elements[0]);
            elements[1..].iter().all(|&f| mesh.triangle(f) == first)
        }
    }
}

/// Summary of a built tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OctreeStats {
    /// Total nodes including the root
    pub node_count: usize,
    /// Nodes without children
    pub leaf_count: usize,
    /// Depth of the deepest leaf
    pub depth: u32,
    /// Wall-clock time spent building
    pub build_time: Duration,
}

/// Octree spatial index over a mesh
///
/// Starts unbuilt when created with [`Octree::new`]; queries on an unbuilt
/// tree report no match. [`Octree::create`] builds or rebuilds it in place.
#[derive(Debug, Clone)]
pub struct Octree<M = TriangleMesh> {
    root: Option<OctreeNode>,
    mesh: Option<M>,
    config: OctreeConfig,
    stats: OctreeStats,
}

impl<M: MeshSource> Octree<M> {
    /// Create an unbuilt octree
    pub fn new(config: OctreeConfig) -> Result<Self, OctreeError> {
        config.validate()?;
        Ok(Self {
            root: None,
            mesh: None,
            config,
            stats: OctreeStats::default(),
        })
    }

    /// Build an octree over `mesh`
    pub fn build(mesh: M, config: OctreeConfig) -> Result<Self, OctreeError> {
        let mut octree = Self::new(config)?;
        octree.create(mesh)?;
        Ok(octree)
    }

    /// Build the tree over `mesh`, replacing any previous tree
    ///
    /// On error the previous tree is left untouched.
    pub fn create(&mut self, mesh: M) -> Result<&OctreeNode, OctreeError> {
        let stopwatch = Stopwatch::start_new();

        let bounds = mesh::mesh_bounds(&mesh)?;
        let element_count = match self.config.index_mode {
            IndexMode::Vertices => mesh.vertex_count(),
            IndexMode::Faces => mesh.face_count(),
        };
        if element_count == 0 {
            return Err(OctreeError::InvalidMesh(format!(
                "no elements to index in {:?} mode",
                self.config.index_mode
            )));
        }

        let mut root = OctreeNode::new(bounds, (0..element_count).collect(), 0);
        if element_count > 1 {
            root.subdivide(&mesh, self.config.index_mode, self.config.max_depth);
        }

        let stats = OctreeStats {
            node_count: root.count_nodes(),
            leaf_count: root.count_leaves(),
            depth: root.max_leaf_depth(),
            build_time: stopwatch.elapsed(),
        };
        log::info!(
            "Built octree over {} {:?} element(s): {} nodes, {} leaves, depth {}/{} in {:.2} ms",
            element_count,
            self.config.index_mode,
            stats.node_count,
            stats.leaf_count,
            stats.depth,
            self.config.max_depth,
            stats.build_time.as_secs_f32() * 1000.0
        );

        self.mesh = Some(mesh);
        self.stats = stats;
        Ok(self.root.insert(root))
    }

    /// Root node, `None` until built
    pub const fn root(&self) -> Option<&OctreeNode> {
        self.root.as_ref()
    }

    /// Mesh the tree was built from
    pub const fn mesh(&self) -> Option<&M> {
        self.mesh.as_ref()
    }

    /// Whether a tree has been built
    pub const fn is_built(&self) -> bool {
        self.root.is_some()
    }

    /// Configuration in use
    pub const fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Statistics of the last successful build
    pub const fn stats(&self) -> &OctreeStats {
        &self.stats
    }
}
