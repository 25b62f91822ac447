//! Octree query engine
//!
//! Read-only descent over a built tree: ray picking, box overlap, leaf
//! enumeration and the per-level views used for visualization. Nothing here
//! mutates the tree, so queries can run from several threads at once.

use crate::foundation::math::Vec3;
use super::mesh::MeshSource;
use super::octree::{IndexMode, Octree, OctreeNode};
use super::{Ray, AABB};

impl OctreeNode {
    /// First leaf reached by `ray`, testing children in stored order
    ///
    /// This is a first-hit search: when several leaves lie along the ray the
    /// result is whichever the traversal order finds first, not necessarily
    /// the closest one. See [`OctreeNode::intersect_ray_nearest`].
    pub fn intersect_ray(&self, ray: &Ray) -> Option<&OctreeNode> {
        if !self.bounds.intersect_ray_range(ray, 0.0, f32::INFINITY) {
            return None;
        }

        if self.is_leaf() {
            return Some(self);
        }

        self.children.iter().find_map(|child| child.intersect_ray(ray))
    }

    /// Leaf with the smallest ray entry distance, with that distance
    pub fn intersect_ray_nearest(&self, ray: &Ray) -> Option<(&OctreeNode, f32)> {
        let entry = self.bounds.intersect_ray(ray)?;
        let mut best = None;
        self.nearest_leaf(ray, entry, &mut best);
        best
    }

    fn nearest_leaf<'a>(&'a self, ray: &Ray, entry: f32, best: &mut Option<(&'a OctreeNode, f32)>) {
        // A subtree cannot beat a leaf it enters after
        if matches!(*best, Some((_, best_t)) if entry >= best_t) {
            return;
        }

        if self.is_leaf() {
            *best = Some((self, entry));
            return;
        }

        for child in &self.children {
            if let Some(child_entry) = child.bounds.intersect_ray(ray) {
                child.nearest_leaf(ray, child_entry, best);
            }
        }
    }

    /// Append the box of every leaf under this node that overlaps `aabb`
    pub fn collect_overlapping_leaves(&self, aabb: &AABB, results: &mut Vec<AABB>) {
        if !self.bounds.intersects(aabb) {
            return;
        }

        for child in &self.children {
            child.collect_overlapping_leaves(aabb, results);
        }

        if self.is_leaf() {
            results.push(self.bounds);
        }
    }

    /// Visit every leaf depth-first in child order
    pub fn for_each_leaf<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a OctreeNode),
    {
        if self.is_leaf() {
            visit(self);
            return;
        }

        for child in &self.children {
            child.for_each_leaf(visit);
        }
    }

    /// Get all leaf nodes (for visualization)
    pub fn get_all_leaves<'a>(&'a self, leaves: &mut Vec<&'a OctreeNode>) {
        self.for_each_leaf(&mut |leaf| leaves.push(leaf));
    }

    /// Get all nodes at a specific depth (for visualization)
    pub fn get_nodes_at_depth<'a>(&'a self, target_depth: u32, nodes: &mut Vec<&'a OctreeNode>) {
        if self.depth == target_depth {
            nodes.push(self);
        } else if self.depth < target_depth {
            for child in &self.children {
                child.get_nodes_at_depth(target_depth, nodes);
            }
        }
    }

    /// Count this node and all descendants
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(OctreeNode::count_nodes).sum::<usize>()
    }

    /// Count leaves in this subtree
    pub fn count_leaves(&self) -> usize {
        let mut count = 0;
        self.for_each_leaf(&mut |_| count += 1);
        count
    }

    /// Depth of the deepest leaf in this subtree
    pub fn max_leaf_depth(&self) -> u32 {
        let mut deepest = self.depth;
        self.for_each_leaf(&mut |leaf| deepest = deepest.max(leaf.depth));
        deepest
    }
}

/// A mesh element picked by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPick {
    /// Index of the first element in the hit leaf
    pub index: usize,
    /// Vertex position (first corner of the face in face mode)
    pub position: Vec3,
    /// Bounds of the hit leaf
    pub leaf_bounds: AABB,
}

impl<M: MeshSource> Octree<M> {
    /// First-hit ray query; `None` when the ray misses or the tree is unbuilt
    pub fn query_ray(&self, ray: &Ray) -> Option<&OctreeNode> {
        let hit = self.root()?.intersect_ray(ray);
        log::trace!("Ray {:?} -> {:?}", ray, hit.map(|node| node.bounds));
        hit
    }

    /// Nearest-hit ray query: the leaf whose box the ray enters first
    ///
    /// Opt-in alternative to [`Octree::query_ray`], which stops at the first
    /// leaf in traversal order.
    pub fn query_ray_nearest(&self, ray: &Ray) -> Option<(&OctreeNode, f32)> {
        self.root()?.intersect_ray_nearest(ray)
    }

    /// Boxes of every leaf overlapping `aabb`
    pub fn query_box(&self, aabb: &AABB) -> Vec<AABB> {
        let mut results = Vec::new();
        if let Some(root) = self.root() {
            root.collect_overlapping_leaves(aabb, &mut results);
        }
        log::trace!("Box {:?} overlaps {} leaves", aabb, results.len());
        results
    }

    /// True when more than `threshold` leaf boxes overlap `aabb`
    pub fn collides(&self, aabb: &AABB, threshold: usize) -> bool {
        self.query_box(aabb).len() > threshold
    }

    /// Get all leaf nodes (for visualization)
    pub fn leaves(&self) -> Vec<&OctreeNode> {
        let mut leaves = Vec::new();
        if let Some(root) = self.root() {
            root.get_all_leaves(&mut leaves);
        }
        leaves
    }

    /// Visit every leaf depth-first
    pub fn for_each_leaf<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&'a OctreeNode),
    {
        if let Some(root) = self.root() {
            root.for_each_leaf(&mut visit);
        }
    }

    /// Number of leaves, zero when unbuilt
    pub fn leaf_count(&self) -> usize {
        self.root().map_or(0, OctreeNode::count_leaves)
    }

    /// Get all nodes at a specific depth (for visualization)
    pub fn nodes_at_depth(&self, depth: u32) -> Vec<&OctreeNode> {
        let mut nodes = Vec::new();
        if let Some(root) = self.root() {
            root.get_nodes_at_depth(depth, &mut nodes);
        }
        nodes
    }

    /// Node boxes grouped by depth, from the root down to `max_level`
    ///
    /// Levels below the deepest node come back empty.
    pub fn boxes_by_level(&self, max_level: u32) -> Vec<Vec<AABB>> {
        (0..=max_level)
            .map(|level| {
                self.nodes_at_depth(level)
                    .into_iter()
                    .map(|node| node.bounds)
                    .collect()
            })
            .collect()
    }

    /// Mesh element under the ray: the first element of the leaf
    /// [`Octree::query_ray`] returns
    ///
    /// In [`IndexMode::Faces`] only faces held by leaves can be picked. A face
    /// that straddles octants stays on an internal node and is never returned.
    pub fn pick_point(&self, ray: &Ray) -> Option<PointPick> {
        let leaf = self.query_ray(ray)?;
        let mesh = self.mesh()?;
        let index = *leaf.points.first()?;
        let position = match self.config().index_mode {
            IndexMode::Vertices => mesh.vertex(index),
            IndexMode::Faces => mesh.face_vertex(index, 0),
        };

        Some(PointPick {
            index,
            position,
            leaf_bounds: leaf.bounds,
        })
    }

    /// Distance from `position` to the mesh element picked straight below it
    pub fn altitude_above(&self, position: Vec3) -> Option<f32> {
        self.pick_point(&Ray::downward(position))
            .map(|pick| (position - pick.position).norm())
    }
}
