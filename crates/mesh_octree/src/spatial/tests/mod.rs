//! Cross-cutting checks over whole trees
//!
//! Module-level tests live beside their code; these exercise the builder and
//! the query engine together on randomized meshes.

mod properties;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::math::Vec3;
use super::{OctreeNode, TriangleMesh};

/// Random point cloud inside `[-extent, extent]^3`
fn random_mesh(seed: u64, count: usize, extent: f32) -> TriangleMesh {
    let mut rng = StdRng::seed_from_u64(seed);
    let positions = (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-extent..=extent),
                rng.gen_range(-extent..=extent),
                rng.gen_range(-extent..=extent),
            )
        })
        .collect();
    TriangleMesh::from_vertices(positions)
}

/// Random box somewhere around `[-extent, extent]^3`
fn random_box(rng: &mut StdRng, extent: f32) -> super::AABB {
    let a = Vec3::new(
        rng.gen_range(-1.5 * extent..1.5 * extent),
        rng.gen_range(-1.5 * extent..1.5 * extent),
        rng.gen_range(-1.5 * extent..1.5 * extent),
    );
    let size = Vec3::new(
        rng.gen_range(0.0..extent),
        rng.gen_range(0.0..extent),
        rng.gen_range(0.0..extent),
    );
    super::AABB::new(a, a + size)
}

/// Every node of the subtree, parents before children
fn all_nodes(root: &OctreeNode) -> Vec<&OctreeNode> {
    let mut nodes = vec![root];
    let mut next = 0;
    while next < nodes.len() {
        let node = nodes[next];
        nodes.extend(node.children.iter());
        next += 1;
    }
    nodes
}
