use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::math::Vec3;
use crate::spatial::{IndexMode, MeshSource, Octree, OctreeConfig, Ray, TriangleMesh, AABB};
use super::{all_nodes, random_box, random_mesh};

const SEEDS: [u64; 4] = [1, 7, 42, 1234];

#[test]
fn every_vertex_lands_in_exactly_one_leaf() {
    for seed in SEEDS {
        for max_depth in 0..=6 {
            let mesh = random_mesh(seed, 300, 50.0);
            let vertex_count = mesh.vertex_count();
            let octree = Octree::build(mesh, OctreeConfig::with_max_depth(max_depth)).unwrap();

            let mut owners: HashMap<usize, usize> = HashMap::new();
            octree.for_each_leaf(|leaf| {
                for &index in &leaf.points {
                    *owners.entry(index).or_default() += 1;
                }
            });

            assert_eq!(owners.len(), vertex_count, "seed {seed} depth {max_depth}");
            assert!(owners.values().all(|&count| count == 1), "seed {seed} depth {max_depth}");
        }
    }
}

#[test]
fn nodes_contain_their_points_and_refine_their_parent() {
    for seed in SEEDS {
        let config = OctreeConfig::with_max_depth(7);
        let octree = Octree::build(random_mesh(seed, 400, 20.0), config).unwrap();
        let mesh = octree.mesh().unwrap();
        let root = octree.root().unwrap();

        assert_eq!(root.points, (0..mesh.vertex_count()).collect::<Vec<_>>());

        for node in all_nodes(root) {
            assert!(!node.points.is_empty());
            assert!(node.children.len() <= 8);
            for &index in &node.points {
                assert!(node.bounds.contains_point(mesh.vertex(index)));
            }
            for child in &node.children {
                assert_eq!(child.depth, node.depth + 1);
                assert!(child.points.iter().all(|index| node.points.contains(index)));
            }
        }
    }
}

#[test]
fn leaves_respect_the_depth_bound() {
    for seed in SEEDS {
        for max_depth in [0, 1, 3, 5] {
            let config = OctreeConfig::with_max_depth(max_depth);
            let octree = Octree::build(random_mesh(seed, 500, 10.0), config).unwrap();

            octree.for_each_leaf(|leaf| assert!(leaf.depth <= max_depth));
            assert!(octree.stats().depth <= max_depth);

            // Only leaves stopped by the depth bound may hold several points
            octree.for_each_leaf(|leaf| {
                if leaf.points.len() > 1 {
                    assert_eq!(leaf.depth, max_depth);
                }
            });
        }
    }
}

#[test]
fn subdivision_tiles_the_parent() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..50 {
        let parent = random_box(&mut rng, 100.0);
        let children = parent.subdivide8();

        let union = AABB::from_points(children.iter().flat_map(|c| [c.min, c.max])).unwrap();
        assert_eq!(union, parent);

        for (i, a) in children.iter().enumerate() {
            assert!(parent.contains_point(a.min) && parent.contains_point(a.max));
            for b in &children[i + 1..] {
                // Shared faces only: the overlap has no volume
                let overlap = a.max.inf(&b.max) - a.min.sup(&b.min);
                assert!(overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0);
            }
        }

        // Any interior point falls in some child
        for _ in 0..20 {
            let p = Vec3::new(
                rng.gen_range(parent.min.x..=parent.max.x),
                rng.gen_range(parent.min.y..=parent.max.y),
                rng.gen_range(parent.min.z..=parent.max.z),
            );
            assert!(children.iter().any(|c| c.contains_point(p)));
        }
    }
}

#[test]
fn ray_query_returns_a_leaf_exactly_when_a_leaf_box_is_hit() {
    let mut rng = StdRng::seed_from_u64(2024);
    for seed in SEEDS {
        let config = OctreeConfig::with_max_depth(5);
        let octree = Octree::build(random_mesh(seed, 200, 30.0), config).unwrap();
        let root_bounds = octree.root().unwrap().bounds;
        let leaves = octree.leaves();

        for _ in 0..200 {
            let origin = Vec3::new(
                rng.gen_range(-60.0..60.0),
                rng.gen_range(-60.0..60.0),
                rng.gen_range(-60.0..60.0),
            );
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let Ok(ray) = Ray::try_new(origin, direction) else {
                continue;
            };

            let any_leaf_hit = leaves
                .iter()
                .any(|leaf| leaf.bounds.intersect_ray_range(&ray, 0.0, f32::INFINITY));

            match octree.query_ray(&ray) {
                Some(leaf) => {
                    assert!(leaf.is_leaf());
                    assert!(leaf.bounds.intersect_ray_range(&ray, 0.0, f32::INFINITY));
                }
                None => assert!(!any_leaf_hit),
            }
            assert_eq!(octree.query_ray(&ray).is_some(), any_leaf_hit);

            if !root_bounds.intersect_ray_range(&ray, 0.0, f32::INFINITY) {
                assert!(octree.query_ray(&ray).is_none());
            }

            if let Some((nearest, entry)) = octree.query_ray_nearest(&ray) {
                assert!(nearest.is_leaf());
                for leaf in &leaves {
                    if let Some(t) = leaf.bounds.intersect_ray(&ray) {
                        assert!(entry <= t);
                    }
                }
            } else {
                assert!(!any_leaf_hit);
            }
        }
    }
}

#[test]
fn ray_hitting_a_root_only_tree_returns_the_root() {
    let octree = Octree::build(random_mesh(5, 50, 10.0), OctreeConfig::with_max_depth(0)).unwrap();
    let ray = Ray::new(Vec3::new(-40.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

    let hit = octree.query_ray(&ray).unwrap();
    assert_eq!(hit.depth, 0);
    assert_eq!(hit.points.len(), 50);
}

#[test]
fn box_query_returns_exactly_the_overlapping_leaves() {
    let mut rng = StdRng::seed_from_u64(77);
    for seed in SEEDS {
        let config = OctreeConfig::with_max_depth(6);
        let octree = Octree::build(random_mesh(seed, 250, 25.0), config).unwrap();
        let leaves = octree.leaves();

        for _ in 0..100 {
            let probe = random_box(&mut rng, 25.0);
            let expected: Vec<AABB> = leaves
                .iter()
                .filter(|leaf| leaf.bounds.intersects(&probe))
                .map(|leaf| leaf.bounds)
                .collect();

            assert_eq!(octree.query_box(&probe), expected);
        }
    }
}

#[test]
fn face_mode_leaves_hold_whole_faces_once() {
    let mesh =
        TriangleMesh::height_field(12, 9, 1.5, |x, z| (x * 0.4).sin() * 2.0 + (z * 0.3).cos());
    let face_count = mesh.face_count();
    let config = OctreeConfig::with_max_depth(5).index_mode(IndexMode::Faces);
    let octree = Octree::build(mesh, config).unwrap();
    let mesh = octree.mesh().unwrap();

    let mut seen = vec![0usize; face_count];
    octree.for_each_leaf(|leaf| {
        for &face in &leaf.points {
            assert!(leaf.bounds.contains_triangle(&mesh.triangle(face)));
            seen[face] += 1;
        }
    });
    assert!(seen.iter().all(|&count| count <= 1));

    for node in all_nodes(octree.root().unwrap()) {
        for &face in &node.points {
            assert!(node.bounds.contains_triangle(&mesh.triangle(face)));
        }
    }
}
