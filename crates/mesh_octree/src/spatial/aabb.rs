//! Axis-aligned bounding boxes
//!
//! Containment, overlap and slab ray tests, plus the eight-way split the
//! octree builder uses.

use crate::foundation::math::{self, Vec3};
use serde::{Deserialize, Serialize};
use super::{Ray, Triangle};

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from two opposite corners
    ///
    /// Corners are sorted per axis so `min <= max` always holds.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: math::component_min(&a, &b),
            max: math::component_max(&a, &b),
        }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self::new(center - extents, center + extents)
    }

    /// Tight box around a set of points, `None` when the set is empty
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (math::component_min(&min, &p), math::component_max(&max, &p))
        });
        Some(Self { min, max })
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    /// Full edge lengths of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        self.size() / 2.0
    }

    /// Check if this AABB contains a point (boundary-inclusive)
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if all three corners of a triangle are inside this AABB
    ///
    /// Conservative: a triangle that crosses the box with no corner inside
    /// is not counted. This is not an exact triangle-box intersection.
    pub fn contains_triangle(&self, triangle: &Triangle) -> bool {
        triangle.vertices().iter().all(|v| self.contains_point(*v))
    }

    /// Check if this AABB intersects another AABB (touching counts)
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Slab test of a ray against this box within `[t_min, t_max]`
    pub fn intersect_ray_range(&self, ray: &Ray, t_min: f32, t_max: f32) -> bool {
        self.ray_interval(ray, t_min, t_max).is_some()
    }

    /// Parametric entry distance of a ray over `[0, +inf)`, `None` on a miss
    ///
    /// Zero when the origin is already inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        self.ray_interval(ray, 0.0, f32::INFINITY).map(|(entry, _)| entry)
    }

    /// Surviving `[entry, exit]` interval of the slab method
    ///
    /// A zero direction component constrains nothing while the origin lies
    /// inside that slab and rejects the ray otherwise.
    fn ray_interval(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<(f32, f32)> {
        let mut t_min = t_min;
        let mut t_max = t_max;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir == 0.0 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let mut t0 = (lo - origin) / dir;
            let mut t1 = (hi - origin) / dir;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some((t_min, t_max))
    }

    /// Split into eight equal octants
    ///
    /// Order: the lower-y floor walks the xz footprint starting at the min
    /// corner, then `+x`, then `+z`, then `-x`; indices 4..8 repeat that walk
    /// on the upper-y floor. Corners come from the exact `{min, mid, max}`
    /// coordinates so the children tile the parent with no gaps.
    pub fn subdivide8(&self) -> [AABB; 8] {
        // (x half, z half) per footprint step
        const FOOTPRINT: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

        let mid = self.center();
        let xs = [self.min.x, mid.x, self.max.x];
        let ys = [self.min.y, mid.y, self.max.y];
        let zs = [self.min.z, mid.z, self.max.z];

        std::array::from_fn(|i| {
            let (xi, zi) = FOOTPRINT[i % 4];
            let yi = i / 4;
            AABB {
                min: Vec3::new(xs[xi], ys[yi], zs[zi]),
                max: Vec3::new(xs[xi + 1], ys[yi + 1], zs[zi + 1]),
            }
        })
    }
}
