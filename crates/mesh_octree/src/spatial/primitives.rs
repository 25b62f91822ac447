//! Primitive query shapes
//!
//! Rays for picking and altitude probes, triangles for face-indexed trees.

use crate::foundation::math::{self, Vec3};
use super::OctreeError;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized by the constructors)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// The direction is normalized. A zero-length direction yields a ray with
    /// undefined query results; use [`Ray::try_new`] for untrusted input.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Creates a ray, rejecting zero-length or non-finite directions
    pub fn try_new(origin: Vec3, direction: Vec3) -> Result<Self, OctreeError> {
        if !math::is_finite(&direction) {
            return Err(OctreeError::DegenerateRay(direction));
        }
        direction
            .try_normalize(f32::EPSILON)
            .map(|direction| Self { origin, direction })
            .ok_or(OctreeError::DegenerateRay(direction))
    }

    /// Ray pointing straight down (-Y) from `origin`
    pub fn downward(origin: Vec3) -> Self {
        Self {
            origin,
            direction: -Vec3::y(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A triangle read from a mesh face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub const fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// The three corners in winding order
    pub const fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_new_normalizes() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 3.0, 4.0));
        assert_relative_eq!(ray.direction, Vec3::new(0.0, 0.6, 0.8), epsilon = 1e-6);
        assert_relative_eq!(ray.point_at(5.0), Vec3::new(0.0, 3.0, 4.0), epsilon = 1e-5);
    }

    #[test]
    fn test_ray_try_new_rejects_degenerate_direction() {
        assert_eq!(
            Ray::try_new(Vec3::zeros(), Vec3::zeros()),
            Err(OctreeError::DegenerateRay(Vec3::zeros()))
        );
        assert!(Ray::try_new(Vec3::zeros(), Vec3::new(f32::NAN, 1.0, 0.0)).is_err());
        assert!(Ray::try_new(Vec3::zeros(), Vec3::new(0.0, 0.0, -2.0)).is_ok());
    }

    #[test]
    fn test_downward_ray() {
        let ray = Ray::downward(Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(ray.direction, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(ray.point_at(4.0), Vec3::new(1.0, 6.0, 1.0));
    }

    #[test]
    fn test_triangle_vertices() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
        );
        assert_eq!(tri.vertices()[1], Vec3::new(3.0, 0.0, 0.0));
    }
}
