//! Mesh adapter
//!
//! The octree reads geometry through [`MeshSource`] so any vertex/face
//! container can be indexed. [`TriangleMesh`] is the owned implementation used
//! by the OBJ loader and the tests.

use crate::foundation::math::{self, Vec3};
use super::{OctreeError, Triangle, AABB};

/// Read-only view of an indexed triangle mesh
pub trait MeshSource {
    /// Number of vertex positions
    fn vertex_count(&self) -> usize;

    /// Position of vertex `index`
    fn vertex(&self, index: usize) -> Vec3;

    /// Number of triangular faces
    fn face_count(&self) -> usize;

    /// Position of corner `corner` (0..3) of face `face`
    fn face_vertex(&self, face: usize, corner: usize) -> Vec3;

    /// The three corners of face `face`
    fn triangle(&self, face: usize) -> Triangle {
        Triangle::new(
            self.face_vertex(face, 0),
            self.face_vertex(face, 1),
            self.face_vertex(face, 2),
        )
    }
}

impl<M: MeshSource + ?Sized> MeshSource for &M {
    fn vertex_count(&self) -> usize {
        (**self).vertex_count()
    }

    fn vertex(&self, index: usize) -> Vec3 {
        (**self).vertex(index)
    }

    fn face_count(&self) -> usize {
        (**self).face_count()
    }

    fn face_vertex(&self, face: usize, corner: usize) -> Vec3 {
        (**self).face_vertex(face, corner)
    }
}

/// Owned triangle mesh with shared vertex positions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Create a mesh, checking that every face index refers to a vertex
    pub fn new(positions: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self, OctreeError> {
        let vertex_count = positions.len();
        if let Some((face, _)) = faces
            .iter()
            .enumerate()
            .find(|(_, face)| face.iter().any(|&i| i as usize >= vertex_count))
        {
            return Err(OctreeError::InvalidMesh(format!(
                "face {face} references a vertex outside 0..{vertex_count}"
            )));
        }

        Ok(Self { positions, faces })
    }

    /// Point cloud without faces
    pub const fn from_vertices(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            faces: Vec::new(),
        }
    }

    /// Regular grid in the xz plane, heights taken from `height(x, z)`
    ///
    /// `cols` x `rows` vertices spaced `spacing` apart starting at the origin,
    /// two triangles per grid cell.
    pub fn height_field(
        cols: usize,
        rows: usize,
        spacing: f32,
        height: impl Fn(f32, f32) -> f32,
    ) -> Self {
        let mut positions = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let x = col as f32 * spacing;
                let z = row as f32 * spacing;
                positions.push(Vec3::new(x, height(x, z), z));
            }
        }

        let mut faces = Vec::with_capacity(cols.saturating_sub(1) * rows.saturating_sub(1) * 2);
        for row in 1..rows {
            for col in 1..cols {
                let corner = |c: usize, r: usize| (r * cols + c) as u32;
                let (a, b) = (corner(col - 1, row - 1), corner(col, row - 1));
                let (c, d) = (corner(col, row), corner(col - 1, row));
                faces.push([a, b, c]);
                faces.push([a, c, d]);
            }
        }

        Self { positions, faces }
    }

    /// All vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// All faces as vertex index triples
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }
}

impl MeshSource for TriangleMesh {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn vertex(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face_vertex(&self, face: usize, corner: usize) -> Vec3 {
        self.positions[self.faces[face][corner] as usize]
    }
}

/// Tight bounding box of every vertex in the mesh
///
/// Every coordinate must be finite; a NaN or infinite vertex is rejected.
pub fn mesh_bounds<M: MeshSource + ?Sized>(mesh: &M) -> Result<AABB, OctreeError> {
    if let Some(index) = (0..mesh.vertex_count()).find(|&i| !math::is_finite(&mesh.vertex(i))) {
        return Err(OctreeError::InvalidMesh(format!(
            "vertex {index} has a non-finite coordinate: {:?}",
            mesh.vertex(index)
        )));
    }

    let bounds = AABB::from_points((0..mesh.vertex_count()).map(|i| mesh.vertex(i)))
        .ok_or_else(|| OctreeError::InvalidMesh("mesh has no vertices".to_string()))?;
    log::debug!("Mesh bounds over {} vertices: {:?}", mesh.vertex_count(), bounds);
    Ok(bounds)
}

/// Candidate vertex indices whose position lies inside `bounds`, in order
pub fn points_in_box<M>(mesh: &M, candidates: &[usize], bounds: &AABB) -> Vec<usize>
where
    M: MeshSource + ?Sized,
{
    candidates
        .iter()
        .copied()
        .filter(|&i| bounds.contains_point(mesh.vertex(i)))
        .collect()
}

/// Candidate face indices with all three corners inside `bounds`, in order
pub fn faces_in_box<M>(mesh: &M, candidates: &[usize], bounds: &AABB) -> Vec<usize>
where
    M: MeshSource + ?Sized,
{
    candidates
        .iter()
        .copied()
        .filter(|&f| bounds.contains_triangle(&mesh.triangle(f)))
        .collect()
}
