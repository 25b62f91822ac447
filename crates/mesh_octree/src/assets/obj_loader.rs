//! OBJ file loader for triangle meshes
//!
//! Only geometry is read: `v` positions and `f` faces. Texture coordinates,
//! normals, groups and materials are skipped, and faces keep pointing at the
//! shared position list so the octree can index vertices directly.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::spatial::TriangleMesh;

/// Errors raised while reading an OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A statement could not be parsed
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        message: String,
    },
    /// Well-formed text that does not describe a usable mesh
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl ObjError {
    fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }
}

/// Loader for Wavefront OBJ geometry
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return its triangle mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<TriangleMesh, ObjError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mesh = Self::parse_obj(BufReader::new(file))?;
        log::info!(
            "Loaded {}: {} vertices, {} faces",
            path.display(),
            mesh.positions().len(),
            mesh.faces().len()
        );
        Ok(mesh)
    }

    /// Parse OBJ text from any buffered reader
    ///
    /// Polygons with more than three corners are fan-triangulated.
    pub fn parse_obj<R: BufRead>(reader: R) -> Result<TriangleMesh, ObjError> {
        let mut positions = Vec::new();
        let mut faces = Vec::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = number + 1;
            let mut parts = line.split_whitespace();

            match parts.next() {
                Some("v") => {
                    let mut coord = |axis: &str| -> Result<f32, ObjError> {
                        parts
                            .next()
                            .ok_or_else(|| {
                                ObjError::parse(line_no, format!("missing vertex {axis}"))
                            })?
                            .parse()
                            .map_err(|_| ObjError::parse(line_no, format!("invalid vertex {axis}")))
                    };
                    let (x, y, z) = (coord("x")?, coord("y")?, coord("z")?);
                    positions.push(Vec3::new(x, y, z));
                }
                Some("f") => {
                    let corners = parts
                        .map(|token| resolve_index(token, positions.len(), line_no))
                        .collect::<Result<Vec<u32>, _>>()?;
                    if corners.len() < 3 {
                        return Err(ObjError::parse(line_no, "face needs at least three vertices"));
                    }

                    // Fan triangulation
                    for i in 1..corners.len() - 1 {
                        faces.push([corners[0], corners[i], corners[i + 1]]);
                    }
                }
                _ => {
                    // Comments, blank lines and unused statements
                }
            }
        }

        if positions.is_empty() {
            return Err(ObjError::InvalidFormat("No vertices found in OBJ file".to_string()));
        }

        log::debug!("Parsed OBJ: {} vertices, {} triangles", positions.len(), faces.len());
        TriangleMesh::new(positions, faces).map_err(|e| ObjError::InvalidFormat(e.to_string()))
    }
}

/// Turn a face corner token (`7`, `7/2`, `7//3`, `-1/...`) into a 0-based
/// position index
fn resolve_index(token: &str, vertex_count: usize, line_no: usize) -> Result<u32, ObjError> {
    let position = token.split('/').next().unwrap_or_default();
    let raw: i64 = position
        .parse()
        .map_err(|_| ObjError::parse(line_no, format!("invalid position index '{token}'")))?;

    // Positive indices are 1-based, negative ones count back from the last vertex
    let resolved = match raw {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => i64::try_from(vertex_count).ok().map(|count| count + i),
    };

    resolved
        .filter(|&i| i >= 0 && usize::try_from(i).is_ok_and(|i| i < vertex_count))
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| {
            ObjError::InvalidFormat(format!(
                "Position index {raw} out of bounds on line {line_no} ({vertex_count} vertices)"
            ))
        })
}
