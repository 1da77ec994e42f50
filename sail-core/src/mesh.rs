//! Mesh input for building cloth bodies.
//!
//! A [`Mesh`] is exactly what [`crate::cloth::ClothBody::new`] consumes: a
//! flat coordinate buffer and 0-based faces. It can be parsed from the
//! plain-text OBJ subset used for sail models, or generated as a grid.

use crate::{error::ClothError, types::ParticleId};
use glam::Vec3;
use std::path::Path;
use tracing::debug;

/// Vertex coordinates (grouped in triples) plus polygon faces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub faces: Vec<Vec<usize>>,
}

impl Mesh {
    /// Parses the `v` and `f` records of an OBJ-style text.
    ///
    /// - `v x y z` appends a vertex; extra coordinates are ignored.
    /// - `f a b c [d]` appends a face of 1-based indices, stored 0-based.
    ///   Tokens such as `3/1/2` use the leading vertex index.
    ///
    /// Comments, blank lines and every other record are skipped. Face
    /// indices are not range-checked here; the cloth builder does that.
    ///
    /// ### Errors
    /// [`ClothError::Parse`] with the 1-based line number for bad numbers,
    /// missing coordinates, empty faces or index `0`.
    pub fn parse_obj(text: &str) -> Result<Self, ClothError> {
        let mut mesh = Self::default();

        for (n, line) in text.lines().enumerate() {
            let line_no = n + 1;
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("v") => {
                    let coords = tokens
                        .take(3)
                        .map(|t| t.parse::<f32>().map_err(|e| parse_error(line_no, t, e)))
                        .collect::<Result<Vec<_>, _>>()?;
                    if coords.len() != 3 {
                        return Err(ClothError::Parse {
                            line: line_no,
                            reason: format!("vertex needs 3 coordinates, found {}", coords.len()),
                        });
                    }
                    mesh.vertices.extend(coords);
                }
                Some("f") => {
                    let face = tokens
                        .map(|t| parse_face_index(line_no, t))
                        .collect::<Result<Vec<_>, _>>()?;
                    if face.is_empty() {
                        return Err(ClothError::Parse {
                            line: line_no,
                            reason: "face has no indices".into(),
                        });
                    }
                    mesh.faces.push(face);
                }
                _ => {}
            }
        }

        debug!(
            vertices = mesh.vertex_count(),
            faces = mesh.faces.len(),
            "mesh parsed"
        );
        Ok(mesh)
    }

    /// Reads and parses an OBJ-style file. See [`Mesh::parse_obj`].
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClothError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::parse_obj(&text)
    }

    /// A flat `cols` x `rows` grid of quads in the x/y plane.
    ///
    /// Vertices are row-major starting at the origin, `spacing` apart.
    /// Quads are wound counter-clockwise seen from +z. Fewer than two
    /// columns or rows yields vertices but no faces.
    pub fn grid(cols: usize, rows: usize, spacing: f32) -> Self {
        let mut vertices = Vec::with_capacity(cols * rows * 3);
        for j in 0..rows {
            for i in 0..cols {
                vertices.extend([i as f32 * spacing, j as f32 * spacing, 0.0]);
            }
        }

        let mut faces = Vec::with_capacity(cols.saturating_sub(1) * rows.saturating_sub(1));
        for j in 0..rows.saturating_sub(1) {
            for i in 0..cols.saturating_sub(1) {
                let a = j * cols + i;
                let d = (j + 1) * cols + i;
                faces.push(vec![a, a + 1, d + 1, d]);
            }
        }

        Self { vertices, faces }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Position of vertex `id`.
    ///
    /// ### Panics
    /// Panics if `id` is out of range.
    pub fn vertex(&self, id: ParticleId) -> Vec3 {
        Vec3::from_slice(&self.vertices[id * 3..id * 3 + 3])
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.vertices.chunks_exact(3).map(Vec3::from_slice);
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

fn parse_face_index(line: usize, token: &str) -> Result<usize, ClothError> {
    let head = token.split('/').next().unwrap_or(token);
    let index: usize = head.parse().map_err(|e| parse_error(line, token, e))?;
    index.checked_sub(1).ok_or_else(|| ClothError::Parse {
        line,
        reason: "face indices are 1-based".into(),
    })
}

fn parse_error(line: usize, token: &str, err: impl std::fmt::Display) -> ClothError {
    ClothError::Parse {
        line,
        reason: format!("invalid number {token:?}: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAIL: &str = "\
# tiny sail
o Sail
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 2.0 0.5
v 0.0 2.0 0.0

vn 0 0 1
f 1 2 3 4
f 1/1/1 3/3/1 4/4/1
";

    #[test]
    fn parses_vertices_and_converts_faces_to_zero_based() {
        let mesh = Mesh::parse_obj(SAIL).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.vertex(2), Vec3::new(1.0, 2.0, 0.5));
        assert_eq!(mesh.faces, vec![vec![0, 1, 2, 3], vec![0, 2, 3]]);
    }

    #[test]
    fn reports_line_of_bad_coordinate() {
        let err = Mesh::parse_obj("v 0 0 0\nv 1 x 0\n").unwrap_err();
        assert!(matches!(err, ClothError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn rejects_short_vertices_zero_indices_and_empty_faces() {
        assert!(matches!(
            Mesh::parse_obj("v 1 2\n"),
            Err(ClothError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            Mesh::parse_obj("v 0 0 0\nf 0 1 2\n"),
            Err(ClothError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            Mesh::parse_obj("f\n"),
            Err(ClothError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn grid_builds_counter_clockwise_quads() {
        let mesh = Mesh::grid(3, 2, 0.5);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.vertex(4), Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(mesh.faces, vec![vec![0, 1, 4, 3], vec![1, 2, 5, 4]]);
    }

    #[test]
    fn degenerate_grid_has_no_faces() {
        let mesh = Mesh::grid(1, 4, 1.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.faces.is_empty());
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mesh = Mesh::parse_obj(SAIL).unwrap();
        assert_eq!(mesh.bounds(), Some((Vec3::ZERO, Vec3::new(1.0, 2.0, 0.5))));
        assert_eq!(Mesh::default().bounds(), None);
    }

    #[test]
    fn load_reports_missing_files() {
        let err = Mesh::load("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, ClothError::Io { .. }));
    }
}
