//! Surface mesh data structures

use crate::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};

/// A triangle mesh produced by surface extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
}

impl SurfaceMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// A mesh with no vertices or no faces carries no surface
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Set vertex normals; ignored unless one normal per vertex
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Calculate per-face normals
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        self.faces
            .iter()
            .map(|face| {
                let v0 = self.vertices[face[0]];
                let v1 = self.vertices[face[1]];
                let v2 = self.vertices[face[2]];

                let edge1 = v1 - v0;
                let edge2 = v2 - v0;

                edge1.cross(&edge2).normalize()
            })
            .collect()
    }
}

impl Default for SurfaceMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// A mesh reorganized into triangle strips for rendering.
///
/// Strips reference the same vertex data as the mesh they were built
/// from; converting to strips changes representation only, never
/// geometry. Triangle `i` of a strip `s` is `(s[i], s[i+1], s[i+2])`,
/// with every odd triangle's winding flipped back during decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripMesh {
    pub vertices: Vec<Point3f>,
    pub normals: Option<Vec<Vector3f>>,
    pub strips: Vec<Vec<u32>>,
}

impl StripMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Total number of triangles encoded across all strips
    pub fn triangle_count(&self) -> usize {
        self.strips.iter().map(|s| s.len().saturating_sub(2)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.strips.is_empty()
    }

    /// Expand back into a plain triangle mesh (for export).
    pub fn to_surface_mesh(&self) -> SurfaceMesh {
        let mut mesh = SurfaceMesh::from_vertices_and_faces(self.vertices.clone(), self.triangles());
        if let Some(normals) = &self.normals {
            mesh.set_normals(normals.clone());
        }
        mesh
    }

    /// Decode the strips back into individual triangles.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let mut out = Vec::with_capacity(self.triangle_count());
        for strip in &self.strips {
            for i in 0..strip.len().saturating_sub(2) {
                let (a, b, c) = (strip[i] as usize, strip[i + 1] as usize, strip[i + 2] as usize);
                // Odd triangles were stored with reversed winding
                if i % 2 == 0 {
                    out.push([a, b, c]);
                } else {
                    out.push([b, a, c]);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let mesh = SurfaceMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_face_normals() {
        let mesh = SurfaceMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let normals = mesh.calculate_face_normals();
        assert_eq!(normals.len(), 1);
        assert!((normals[0].z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_normals_requires_matching_length() {
        let mut mesh = SurfaceMesh::from_vertices_and_faces(
            vec![Point3f::origin(), Point3f::new(1.0, 0.0, 0.0)],
            vec![],
        );
        mesh.set_normals(vec![Vector3f::z()]);
        assert!(mesh.normals.is_none());
        mesh.set_normals(vec![Vector3f::z(), Vector3f::z()]);
        assert!(mesh.normals.is_some());
    }

    #[test]
    fn test_strip_triangle_decoding() {
        let strip = StripMesh {
            vertices: vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
            ],
            normals: None,
            strips: vec![vec![0, 1, 2, 3]],
        };
        assert_eq!(strip.triangle_count(), 2);
        let tris = strip.triangles();
        assert_eq!(tris[0], [0, 1, 2]);
        // Second triangle winding is flipped back
        assert_eq!(tris[1], [2, 1, 3]);
    }

    #[test]
    fn test_strip_expands_to_surface_mesh() {
        let strip = StripMesh {
            vertices: vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
            ],
            normals: Some(vec![Vector3f::z(); 4]),
            strips: vec![vec![0, 1, 2, 3]],
        };
        let mesh = strip.to_surface_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert!(mesh.normals.is_some());
    }
}
