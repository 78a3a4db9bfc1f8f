//! Laplacian mesh smoothing
//!
//! Each iteration relaxes every vertex a small step toward the
//! centroid of its edge-connected neighbors. The iteration count is
//! the live-tunable "smoothness" parameter; vertex and face counts
//! are never changed, so the stage can be re-run freely from a cached
//! upstream mesh.

use neuroview_core::{Point3f, SurfaceMesh};

/// Per-iteration relaxation step toward the neighborhood centroid.
/// Small steps over many iterations keep the shape stable across the
/// whole 100..=1000 smoothness range.
const RELAXATION: f32 = 0.01;

/// Smooth a mesh with the given number of Laplacian iterations.
///
/// `iterations == 0` returns an exact copy. Stale normals are not
/// carried over; the normals stage runs after smoothing.
pub fn smooth(mesh: &SurfaceMesh, iterations: usize) -> SurfaceMesh {
    if iterations == 0 || mesh.is_empty() {
        let mut out = mesh.clone();
        out.normals = None;
        return out;
    }

    let neighbors = vertex_neighbors(mesh);
    let mut positions = mesh.vertices.clone();
    let mut next = positions.clone();

    for _ in 0..iterations {
        for (i, nbrs) in neighbors.iter().enumerate() {
            if nbrs.is_empty() {
                next[i] = positions[i];
                continue;
            }
            let mut sum = nalgebra::Vector3::zeros();
            for &n in nbrs {
                sum += positions[n].coords;
            }
            let centroid = sum / nbrs.len() as f32;
            next[i] = Point3f::from(
                positions[i].coords + (centroid - positions[i].coords) * RELAXATION,
            );
        }
        std::mem::swap(&mut positions, &mut next);
    }

    SurfaceMesh::from_vertices_and_faces(positions, mesh.faces.clone())
}

/// Unique edge-connected neighbors per vertex.
fn vertex_neighbors(mesh: &SurfaceMesh) -> Vec<Vec<usize>> {
    let mut neighbors = vec![Vec::new(); mesh.vertices.len()];
    for face in &mesh.faces {
        for i in 0..3 {
            let a = face[i];
            let b = face[(i + 1) % 3];
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
    }
    for list in &mut neighbors {
        list.sort_unstable();
        list.dedup();
    }
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn noisy_grid(size: usize) -> SurfaceMesh {
        let mut vertices = Vec::new();
        for y in 0..size {
            for x in 0..size {
                // Deterministic "noise" in z
                let bump = if (x + y) % 2 == 0 { 0.2 } else { -0.2 };
                vertices.push(Point3::new(x as f32, y as f32, bump));
            }
        }
        let mut faces = Vec::new();
        for y in 0..(size - 1) {
            for x in 0..(size - 1) {
                let tl = y * size + x;
                let tr = tl + 1;
                let bl = (y + 1) * size + x;
                let br = bl + 1;
                faces.push([tl, bl, tr]);
                faces.push([tr, bl, br]);
            }
        }
        SurfaceMesh::from_vertices_and_faces(vertices, faces)
    }

    fn roughness(mesh: &SurfaceMesh) -> f32 {
        mesh.vertices.iter().map(|v| v.z.abs()).sum::<f32>() / mesh.vertex_count() as f32
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let mesh = noisy_grid(5);
        let smoothed = smooth(&mesh, 0);
        assert_eq!(smoothed.vertices, mesh.vertices);
        assert_eq!(smoothed.faces, mesh.faces);
    }

    #[test]
    fn test_smoothing_preserves_counts() {
        let mesh = noisy_grid(6);
        let smoothed = smooth(&mesh, 100);
        assert_eq!(smoothed.vertex_count(), mesh.vertex_count());
        assert_eq!(smoothed.face_count(), mesh.face_count());
    }

    #[test]
    fn test_smoothing_is_repeatable() {
        let mesh = noisy_grid(6);
        let a = smooth(&mesh, 50);
        let b = smooth(&mesh, 50);
        assert_eq!(a.vertex_count(), b.vertex_count());
        assert_eq!(a.vertices, b.vertices);
    }

    #[test]
    fn test_smoothing_reduces_roughness() {
        let mesh = noisy_grid(8);
        let smoothed = smooth(&mesh, 200);
        assert!(roughness(&smoothed) < roughness(&mesh));
    }

    #[test]
    fn test_more_iterations_smooth_more() {
        let mesh = noisy_grid(8);
        let light = smooth(&mesh, 50);
        let heavy = smooth(&mesh, 500);
        assert!(roughness(&heavy) <= roughness(&light));
    }

    #[test]
    fn test_empty_mesh_passes_through() {
        let smoothed = smooth(&SurfaceMesh::new(), 100);
        assert!(smoothed.is_empty());
    }
}
