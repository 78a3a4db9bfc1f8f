//! Triangle stripping
//!
//! Reorganizes a triangle soup into shared-edge strips, the
//! rendering-friendly primitive layout. This is purely a
//! representation change: vertex data is reused as-is and decoding
//! the strips yields exactly the input triangles.

use std::collections::HashMap;

use neuroview_core::{StripMesh, SurfaceMesh};

/// Convert a mesh into triangle strips.
pub fn strip(mesh: &SurfaceMesh) -> StripMesh {
    let mut edge_faces: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (fi, face) in mesh.faces.iter().enumerate() {
        for i in 0..3 {
            let a = face[i];
            let b = face[(i + 1) % 3];
            edge_faces.entry(ordered(a, b)).or_default().push(fi);
        }
    }

    let mut used = vec![false; mesh.faces.len()];
    let mut strips: Vec<Vec<u32>> = Vec::new();

    for seed in 0..mesh.faces.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;

        let [a, b, c] = mesh.faces[seed];
        let mut strip = vec![a as u32, b as u32, c as u32];

        // Keep appending faces that share the strip's trailing edge
        // with the winding the strip position demands.
        loop {
            let n = strip.len();
            let u = strip[n - 2] as usize;
            let v = strip[n - 1] as usize;

            let Some(candidates) = edge_faces.get(&ordered(u, v)) else {
                break;
            };
            let next_index = n - 2; // triangle index after appending
            let mut appended = false;

            for &fi in candidates {
                if used[fi] {
                    continue;
                }
                let Some(w) = third_vertex(&mesh.faces[fi], u, v) else {
                    continue;
                };
                let decoded = if next_index % 2 == 0 {
                    [u, v, w]
                } else {
                    [v, u, w]
                };
                if cyclic_eq(&mesh.faces[fi], &decoded) {
                    strip.push(w as u32);
                    used[fi] = true;
                    appended = true;
                    break;
                }
            }

            if !appended {
                break;
            }
        }

        strips.push(strip);
    }

    StripMesh {
        vertices: mesh.vertices.clone(),
        normals: mesh.normals.clone(),
        strips,
    }
}

#[inline]
fn ordered(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

fn third_vertex(face: &[usize; 3], u: usize, v: usize) -> Option<usize> {
    let mut third = None;
    let mut seen_u = false;
    let mut seen_v = false;
    for &x in face {
        if x == u && !seen_u {
            seen_u = true;
        } else if x == v && !seen_v {
            seen_v = true;
        } else {
            third = Some(x);
        }
    }
    if seen_u && seen_v {
        third
    } else {
        None
    }
}

fn cyclic_eq(face: &[usize; 3], tri: &[usize; 3]) -> bool {
    (0..3).any(|r| face[r] == tri[0] && face[(r + 1) % 3] == tri[1] && face[(r + 2) % 3] == tri[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use neuroview_core::Point3f;
    use std::collections::HashSet;

    fn grid_mesh(size: usize) -> SurfaceMesh {
        let mut vertices = Vec::new();
        for y in 0..size {
            for x in 0..size {
                vertices.push(Point3::new(x as f32, y as f32, 0.0));
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

    fn canonical(tri: &[usize; 3]) -> [usize; 3] {
        // Rotate so the smallest index comes first, preserving winding
        let r = (0..3).min_by_key(|&r| tri[r]).unwrap();
        [tri[r], tri[(r + 1) % 3], tri[(r + 2) % 3]]
    }

    #[test]
    fn test_triangle_count_is_preserved() {
        let mesh = grid_mesh(6);
        let stripped = strip(&mesh);
        assert_eq!(stripped.triangle_count(), mesh.face_count());
    }

    #[test]
    fn test_vertices_are_untouched() {
        let mesh = grid_mesh(4);
        let stripped = strip(&mesh);
        assert_eq!(stripped.vertices, mesh.vertices);
    }

    #[test]
    fn test_decoded_triangles_match_input_windings() {
        let mesh = grid_mesh(5);
        let stripped = strip(&mesh);

        let original: HashSet<[usize; 3]> = mesh.faces.iter().map(canonical).collect();
        let decoded: HashSet<[usize; 3]> =
            stripped.triangles().iter().map(canonical).collect();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_strips_actually_merge_faces() {
        let mesh = grid_mesh(6);
        let stripped = strip(&mesh);
        // A grid strips well; anything close to one strip per face
        // would defeat the point.
        assert!(stripped.strips.len() < mesh.face_count());
    }

    #[test]
    fn test_single_triangle() {
        let mesh = SurfaceMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let stripped = strip(&mesh);
        assert_eq!(stripped.strips.len(), 1);
        assert_eq!(stripped.triangle_count(), 1);
        assert_eq!(stripped.triangles()[0], [0, 1, 2]);
    }

    #[test]
    fn test_empty_mesh() {
        let stripped = strip(&SurfaceMesh::new());
        assert!(stripped.is_empty());
        assert_eq!(stripped.triangle_count(), 0);
    }
}
