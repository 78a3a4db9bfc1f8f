//! Vertex normal generation with feature-angle edge preservation

use neuroview_core::{SurfaceMesh, Vector3f};

/// Recompute vertex normals for shading.
///
/// Normals are area-weighted averages of the adjacent face normals.
/// A face whose normal deviates from the vertex's averaged normal by
/// more than `feature_angle_deg` is excluded from that vertex's
/// average, so sharp creases stay sharp instead of being shaded away.
/// Vertices and faces are returned untouched.
pub fn compute_normals(mesh: &SurfaceMesh, feature_angle_deg: f32) -> SurfaceMesh {
    let mut out = mesh.clone();
    if mesh.is_empty() {
        out.normals = None;
        return out;
    }

    // Unnormalized cross products weight each face by its area
    let weighted: Vec<Vector3f> = mesh
        .faces
        .iter()
        .map(|face| {
            let v0 = mesh.vertices[face[0]];
            let v1 = mesh.vertices[face[1]];
            let v2 = mesh.vertices[face[2]];
            (v1 - v0).cross(&(v2 - v0))
        })
        .collect();

    let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); mesh.vertices.len()];
    for (fi, face) in mesh.faces.iter().enumerate() {
        for &v in face {
            vertex_faces[v].push(fi);
        }
    }

    let cos_threshold = feature_angle_deg.to_radians().cos();
    let mut normals = Vec::with_capacity(mesh.vertices.len());

    for faces in &vertex_faces {
        let initial = average_normal(faces, &weighted);

        // Second pass drops faces across a feature edge
        let kept: Vec<usize> = faces
            .iter()
            .filter(|&&fi| {
                let n = weighted[fi];
                n.norm() > 1e-12 && n.normalize().dot(&initial) >= cos_threshold
            })
            .copied()
            .collect();

        if kept.is_empty() {
            normals.push(initial);
        } else {
            normals.push(average_normal(&kept, &weighted));
        }
    }

    out.set_normals(normals);
    out
}

fn average_normal(faces: &[usize], weighted: &[Vector3f]) -> Vector3f {
    let mut sum = Vector3f::zeros();
    for &fi in faces {
        sum += weighted[fi];
    }
    if sum.norm() > 1e-12 {
        sum.normalize()
    } else {
        Vector3f::z()
    }
}
