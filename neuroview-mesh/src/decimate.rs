//! Topology-preserving mesh decimation
//!
//! Iterative edge collapse driven by quadric error metrics. Candidate
//! edges are kept in a priority queue ordered by collapse cost; a
//! link-condition check rejects any collapse that would produce
//! non-manifold topology. Malformed input does not fail the stage:
//! degenerate faces are dropped and reported as [`StageWarning`]s so
//! the caller can tell "no data" apart from "bad data".

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use nalgebra::{Matrix4, Vector4};
use neuroview_core::{Error, Point3f, Result, SurfaceMesh};
use priority_queue::PriorityQueue;

use crate::{MeshSimplifier, StageKind, StageWarning};

/// Output of the reduction stage: the reduced mesh plus any non-fatal
/// conditions met along the way.
#[derive(Debug, Clone)]
pub struct Decimated {
    pub mesh: SurfaceMesh,
    pub warnings: Vec<StageWarning>,
}

/// Edge collapse decimator with quadric error costs.
#[derive(Debug, Clone)]
pub struct EdgeCollapseDecimator {
    /// Reject collapses that would break manifoldness
    pub preserve_topology: bool,
}

impl Default for EdgeCollapseDecimator {
    fn default() -> Self {
        Self {
            preserve_topology: true,
        }
    }
}

/// Reduce with the default topology-preserving decimator.
pub fn decimate(mesh: &SurfaceMesh, target_reduction: f32) -> Result<Decimated> {
    EdgeCollapseDecimator::default().decimate(mesh, target_reduction)
}

impl EdgeCollapseDecimator {
    /// Collapse edges until the face count drops to
    /// `(1 - target_reduction) * initial`, or no valid collapse
    /// remains.
    pub fn decimate(&self, mesh: &SurfaceMesh, target_reduction: f32) -> Result<Decimated> {
        if !(0.0..=1.0).contains(&target_reduction) {
            return Err(Error::InvalidData(
                "Reduction ratio must be between 0.0 and 1.0".to_string(),
            ));
        }

        let mut warnings = Vec::new();
        if mesh.is_empty() {
            warnings.push(StageWarning::new(
                StageKind::Reduce,
                "input mesh is empty; nothing to reduce",
            ));
            return Ok(Decimated {
                mesh: mesh.clone(),
                warnings,
            });
        }
        if target_reduction == 0.0 {
            return Ok(Decimated {
                mesh: mesh.clone(),
                warnings,
            });
        }

        let (mut dm, dropped) = DecimationMesh::build(mesh);
        if dropped > 0 {
            warnings.push(StageWarning::new(
                StageKind::Reduce,
                format!("dropped {} degenerate input faces", dropped),
            ));
        }
        if dm.active_faces == 0 {
            warnings.push(StageWarning::new(
                StageKind::Reduce,
                "no valid faces after filtering input",
            ));
            return Ok(Decimated {
                mesh: SurfaceMesh::new(),
                warnings,
            });
        }

        let target_faces = ((1.0 - target_reduction) * dm.active_faces as f32) as usize;
        let mut queue = dm.build_queue();

        while dm.active_faces > target_faces {
            let Some(((a, b), _)) = queue.pop() else {
                break;
            };

            // Queue entries go stale as collapses proceed; validate
            if !dm.vertex_alive[a] || !dm.vertex_alive[b] {
                continue;
            }
            if dm.shared_faces(a, b).is_empty() {
                continue;
            }
            if self.preserve_topology && !dm.link_condition_ok(a, b) {
                continue;
            }

            let (position, _) = dm.collapse_cost(a, b);
            if dm.collapse(a, b, position) {
                // Refresh costs of the surviving vertex's edges
                for n in dm.neighbors(a) {
                    let key = (a.min(n), a.max(n));
                    let (p, cost) = dm.collapse_cost(key.0, key.1);
                    queue.push(key, EdgeCost { position: p, cost });
                }
            }
        }

        if dm.active_faces > target_faces {
            log::debug!(
                "decimation stopped early at {} faces (target {})",
                dm.active_faces,
                target_faces
            );
        }

        Ok(Decimated {
            mesh: dm.into_mesh(),
            warnings,
        })
    }
}

impl MeshSimplifier for EdgeCollapseDecimator {
    fn simplify(&self, mesh: &SurfaceMesh, reduction_ratio: f32) -> Result<SurfaceMesh> {
        let reduced = self.decimate(mesh, reduction_ratio)?;
        for w in &reduced.warnings {
            log::warn!("{}", w);
        }
        Ok(reduced.mesh)
    }
}

// ============================================================
// Edge cost ordering
// ============================================================

#[derive(Debug, Clone)]
struct EdgeCost {
    #[allow(dead_code)]
    position: Point3f,
    cost: f64,
}

impl PartialEq for EdgeCost {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal
    }
}
impl Eq for EdgeCost {}

impl PartialOrd for EdgeCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCost {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: smallest cost first
        other.cost.total_cmp(&self.cost)
    }
}

// ============================================================
// Working mesh
// ============================================================

struct DecimationMesh {
    positions: Vec<Point3f>,
    faces: Vec<[usize; 3]>,
    face_alive: Vec<bool>,
    vertex_faces: Vec<HashSet<usize>>,
    vertex_alive: Vec<bool>,
    quadrics: Vec<Matrix4<f64>>,
    active_faces: usize,
}

impl DecimationMesh {
    /// Build adjacency and quadrics; returns the count of dropped
    /// degenerate input faces alongside.
    fn build(mesh: &SurfaceMesh) -> (Self, usize) {
        let nv = mesh.vertices.len();
        let mut faces = Vec::with_capacity(mesh.faces.len());
        let mut vertex_faces = vec![HashSet::new(); nv];
        let mut dropped = 0usize;

        for face in &mesh.faces {
            let [a, b, c] = *face;
            if a >= nv || b >= nv || c >= nv || a == b || b == c || c == a {
                dropped += 1;
                continue;
            }
            let fi = faces.len();
            faces.push(*face);
            vertex_faces[a].insert(fi);
            vertex_faces[b].insert(fi);
            vertex_faces[c].insert(fi);
        }

        let active_faces = faces.len();
        let mut dm = Self {
            positions: mesh.vertices.clone(),
            face_alive: vec![true; faces.len()],
            faces,
            vertex_faces,
            vertex_alive: vec![true; nv],
            quadrics: vec![Matrix4::zeros(); nv],
            active_faces,
        };
        dm.initialize_quadrics();
        (dm, dropped)
    }

    fn initialize_quadrics(&mut self) {
        for fi in 0..self.faces.len() {
            let [a, b, c] = self.faces[fi];
            let plane = plane_of(&self.positions[a], &self.positions[b], &self.positions[c]);
            let q = plane_to_quadric(&plane);
            self.quadrics[a] += q;
            self.quadrics[b] += q;
            self.quadrics[c] += q;
        }
    }

    fn neighbors(&self, v: usize) -> HashSet<usize> {
        let mut out = HashSet::new();
        for &fi in &self.vertex_faces[v] {
            if !self.face_alive[fi] {
                continue;
            }
            for &u in &self.faces[fi] {
                if u != v {
                    out.insert(u);
                }
            }
        }
        out
    }

    /// Alive faces containing both endpoints of an edge.
    fn shared_faces(&self, a: usize, b: usize) -> Vec<usize> {
        self.vertex_faces[a]
            .iter()
            .filter(|&&fi| self.face_alive[fi] && self.vertex_faces[b].contains(&fi))
            .copied()
            .collect()
    }

    /// Link condition: the common neighbors of the edge's endpoints
    /// must be exactly the apex vertices of the faces on that edge
    /// (2 interior, 1 boundary). Anything more would pinch the mesh.
    fn link_condition_ok(&self, a: usize, b: usize) -> bool {
        let na = self.neighbors(a);
        let nb = self.neighbors(b);
        let common = na.intersection(&nb).count();
        common == self.shared_faces(a, b).len()
    }

    /// Optimal collapse position and its quadric cost.
    fn collapse_cost(&self, a: usize, b: usize) -> (Point3f, f64) {
        let q = self.quadrics[a] + self.quadrics[b];
        let q3 = q.fixed_view::<3, 3>(0, 0);
        let q1 = q.fixed_view::<3, 1>(0, 3);

        let optimal = if let Some(inv) = q3.try_inverse() {
            let p = -inv * q1;
            Point3f::new(p[0] as f32, p[1] as f32, p[2] as f32)
        } else {
            Point3f::from((self.positions[a].coords + self.positions[b].coords) * 0.5)
        };

        let vh = Vector4::new(optimal.x as f64, optimal.y as f64, optimal.z as f64, 1.0);
        let cost = (vh.transpose() * q * vh)[0].max(0.0);
        (optimal, cost)
    }

    /// Collapse edge (a, b), merging b into a at `position`.
    fn collapse(&mut self, a: usize, b: usize, position: Point3f) -> bool {
        let shared = self.shared_faces(a, b);
        if shared.is_empty() {
            return false;
        }

        for fi in shared {
            self.kill_face(fi);
        }

        // Re-point the remaining faces of b at a
        let moved: Vec<usize> = self.vertex_faces[b]
            .iter()
            .filter(|&&fi| self.face_alive[fi])
            .copied()
            .collect();
        for fi in moved {
            for slot in self.faces[fi].iter_mut() {
                if *slot == b {
                    *slot = a;
                }
            }
            let [p, q, r] = self.faces[fi];
            if p == q || q == r || r == p {
                // Collapse squeezed this face flat
                self.kill_face(fi);
            } else {
                self.vertex_faces[a].insert(fi);
            }
        }

        self.vertex_faces[b].clear();
        self.vertex_alive[b] = false;
        self.positions[a] = position;
        let qb = self.quadrics[b];
        self.quadrics[a] += qb;
        true
    }

    fn kill_face(&mut self, fi: usize) {
        if !self.face_alive[fi] {
            return;
        }
        self.face_alive[fi] = false;
        self.active_faces -= 1;
        for &v in &self.faces[fi] {
            self.vertex_faces[v].remove(&fi);
        }
    }

    fn build_queue(&self) -> PriorityQueue<(usize, usize), EdgeCost> {
        let mut queue = PriorityQueue::new();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        for (fi, face) in self.faces.iter().enumerate() {
            if !self.face_alive[fi] {
                continue;
            }
            for i in 0..3 {
                let a = face[i];
                let b = face[(i + 1) % 3];
                let key = (a.min(b), a.max(b));
                if !seen.insert(key) {
                    continue;
                }
                let (position, cost) = self.collapse_cost(key.0, key.1);
                queue.push(key, EdgeCost { position, cost });
            }
        }
        queue
    }

    /// Compact alive geometry back into a mesh. Normals are not
    /// carried over; the normals stage runs after reduction anyway.
    fn into_mesh(self) -> SurfaceMesh {
        let mut old_to_new: HashMap<usize, usize> = HashMap::new();
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for (fi, face) in self.faces.iter().enumerate() {
            if !self.face_alive[fi] {
                continue;
            }
            let mut mapped = [0usize; 3];
            for (slot, &v) in face.iter().enumerate() {
                let next = vertices.len();
                let idx = *old_to_new.entry(v).or_insert_with(|| {
                    vertices.push(self.positions[v]);
                    next
                });
                mapped[slot] = idx;
            }
            faces.push(mapped);
        }

        SurfaceMesh::from_vertices_and_faces(vertices, faces)
    }
}

fn plane_of(v0: &Point3f, v1: &Point3f, v2: &Point3f) -> Vector4<f64> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let n = e1.cross(&e2).normalize();
    if !n.iter().all(|x| x.is_finite()) {
        return Vector4::new(0.0, 0.0, 1.0, 0.0);
    }
    let d = -n.dot(&v0.coords);
    Vector4::new(n.x as f64, n.y as f64, n.z as f64, d as f64)
}

fn plane_to_quadric(p: &Vector4<f64>) -> Matrix4<f64> {
    let (a, b, c, d) = (p[0], p[1], p[2], p[3]);
    Matrix4::new(
        a * a, a * b, a * c, a * d,
        a * b, b * b, b * c, b * d,
        a * c, b * c, c * c, c * d,
        a * d, b * d, c * d, d * d,
    )
}
