//! Marching cubes iso-surface extraction
//!
//! The marcher walks every cube of the grid, classifies its corners
//! against the iso level, and emits triangles from the classic lookup
//! table. Cube slabs along x are processed in parallel; vertices are
//! identified by the grid edge they sit on, so shared edges between
//! cubes (and between slabs) resolve to a single mesh vertex and the
//! output carries real connectivity for the downstream stages.

use std::collections::HashMap;

use crate::field::ScalarField;
use crate::parallel;
use crate::tables::{CORNER_OFFSETS, EDGE_ANCHORS, EDGE_CORNERS, TRIANGLE_TABLE};
use neuroview_core::{Point3f, Result, SurfaceMesh, Vector3f, Volume};

/// Identity of a grid edge: anchor grid point plus axis (0/1/2).
type EdgeKey = (usize, usize, usize, u8);

/// Options for the extraction pass
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// Compute gradient-based vertex normals during extraction
    pub compute_normals: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            compute_normals: true,
        }
    }
}

/// Threshold-based extraction policy for continuous structural data.
#[derive(Debug, Clone)]
pub struct IsoSurfaceExtractor {
    pub iso_value: f32,
    pub options: ExtractionOptions,
}

impl IsoSurfaceExtractor {
    pub fn new(iso_value: f32) -> Self {
        Self {
            iso_value,
            options: ExtractionOptions::default(),
        }
    }

    /// Extract the iso-surface at this extractor's threshold.
    ///
    /// An empty mesh means the threshold crosses no data, which is a
    /// valid outcome rather than a failure.
    pub fn extract(&self, volume: &Volume) -> Result<SurfaceMesh> {
        extract_iso(volume, self.iso_value, &self.options)
    }
}

struct SlabOutput {
    /// Deduplicated within the slab; keyed for cross-slab merging
    vertices: Vec<(EdgeKey, Point3f, Vector3f)>,
    /// Slab-local vertex indices
    triangles: Vec<[usize; 3]>,
}

/// Extract the iso-surface of a scalar field at `iso_level`.
pub fn extract_iso<F: ScalarField>(
    field: &F,
    iso_level: f32,
    options: &ExtractionOptions,
) -> Result<SurfaceMesh> {
    let dims = field.dims();
    if dims.iter().any(|&d| d < 2) {
        return Ok(SurfaceMesh::new());
    }

    let slabs: Vec<usize> = (0..dims[0] - 1).collect();
    let outputs = parallel::parallel_map(&slabs, |&x| process_slab(field, x, iso_level, options));

    // Merge slab outputs, resolving shared grid edges to one vertex
    let mut key_to_index: HashMap<EdgeKey, usize> = HashMap::new();
    let mut vertices: Vec<Point3f> = Vec::new();
    let mut normals: Vec<Vector3f> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    for slab in outputs {
        let mut local_to_global = Vec::with_capacity(slab.vertices.len());
        for (key, position, normal) in slab.vertices {
            let index = *key_to_index.entry(key).or_insert_with(|| {
                vertices.push(position);
                normals.push(normal);
                vertices.len() - 1
            });
            local_to_global.push(index);
        }
        for tri in slab.triangles {
            let face = [
                local_to_global[tri[0]],
                local_to_global[tri[1]],
                local_to_global[tri[2]],
            ];
            if face[0] != face[1] && face[1] != face[2] && face[2] != face[0] {
                faces.push(face);
            }
        }
    }

    if faces.is_empty() {
        log::debug!("no geometry at iso level {}", iso_level);
        return Ok(SurfaceMesh::new());
    }

    let mut mesh = SurfaceMesh::from_vertices_and_faces(vertices, faces);
    if options.compute_normals {
        mesh.set_normals(normals);
    }
    Ok(mesh)
}

fn process_slab<F: ScalarField>(
    field: &F,
    x: usize,
    iso_level: f32,
    options: &ExtractionOptions,
) -> SlabOutput {
    let dims = field.dims();
    let mut slab_index: HashMap<EdgeKey, usize> = HashMap::new();
    let mut vertices: Vec<(EdgeKey, Point3f, Vector3f)> = Vec::new();
    let mut triangles: Vec<[usize; 3]> = Vec::new();

    for y in 0..dims[1] - 1 {
        for z in 0..dims[2] - 1 {
            let mut corner_values = [0.0f32; 8];
            for (i, off) in CORNER_OFFSETS.iter().enumerate() {
                corner_values[i] = field.value(x + off[0], y + off[1], z + off[2]);
            }

            let mut cube_index = 0usize;
            for (i, &v) in corner_values.iter().enumerate() {
                if v < iso_level {
                    cube_index |= 1 << i;
                }
            }
            if cube_index == 0 || cube_index == 255 {
                continue;
            }

            let row = &TRIANGLE_TABLE[cube_index];
            let mut i = 0;
            while i < row.len() && row[i] != -1 {
                let mut tri = [0usize; 3];
                for (slot, &edge) in row[i..i + 3].iter().enumerate() {
                    let edge = edge as usize;
                    let key = edge_key(x, y, z, edge);
                    let local = *slab_index.entry(key).or_insert_with(|| {
                        let vertex =
                            edge_vertex(field, x, y, z, edge, &corner_values, iso_level, options);
                        vertices.push((key, vertex.0, vertex.1));
                        vertices.len() - 1
                    });
                    tri[slot] = local;
                }
                triangles.push(tri);
                i += 3;
            }
        }
    }

    SlabOutput {
        vertices,
        triangles,
    }
}

#[inline]
fn edge_key(x: usize, y: usize, z: usize, edge: usize) -> EdgeKey {
    let (anchor, axis) = EDGE_ANCHORS[edge];
    (x + anchor[0], y + anchor[1], z + anchor[2], axis)
}

/// Interpolate the surface crossing along one cube edge.
fn edge_vertex<F: ScalarField>(
    field: &F,
    x: usize,
    y: usize,
    z: usize,
    edge: usize,
    corner_values: &[f32; 8],
    iso_level: f32,
    options: &ExtractionOptions,
) -> (Point3f, Vector3f) {
    let [c1, c2] = EDGE_CORNERS[edge];
    let o1 = CORNER_OFFSETS[c1];
    let o2 = CORNER_OFFSETS[c2];
    let (x1, y1, z1) = (x + o1[0], y + o1[1], z + o1[2]);
    let (x2, y2, z2) = (x + o2[0], y + o2[1], z + o2[2]);

    let v1 = corner_values[c1];
    let v2 = corner_values[c2];
    let denom = v2 - v1;
    let t = if denom.abs() < 1e-6 {
        0.5
    } else {
        ((iso_level - v1) / denom).clamp(0.0, 1.0)
    };

    let p1 = field.world_position(x1, y1, z1);
    let p2 = field.world_position(x2, y2, z2);
    let position = p1 + (p2 - p1) * t;

    let normal = if options.compute_normals {
        let g1 = gradient(field, x1, y1, z1);
        let g2 = gradient(field, x2, y2, z2);
        let g = g1.lerp(&g2, t);
        // Negated gradient points away from higher values
        if g.norm() > 1e-6 {
            -g.normalize()
        } else {
            Vector3f::z()
        }
    } else {
        Vector3f::z()
    };

    (position, normal)
}

/// Central-difference gradient at a grid point, one-sided at borders.
fn gradient<F: ScalarField>(field: &F, x: usize, y: usize, z: usize) -> Vector3f {
    let dims = field.dims();
    let spacing = field.spacing();

    let axis = |lo: usize, hi: usize, vl: f32, vh: f32, step: f32| {
        let span = (hi - lo) as f32 * step;
        if span > 0.0 {
            (vh - vl) / span
        } else {
            0.0
        }
    };

    let (xm, xp) = (x.saturating_sub(1), (x + 1).min(dims[0] - 1));
    let (ym, yp) = (y.saturating_sub(1), (y + 1).min(dims[1] - 1));
    let (zm, zp) = (z.saturating_sub(1), (z + 1).min(dims[2] - 1));

    Vector3f::new(
        axis(xm, xp, field.value(xm, y, z), field.value(xp, y, z), spacing[0]),
        axis(ym, yp, field.value(x, ym, z), field.value(x, yp, z), spacing[1]),
        axis(zm, zp, field.value(x, y, zm), field.value(x, y, zp), spacing[2]),
    )
}

/// Create a signed-distance sphere volume, useful for tests and demos.
pub fn sphere_volume(
    center: Point3f,
    radius: f32,
    resolution: [usize; 3],
    extent: [f32; 3],
) -> Volume {
    let origin = Point3f::new(
        center.x - extent[0] / 2.0,
        center.y - extent[1] / 2.0,
        center.z - extent[2] / 2.0,
    );
    let spacing = [
        extent[0] / (resolution[0] - 1) as f32,
        extent[1] / (resolution[1] - 1) as f32,
        extent[2] / (resolution[2] - 1) as f32,
    ];

    let mut data = Vec::with_capacity(resolution[0] * resolution[1] * resolution[2]);
    for z in 0..resolution[2] {
        for y in 0..resolution[1] {
            for x in 0..resolution[0] {
                let p = Point3f::new(
                    origin.x + x as f32 * spacing[0],
                    origin.y + y as f32 * spacing[1],
                    origin.z + z as f32 * spacing[2],
                );
                data.push((p - center).norm() - radius);
            }
        }
    }

    Volume::from_data(resolution, spacing, origin, data)
        .expect("sphere volume dimensions are consistent")
}
