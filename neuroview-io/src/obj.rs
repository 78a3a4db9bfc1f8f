//! OBJ format support

use crate::MeshWriter;
use neuroview_core::{Result, SurfaceMesh};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct ObjWriter;

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &SurfaceMesh, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);

        for v in &mesh.vertices {
            writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
        }
        if let Some(normals) = &mesh.normals {
            for n in normals {
                writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
            }
        }
        for face in &mesh.faces {
            // OBJ indices are 1-based
            if mesh.normals.is_some() {
                writeln!(
                    out,
                    "f {0}//{0} {1}//{1} {2}//{2}",
                    face[0] + 1,
                    face[1] + 1,
                    face[2] + 1
                )?;
            } else {
                writeln!(out, "f {} {} {}", face[0] + 1, face[1] + 1, face[2] + 1)?;
            }
        }

        out.flush()?;
        Ok(())
    }
}
