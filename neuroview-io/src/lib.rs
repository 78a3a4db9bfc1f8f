//! I/O operations for neuroview
//!
//! This crate reads volumetric scans (NIfTI `.nii` / `.nii.gz`) into
//! [`Volume`] values and exports extracted surfaces to Wavefront OBJ.
//! Paths are validated against the recognized volume extensions
//! before any file access happens, so a wrong file type is rejected
//! up front rather than half-way through decoding.

pub mod nifti;
pub mod obj;

pub use crate::nifti::NiftiReader;
pub use crate::obj::ObjWriter;

use neuroview_core::{Error, Result, SurfaceMesh, Volume};
use std::path::Path;

/// Trait for reading volumes from files
pub trait VolumeReader {
    fn read_volume<P: AsRef<Path>>(path: P) -> Result<Volume>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &SurfaceMesh, path: P) -> Result<()>;
}

/// True when the path carries a recognized volume extension.
pub fn has_volume_extension(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    name.ends_with(".nii") || name.ends_with(".nii.gz")
}

/// Validate the extension and read a volume.
pub fn read_volume<P: AsRef<Path>>(path: P) -> Result<Volume> {
    let path = path.as_ref();
    if !has_volume_extension(path) {
        return Err(Error::UnsupportedFormat(format!(
            "expected a .nii or .nii.gz volume, got {:?}",
            path
        )));
    }
    NiftiReader::read_volume(path)
}
