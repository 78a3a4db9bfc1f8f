//! NIfTI volume reading
//!
//! Decoding (including gzip, byte order, and intensity scaling) is
//! delegated to the `nifti` crate; this module maps the decoded
//! object into the crate's [`Volume`] type.

use crate::VolumeReader;
use neuroview_core::{Error, Point3f, Result, Volume};
use ::nifti::{IntoNdArray, NiftiObject, NiftiVolume, ReaderOptions};
use std::path::Path;

pub struct NiftiReader;

impl VolumeReader for NiftiReader {
    fn read_volume<P: AsRef<Path>>(path: P) -> Result<Volume> {
        let path = path.as_ref();
        // Surface a plain I/O error for missing files instead of a
        // decoder error
        std::fs::metadata(path)?;

        let object = ReaderOptions::new()
            .read_file(path)
            .map_err(|e| Error::InvalidData(format!("failed to parse {:?}: {}", path, e)))?;

        let header = object.header().clone();
        let volume = object.into_volume();
        let dim: Vec<usize> = volume.dim().iter().map(|&d| d as usize).collect();

        if dim.len() < 3 {
            return Err(Error::InvalidData(format!(
                "expected a 3D volume, got {} dimensions",
                dim.len()
            )));
        }
        if dim[3..].iter().any(|&d| d > 1) {
            return Err(Error::InvalidData(format!(
                "expected a single 3D volume, got shape {:?}",
                dim
            )));
        }
        let [nx, ny, nz] = [dim[0], dim[1], dim[2]];

        let array = volume
            .into_ndarray::<f32>()
            .map_err(|e| Error::InvalidData(format!("failed to decode voxel data: {}", e)))?;

        // Flatten into x-fastest order regardless of the decoded
        // array's memory layout
        let mut data = Vec::with_capacity(nx * ny * nz);
        let mut index = vec![0usize; array.ndim()];
        for z in 0..nz {
            index[2] = z;
            for y in 0..ny {
                index[1] = y;
                for x in 0..nx {
                    index[0] = x;
                    data.push(array[&index[..]]);
                }
            }
        }

        let spacing = [
            positive_or_unit(header.pixdim[1]),
            positive_or_unit(header.pixdim[2]),
            positive_or_unit(header.pixdim[3]),
        ];
        let origin = Point3f::new(header.quatern_x, header.quatern_y, header.quatern_z);

        let volume = Volume::from_data([nx, ny, nz], spacing, origin, data)?;
        log::info!(
            "loaded {:?}: dims {:?}, spacing {:?}, scalar range {:?}",
            path,
            volume.dims(),
            volume.spacing(),
            volume.scalar_range()
        );
        Ok(volume)
    }
}

fn positive_or_unit(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    /// Hand-write a minimal uncompressed NIfTI-1 file: the 348-byte
    /// header, 4 bytes of padding, then float32 samples x-fastest.
    fn write_test_nifti(path: &str, dims: [u16; 3], pixdim: [f32; 3], samples: &[f32]) {
        let mut header = vec![0u8; 352];
        header[0..4].copy_from_slice(&348i32.to_le_bytes()); // sizeof_hdr

        // dim: rank then extents
        let dim: [i16; 8] = [3, dims[0] as i16, dims[1] as i16, dims[2] as i16, 1, 1, 1, 1];
        for (i, d) in dim.iter().enumerate() {
            header[40 + i * 2..42 + i * 2].copy_from_slice(&d.to_le_bytes());
        }

        header[70..72].copy_from_slice(&16i16.to_le_bytes()); // datatype: float32
        header[72..74].copy_from_slice(&32i16.to_le_bytes()); // bitpix

        let pd: [f32; 8] = [1.0, pixdim[0], pixdim[1], pixdim[2], 1.0, 1.0, 1.0, 1.0];
        for (i, p) in pd.iter().enumerate() {
            header[76 + i * 4..80 + i * 4].copy_from_slice(&p.to_le_bytes());
        }

        header[108..112].copy_from_slice(&352.0f32.to_le_bytes()); // vox_offset
        header[344..348].copy_from_slice(b"n+1\0"); // magic

        let mut file = fs::File::create(path).unwrap();
        file.write_all(&header).unwrap();
        for s in samples {
            file.write_all(&s.to_le_bytes()).unwrap();
        }
        file.flush().unwrap();
    }

    #[test]
    fn test_read_minimal_nifti() {
        let temp_file = "test_minimal.nii";
        let samples: Vec<f32> = (0..8).map(|i| i as f32).collect();
        write_test_nifti(temp_file, [2, 2, 2], [1.0, 2.0, 3.0], &samples);

        let volume = NiftiReader::read_volume(temp_file).unwrap();
        assert_eq!(volume.dims(), [2, 2, 2]);
        assert_eq!(volume.spacing(), [1.0, 2.0, 3.0]);
        assert_eq!(volume.scalar_range(), (0.0, 7.0));
        // NIfTI stores x-fastest; the first axis must vary quickest
        assert_eq!(volume.value(1, 0, 0), Some(1.0));
        assert_eq!(volume.value(0, 1, 0), Some(2.0));
        assert_eq!(volume.value(0, 0, 1), Some(4.0));

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_read_garbage_is_invalid_data() {
        let temp_file = "test_garbage.nii";
        fs::write(temp_file, b"not a nifti file at all").unwrap();

        match NiftiReader::read_volume(temp_file) {
            Err(Error::InvalidData(_)) => {}
            other => panic!("expected InvalidData, got {:?}", other),
        }

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        match NiftiReader::read_volume("no_such_volume.nii") {
            Err(Error::Io(_)) => {}
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
