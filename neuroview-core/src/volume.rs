//! Volumetric scalar grid loaded from a scan file
//!
//! A [`Volume`] is the immutable product of loading one scan: a dense
//! 3D grid of scalar samples together with the voxel spacing and world
//! origin needed to place extracted geometry. After construction the
//! grid is read-only and can be shared across any number of extraction
//! pipelines (typically behind an `Arc`).

use crate::error::{Error, Result};
use crate::Point3f;

/// An immutable 3D scalar grid with world-space placement.
///
/// Samples are stored in a flat buffer, x-fastest: the sample at
/// `(x, y, z)` lives at index `x + dims[0] * (y + dims[1] * z)`.
#[derive(Debug, Clone)]
pub struct Volume {
    dims: [usize; 3],
    spacing: [f32; 3],
    origin: Point3f,
    data: Vec<f32>,
    scalar_range: (f32, f32),
}

impl Volume {
    /// Build a volume from raw sample data.
    ///
    /// Fails if any dimension is zero or if `data` does not hold
    /// exactly `dims[0] * dims[1] * dims[2]` samples. The scalar range
    /// is computed once here, over the finite samples only.
    pub fn from_data(
        dims: [usize; 3],
        spacing: [f32; 3],
        origin: Point3f,
        data: Vec<f32>,
    ) -> Result<Self> {
        if dims.iter().any(|&d| d == 0) {
            return Err(Error::InvalidData(format!(
                "Volume dimensions must be non-zero, got {:?}",
                dims
            )));
        }
        let expected = dims[0] * dims[1] * dims[2];
        if data.len() != expected {
            return Err(Error::InvalidData(format!(
                "Volume data length {} does not match dimensions {:?} ({} samples)",
                data.len(),
                dims,
                expected
            )));
        }

        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &data {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min > max {
            return Err(Error::InvalidData(
                "Volume contains no finite samples".to_string(),
            ));
        }

        Ok(Self {
            dims,
            spacing,
            origin,
            data,
            scalar_range: (min, max),
        })
    }

    /// Grid dimensions as `[nx, ny, nz]`.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Physical size of one voxel along each axis.
    pub fn spacing(&self) -> [f32; 3] {
        self.spacing
    }

    /// World position of grid point `(0, 0, 0)`.
    pub fn origin(&self) -> Point3f {
        self.origin
    }

    /// Cached `(min, max)` over all finite samples.
    pub fn scalar_range(&self) -> (f32, f32) {
        self.scalar_range
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.dims[0] * (y + self.dims[1] * z)
    }

    /// Sample at grid coordinates, with bounds checking.
    pub fn value(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        if x < self.dims[0] && y < self.dims[1] && z < self.dims[2] {
            Some(self.data[self.index(x, y, z)])
        } else {
            None
        }
    }

    /// Sample at grid coordinates without bounds checking the result
    /// against the grid; out-of-range coordinates read as 0.0.
    #[inline]
    pub fn value_or_zero(&self, x: usize, y: usize, z: usize) -> f32 {
        self.value(x, y, z).unwrap_or(0.0)
    }

    /// Convert grid coordinates to world coordinates.
    pub fn grid_to_world(&self, x: usize, y: usize, z: usize) -> Point3f {
        Point3f::new(
            self.origin.x + x as f32 * self.spacing[0],
            self.origin.y + y as f32 * self.spacing[1],
            self.origin.z + z as f32 * self.spacing[2],
        )
    }

    /// Trilinearly interpolated sample at a world position.
    ///
    /// Positions outside the grid read as 0.0.
    pub fn sample(&self, position: &Point3f) -> f32 {
        let gx = (position.x - self.origin.x) / self.spacing[0];
        let gy = (position.y - self.origin.y) / self.spacing[1];
        let gz = (position.z - self.origin.z) / self.spacing[2];

        if gx < 0.0
            || gy < 0.0
            || gz < 0.0
            || gx > (self.dims[0] - 1) as f32
            || gy > (self.dims[1] - 1) as f32
            || gz > (self.dims[2] - 1) as f32
        {
            return 0.0;
        }

        let x0 = (gx.floor() as usize).min(self.dims[0] - 1);
        let y0 = (gy.floor() as usize).min(self.dims[1] - 1);
        let z0 = (gz.floor() as usize).min(self.dims[2] - 1);
        let x1 = (x0 + 1).min(self.dims[0] - 1);
        let y1 = (y0 + 1).min(self.dims[1] - 1);
        let z1 = (z0 + 1).min(self.dims[2] - 1);

        let fx = gx - x0 as f32;
        let fy = gy - y0 as f32;
        let fz = gz - z0 as f32;

        let v000 = self.data[self.index(x0, y0, z0)];
        let v100 = self.data[self.index(x1, y0, z0)];
        let v010 = self.data[self.index(x0, y1, z0)];
        let v110 = self.data[self.index(x1, y1, z0)];
        let v001 = self.data[self.index(x0, y0, z1)];
        let v101 = self.data[self.index(x1, y0, z1)];
        let v011 = self.data[self.index(x0, y1, z1)];
        let v111 = self.data[self.index(x1, y1, z1)];

        let v00 = v000 * (1.0 - fx) + v100 * fx;
        let v10 = v010 * (1.0 - fx) + v110 * fx;
        let v01 = v001 * (1.0 - fx) + v101 * fx;
        let v11 = v011 * (1.0 - fx) + v111 * fx;

        let v0 = v00 * (1.0 - fy) + v10 * fy;
        let v1 = v01 * (1.0 - fy) + v11 * fy;

        v0 * (1.0 - fz) + v1 * fz
    }

    /// World-space extent of the grid: `(min corner, max corner)`.
    pub fn world_bounds(&self) -> (Point3f, Point3f) {
        let max = self.grid_to_world(self.dims[0] - 1, self.dims[1] - 1, self.dims[2] - 1);
        (self.origin, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_volume() -> Volume {
        // 2x2x2 grid, values 0..8
        let data: Vec<f32> = (0..8).map(|i| i as f32).collect();
        Volume::from_data([2, 2, 2], [1.0, 1.0, 1.0], Point3f::origin(), data).unwrap()
    }

    #[test]
    fn test_from_data_validates_length() {
        let result = Volume::from_data([2, 2, 2], [1.0; 3], Point3f::origin(), vec![0.0; 7]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_data_rejects_zero_dims() {
        let result = Volume::from_data([0, 2, 2], [1.0; 3], Point3f::origin(), vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scalar_range() {
        let v = small_volume();
        assert_eq!(v.scalar_range(), (0.0, 7.0));
    }

    #[test]
    fn test_scalar_range_ignores_non_finite() {
        let data = vec![1.0, f32::NAN, 3.0, 2.0];
        let v = Volume::from_data([4, 1, 1], [1.0; 3], Point3f::origin(), data).unwrap();
        assert_eq!(v.scalar_range(), (1.0, 3.0));
    }

    #[test]
    fn test_value_layout_is_x_fastest() {
        let v = small_volume();
        assert_eq!(v.value(0, 0, 0), Some(0.0));
        assert_eq!(v.value(1, 0, 0), Some(1.0));
        assert_eq!(v.value(0, 1, 0), Some(2.0));
        assert_eq!(v.value(0, 0, 1), Some(4.0));
        assert_eq!(v.value(1, 1, 1), Some(7.0));
        assert_eq!(v.value(2, 0, 0), None);
    }

    #[test]
    fn test_grid_to_world() {
        let data = vec![0.0; 8];
        let v = Volume::from_data(
            [2, 2, 2],
            [2.0, 3.0, 4.0],
            Point3f::new(1.0, 1.0, 1.0),
            data,
        )
        .unwrap();
        assert_eq!(v.grid_to_world(1, 1, 1), Point3f::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_sample_interpolates() {
        let v = small_volume();
        // Midpoint of the x edge between samples 0.0 and 1.0
        let s = v.sample(&Point3f::new(0.5, 0.0, 0.0));
        assert!((s - 0.5).abs() < 1e-6);
        // Outside reads as zero
        assert_eq!(v.sample(&Point3f::new(-1.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_world_bounds() {
        let v = small_volume();
        let (min, max) = v.world_bounds();
        assert_eq!(min, Point3f::origin());
        assert_eq!(max, Point3f::new(1.0, 1.0, 1.0));
    }
}
