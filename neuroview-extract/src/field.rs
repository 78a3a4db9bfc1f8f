//! Scalar field abstraction over volumetric data

use neuroview_core::{Point3f, Volume};

/// A dense 3D scalar field the marching pass can sample.
///
/// Out-of-range coordinates read as 0.0 so border cubes close
/// cleanly against the outside of the grid.
pub trait ScalarField: Sync {
    /// Grid dimensions as `[nx, ny, nz]`
    fn dims(&self) -> [usize; 3];

    /// Physical size of one voxel along each axis
    fn spacing(&self) -> [f32; 3];

    /// Sample at grid coordinates; 0.0 outside the grid
    fn value(&self, x: usize, y: usize, z: usize) -> f32;

    /// World position of a grid point
    fn world_position(&self, x: usize, y: usize, z: usize) -> Point3f;
}

impl ScalarField for Volume {
    fn dims(&self) -> [usize; 3] {
        Volume::dims(self)
    }

    fn spacing(&self) -> [f32; 3] {
        Volume::spacing(self)
    }

    fn value(&self, x: usize, y: usize, z: usize) -> f32 {
        self.value_or_zero(x, y, z)
    }

    fn world_position(&self, x: usize, y: usize, z: usize) -> Point3f {
        self.grid_to_world(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_field_reads_zero_outside() {
        let volume = Volume::from_data(
            [2, 2, 2],
            [1.0; 3],
            Point3f::origin(),
            vec![5.0; 8],
        )
        .unwrap();
        assert_eq!(ScalarField::value(&volume, 1, 1, 1), 5.0);
        assert_eq!(ScalarField::value(&volume, 2, 0, 0), 0.0);
    }
}
