//! Discrete label-boundary extraction
//!
//! Segmentation masks store integer region ids, not a continuous
//! field; thresholding them directly would merge neighboring labels.
//! Instead each label gets its own [`LabelField`]: a binary view of
//! the mask that reads 1.0 inside the label and 0.0 elsewhere, so
//! contouring it at 0.5 traces exactly that label's boundary.
//!
//! A field is constructed fresh per label and holds nothing but a
//! shared volume reference; extractors never share mutable state
//! across labels.

use crate::field::ScalarField;
use crate::iso::{extract_iso, ExtractionOptions};
use neuroview_core::{Point3f, Result, SurfaceMesh, Volume};

/// Binary indicator view of one label in a segmentation volume.
#[derive(Debug, Clone, Copy)]
pub struct LabelField<'a> {
    volume: &'a Volume,
    label: u32,
}

impl<'a> LabelField<'a> {
    /// Contour level that traces the label boundary
    pub const ISO_LEVEL: f32 = 0.5;

    pub fn new(volume: &'a Volume, label: u32) -> Self {
        Self { volume, label }
    }

    pub fn label(&self) -> u32 {
        self.label
    }
}

impl ScalarField for LabelField<'_> {
    fn dims(&self) -> [usize; 3] {
        self.volume.dims()
    }

    fn spacing(&self) -> [f32; 3] {
        self.volume.spacing()
    }

    fn value(&self, x: usize, y: usize, z: usize) -> f32 {
        // Nearest-integer match keeps float-encoded masks stable
        let v = self.volume.value_or_zero(x, y, z);
        if v.round() as i64 == self.label as i64 {
            1.0
        } else {
            0.0
        }
    }

    fn world_position(&self, x: usize, y: usize, z: usize) -> Point3f {
        self.volume.grid_to_world(x, y, z)
    }
}

/// Label-boundary extraction policy for discrete segmentation data.
#[derive(Debug, Clone)]
pub struct LabelSurfaceExtractor {
    pub label: u32,
    pub options: ExtractionOptions,
}

impl LabelSurfaceExtractor {
    pub fn new(label: u32) -> Self {
        Self {
            label,
            options: ExtractionOptions::default(),
        }
    }

    /// Extract the boundary surface of this label.
    ///
    /// An empty mesh means the label is not present in the mask.
    pub fn extract(&self, volume: &Volume) -> Result<SurfaceMesh> {
        let field = LabelField::new(volume, self.label);
        extract_iso(&field, LabelField::ISO_LEVEL, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 8x8x8 mask: a label-1 block and a label-2 block
    fn two_label_mask() -> Volume {
        let dims = [8usize, 8, 8];
        let mut data = vec![0.0f32; dims[0] * dims[1] * dims[2]];
        for z in 1..4 {
            for y in 1..4 {
                for x in 1..4 {
                    data[x + dims[0] * (y + dims[1] * z)] = 1.0;
                }
            }
        }
        for z in 4..7 {
            for y in 4..7 {
                for x in 4..7 {
                    data[x + dims[0] * (y + dims[1] * z)] = 2.0;
                }
            }
        }
        Volume::from_data(dims, [1.0; 3], Point3f::origin(), data).unwrap()
    }

    #[test]
    fn test_label_field_is_binary() {
        let mask = two_label_mask();
        let field = LabelField::new(&mask, 1);
        assert_eq!(field.value(2, 2, 2), 1.0);
        assert_eq!(field.value(5, 5, 5), 0.0);
        assert_eq!(field.value(0, 0, 0), 0.0);
    }

    #[test]
    fn test_label_field_matches_nearest_integer() {
        let data = vec![1.9999, 0.0, 0.0, 0.0];
        let mask = Volume::from_data([4, 1, 1], [1.0; 3], Point3f::origin(), data).unwrap();
        let field = LabelField::new(&mask, 2);
        assert_eq!(field.value(0, 0, 0), 1.0);
    }

    #[test]
    fn test_present_labels_extract_surfaces() {
        let mask = two_label_mask();
        let one = LabelSurfaceExtractor::new(1).extract(&mask).unwrap();
        let two = LabelSurfaceExtractor::new(2).extract(&mask).unwrap();
        assert!(!one.is_empty());
        assert!(!two.is_empty());
    }

    #[test]
    fn test_absent_label_extracts_empty() {
        let mask = two_label_mask();
        let three = LabelSurfaceExtractor::new(3).extract(&mask).unwrap();
        assert!(three.is_empty());
    }

    #[test]
    fn test_label_surfaces_do_not_overlap() {
        let mask = two_label_mask();
        let one = LabelSurfaceExtractor::new(1).extract(&mask).unwrap();

        // Label 1 occupies the low corner block; its surface must stay
        // within that block's one-voxel neighborhood.
        use neuroview_core::Drawable;
        let (min, max) = one.bounding_box();
        assert!(min.x >= 0.0 && max.x <= 4.0);
        assert!(min.y >= 0.0 && max.y <= 4.0);
        assert!(min.z >= 0.0 && max.z <= 4.0);
    }
}
