//! Surface material properties

use serde::{Deserialize, Serialize};

/// Color and opacity applied to one rendered surface.
///
/// A material is a plain value with no dependency on any mesh; the
/// same material can be swapped between surfaces or mutated in place
/// without touching geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// RGB components in [0, 1]
    pub color: [f32; 3],
    /// Opacity in [0, 1]; 0 is fully transparent but still present
    pub opacity: f32,
}

impl Material {
    pub fn new(color: [f32; 3], opacity: f32) -> Self {
        Self {
            color,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_is_clamped() {
        assert_eq!(Material::new([1.0, 0.0, 0.0], 1.5).opacity, 1.0);
        assert_eq!(Material::new([1.0, 0.0, 0.0], -0.5).opacity, 0.0);
        assert_eq!(Material::default().with_opacity(2.0).opacity, 1.0);
    }
}
