//! Viewer configuration
//!
//! All tunable defaults live in one immutable [`ViewerConfig`] value
//! constructed at startup and passed by reference into each component.
//! No component reads configuration from globals.

/// Immutable configuration for the viewer pipeline.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Color applied to the structural (brain) surface
    pub brain_color: [f32; 3],
    /// Opacity of the structural surface
    pub brain_opacity: f32,
    /// Per-label colors for segmentation surfaces; its length caps the
    /// number of labels the manager will instantiate
    pub palette: Vec<[f32; 3]>,
    /// The designated color used when single-color mode is active
    pub single_color: [f32; 3],
    /// Default Laplacian smoothing iterations
    pub smoothing_iterations: usize,
    /// Default decimation target (fraction of faces to remove)
    pub target_reduction: f32,
    /// Feature angle in degrees for normal generation
    pub feature_angle_deg: f32,
    /// Zoom applied after each camera preset transition
    pub preset_zoom: f32,
    /// Quiet interval for debounced parameter recomputation, in ms
    pub quiet_interval_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            brain_color: [1.0, 0.9, 0.9],
            brain_opacity: 0.2,
            palette: vec![
                [1.0, 0.3, 0.3],
                [0.3, 1.0, 0.3],
                [0.3, 0.3, 1.0],
                [1.0, 1.0, 0.3],
            ],
            single_color: [1.0, 0.8, 0.2],
            smoothing_iterations: 500,
            target_reduction: 0.5,
            feature_angle_deg: 60.0,
            preset_zoom: 1.8,
            quiet_interval_ms: 400,
        }
    }
}

impl ViewerConfig {
    pub fn with_palette(mut self, palette: Vec<[f32; 3]>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_smoothing_iterations(mut self, iterations: usize) -> Self {
        self.smoothing_iterations = iterations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_has_four_entries() {
        let config = ViewerConfig::default();
        assert_eq!(config.palette.len(), 4);
        assert_eq!(config.brain_opacity, 0.2);
    }
}
