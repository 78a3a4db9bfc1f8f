//! The staged surface pipeline for one label
//!
//! extract → reduce → smooth → normals → strip is a strict linear
//! chain: every stage consumes the cached output of the one before
//! it. Changing an upstream parameter invalidates everything after
//! it; changing a downstream parameter leaves the upstream caches
//! untouched, which is what makes dragging the smoothness slider
//! cheap — extraction and reduction never re-run for it.

use std::sync::Arc;

use neuroview_core::{Result, StripMesh, SurfaceMesh, Volume};
use neuroview_extract::{IsoSurfaceExtractor, LabelSurfaceExtractor};
use neuroview_mesh::{compute_normals, decimate, smooth, strip, StageKind, StageWarning};

/// How a surface is pulled out of the volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtractionPolicy {
    /// Continuous structural data: one scalar cutoff
    Continuous(f32),
    /// Discrete segmentation data: boundary of one integer label
    Label(u32),
}

/// Tunable parameters of one pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineParams {
    pub policy: ExtractionPolicy,
    /// Fraction of faces the reduction stage removes
    pub target_reduction: f32,
    /// Laplacian smoothing iterations
    pub smoothing_iterations: usize,
    /// Hard-edge preservation angle for normal generation
    pub feature_angle_deg: f32,
}

impl PipelineParams {
    pub fn continuous(iso_value: f32) -> Self {
        Self {
            policy: ExtractionPolicy::Continuous(iso_value),
            target_reduction: 0.5,
            smoothing_iterations: 500,
            feature_angle_deg: 60.0,
        }
    }

    pub fn label(label: u32) -> Self {
        Self {
            policy: ExtractionPolicy::Label(label),
            ..Self::continuous(0.0)
        }
    }
}

/// Counts how often each stage has actually run.
///
/// Written to the debug log after rebuilds; the stage-reuse tests
/// assert against it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTrace {
    pub extract_runs: usize,
    pub reduce_runs: usize,
    pub smooth_runs: usize,
    pub normals_runs: usize,
    pub strip_runs: usize,
}

/// Staged, cached surface pipeline for one label of one volume.
pub struct LabelPipeline {
    volume: Arc<Volume>,
    params: PipelineParams,
    raw: Option<SurfaceMesh>,
    reduced: Option<SurfaceMesh>,
    smoothed: Option<SurfaceMesh>,
    oriented: Option<SurfaceMesh>,
    stripped: Option<StripMesh>,
    warnings: Vec<StageWarning>,
    trace: StageTrace,
}

impl LabelPipeline {
    pub fn new(volume: Arc<Volume>, params: PipelineParams) -> Self {
        Self {
            volume,
            params,
            raw: None,
            reduced: None,
            smoothed: None,
            oriented: None,
            stripped: None,
            warnings: Vec::new(),
            trace: StageTrace::default(),
        }
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// Warnings accumulated by the stages that built the current
    /// surface. Cleared whenever their originating stage re-runs.
    pub fn warnings(&self) -> &[StageWarning] {
        &self.warnings
    }

    pub fn trace(&self) -> StageTrace {
        self.trace
    }

    /// True once extraction has run and found no geometry.
    pub fn absent(&self) -> bool {
        matches!(&self.raw, Some(mesh) if mesh.is_empty())
    }

    /// Change the continuous iso threshold. Invalidates the whole
    /// chain from extraction.
    pub fn set_threshold(&mut self, iso_value: f32) {
        let policy = ExtractionPolicy::Continuous(iso_value);
        if self.params.policy != policy {
            self.params.policy = policy;
            self.invalidate_from(StageKind::Extract);
        }
    }

    /// Change the discrete label id. Invalidates the whole chain.
    pub fn set_label(&mut self, label: u32) {
        let policy = ExtractionPolicy::Label(label);
        if self.params.policy != policy {
            self.params.policy = policy;
            self.invalidate_from(StageKind::Extract);
        }
    }

    /// Change the reduction target. Extraction is reused.
    pub fn set_target_reduction(&mut self, target_reduction: f32) {
        if self.params.target_reduction != target_reduction {
            self.params.target_reduction = target_reduction;
            self.invalidate_from(StageKind::Reduce);
        }
    }

    /// Change the smoothing iteration count. Extraction and reduction
    /// are reused; only smoothing onward re-runs.
    pub fn set_smoothness(&mut self, iterations: usize) {
        if self.params.smoothing_iterations != iterations {
            self.params.smoothing_iterations = iterations;
            self.invalidate_from(StageKind::Smooth);
        }
    }

    /// Change the feature angle for normal generation.
    pub fn set_feature_angle(&mut self, degrees: f32) {
        if self.params.feature_angle_deg != degrees {
            self.params.feature_angle_deg = degrees;
            self.invalidate_from(StageKind::Normals);
        }
    }

    fn invalidate_from(&mut self, stage: StageKind) {
        if stage <= StageKind::Extract {
            self.raw = None;
        }
        if stage <= StageKind::Reduce {
            self.reduced = None;
        }
        if stage <= StageKind::Smooth {
            self.smoothed = None;
        }
        if stage <= StageKind::Normals {
            self.oriented = None;
        }
        self.stripped = None;
        self.warnings.retain(|w| w.stage < stage);
    }

    /// Produce the renderable surface, running only the stages whose
    /// cache was invalidated.
    ///
    /// `Ok(None)` means extraction found no geometry for this label:
    /// a valid absence, distinct from every error case. The remaining
    /// stages are skipped entirely in that case.
    pub fn surface(&mut self) -> Result<Option<&StripMesh>> {
        if self.raw.is_none() {
            self.trace.extract_runs += 1;
            let mesh = match self.params.policy {
                ExtractionPolicy::Continuous(iso) => {
                    IsoSurfaceExtractor::new(iso).extract(&self.volume)?
                }
                ExtractionPolicy::Label(label) => {
                    LabelSurfaceExtractor::new(label).extract(&self.volume)?
                }
            };
            if mesh.is_empty() {
                log::info!(
                    "extraction for {:?} produced no geometry; surface absent",
                    self.params.policy
                );
                self.warnings.push(StageWarning::new(
                    StageKind::Extract,
                    "extraction produced no geometry",
                ));
            }
            self.raw = Some(mesh);
        }

        if let Some(raw) = &self.raw {
            if raw.is_empty() {
                return Ok(None);
            }
            if self.reduced.is_none() {
                self.trace.reduce_runs += 1;
                let reduced = decimate(raw, self.params.target_reduction)?;
                for warning in &reduced.warnings {
                    log::warn!("{}", warning);
                }
                self.warnings.extend(reduced.warnings);
                self.reduced = Some(reduced.mesh);
            }
        }

        if let Some(reduced) = &self.reduced {
            if self.smoothed.is_none() {
                self.trace.smooth_runs += 1;
                self.smoothed = Some(smooth(reduced, self.params.smoothing_iterations));
            }
        }

        if let Some(smoothed) = &self.smoothed {
            if self.oriented.is_none() {
                self.trace.normals_runs += 1;
                self.oriented = Some(compute_normals(smoothed, self.params.feature_angle_deg));
            }
        }

        if let Some(oriented) = &self.oriented {
            if self.stripped.is_none() {
                self.trace.strip_runs += 1;
                self.stripped = Some(strip(oriented));
                log::debug!("pipeline rebuilt: {:?}", self.trace);
            }
        }

        Ok(self.stripped.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuroview_core::{Point3f, Volume};
    use neuroview_extract::sphere_volume;

    fn sphere() -> Arc<Volume> {
        Arc::new(sphere_volume(
            Point3f::origin(),
            1.0,
            [14, 14, 14],
            [4.0, 4.0, 4.0],
        ))
    }

    fn test_params(iso: f32) -> PipelineParams {
        PipelineParams {
            smoothing_iterations: 20,
            ..PipelineParams::continuous(iso)
        }
    }

    #[test]
    fn test_full_chain_runs_once() {
        let mut pipeline = LabelPipeline::new(sphere(), test_params(0.0));
        let surface = pipeline.surface().unwrap();
        assert!(surface.is_some());

        let trace = pipeline.trace();
        assert_eq!(trace.extract_runs, 1);
        assert_eq!(trace.reduce_runs, 1);
        assert_eq!(trace.smooth_runs, 1);
        assert_eq!(trace.normals_runs, 1);
        assert_eq!(trace.strip_runs, 1);
    }

    #[test]
    fn test_repeated_surface_calls_reuse_caches() {
        let mut pipeline = LabelPipeline::new(sphere(), test_params(0.0));
        pipeline.surface().unwrap();
        pipeline.surface().unwrap();
        pipeline.surface().unwrap();
        assert_eq!(pipeline.trace().extract_runs, 1);
        assert_eq!(pipeline.trace().strip_runs, 1);
    }

    #[test]
    fn test_smoothness_change_reruns_smooth_onward_only() {
        let mut pipeline = LabelPipeline::new(sphere(), test_params(0.0));
        pipeline.surface().unwrap();

        pipeline.set_smoothness(40);
        pipeline.surface().unwrap();

        let trace = pipeline.trace();
        assert_eq!(trace.extract_runs, 1, "extract must not re-run");
        assert_eq!(trace.reduce_runs, 1, "reduce must not re-run");
        assert_eq!(trace.smooth_runs, 2);
        assert_eq!(trace.normals_runs, 2);
        assert_eq!(trace.strip_runs, 2);
    }

    #[test]
    fn test_threshold_change_rebuilds_entire_chain() {
        let mut pipeline = LabelPipeline::new(sphere(), test_params(0.0));
        pipeline.surface().unwrap();

        pipeline.set_threshold(0.2);
        pipeline.surface().unwrap();

        let trace = pipeline.trace();
        assert_eq!(trace.extract_runs, 2);
        assert_eq!(trace.reduce_runs, 2);
        assert_eq!(trace.smooth_runs, 2);
        assert_eq!(trace.strip_runs, 2);
    }

    #[test]
    fn test_unchanged_parameter_is_a_no_op() {
        let mut pipeline = LabelPipeline::new(sphere(), test_params(0.0));
        pipeline.surface().unwrap();

        pipeline.set_smoothness(20);
        pipeline.set_threshold(0.0);
        pipeline.surface().unwrap();

        assert_eq!(pipeline.trace().extract_runs, 1);
        assert_eq!(pipeline.trace().smooth_runs, 1);
    }

    #[test]
    fn test_empty_extraction_short_circuits() {
        let mut pipeline = LabelPipeline::new(sphere(), test_params(1000.0));
        let surface = pipeline.surface().unwrap();

        assert!(surface.is_none());
        assert!(pipeline.absent());
        let trace = pipeline.trace();
        assert_eq!(trace.extract_runs, 1);
        assert_eq!(trace.reduce_runs, 0, "downstream stages must not run");
        assert_eq!(trace.strip_runs, 0);
        assert!(pipeline
            .warnings()
            .iter()
            .any(|w| w.stage == StageKind::Extract));
    }

    #[test]
    fn test_absence_recovers_after_threshold_change() {
        let mut pipeline = LabelPipeline::new(sphere(), test_params(1000.0));
        assert!(pipeline.surface().unwrap().is_none());

        pipeline.set_threshold(0.0);
        assert!(pipeline.surface().unwrap().is_some());
        assert!(!pipeline.absent());
        assert!(pipeline.warnings().is_empty());
    }

    #[test]
    fn test_feature_angle_reruns_normals_onward_only() {
        let mut pipeline = LabelPipeline::new(sphere(), test_params(0.0));
        pipeline.surface().unwrap();

        pipeline.set_feature_angle(30.0);
        pipeline.surface().unwrap();

        let trace = pipeline.trace();
        assert_eq!(trace.smooth_runs, 1);
        assert_eq!(trace.normals_runs, 2);
        assert_eq!(trace.strip_runs, 2);
    }

    #[test]
    fn test_label_policy_extracts_discrete_surface() {
        // 6x6x6 mask with a label-1 block in the middle
        let dims = [6usize, 6, 6];
        let mut data = vec![0.0f32; 216];
        for z in 2..4 {
            for y in 2..4 {
                for x in 2..4 {
                    data[x + 6 * (y + 6 * z)] = 1.0;
                }
            }
        }
        let mask = Arc::new(
            Volume::from_data(dims, [1.0; 3], Point3f::origin(), data).unwrap(),
        );

        let params = PipelineParams {
            smoothing_iterations: 10,
            ..PipelineParams::label(1)
        };
        let mut pipeline = LabelPipeline::new(mask.clone(), params);
        assert!(pipeline.surface().unwrap().is_some());

        let params = PipelineParams {
            smoothing_iterations: 10,
            ..PipelineParams::label(2)
        };
        let mut missing = LabelPipeline::new(mask, params);
        assert!(missing.surface().unwrap().is_none());
        assert!(missing.absent());
    }
}
