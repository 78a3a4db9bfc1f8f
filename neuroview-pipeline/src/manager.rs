//! Multi-label surface management
//!
//! A segmentation volume carries an unknown number of integer labels.
//! The manager derives the label count from the volume's scalar range,
//! fans out one [`LabelPipeline`] per label with a palette color, and
//! tracks the per-label visual state the UI binds to: an ordered
//! collection of entries, each either absent (nothing to show, control
//! disabled) or carrying a renderable surface with its material and
//! visibility flag.

use std::sync::Arc;

use neuroview_core::{Material, Result, StripMesh, ViewerConfig, Volume};
use neuroview_mesh::StageKind;

use crate::pipeline::{LabelPipeline, PipelineParams, StageTrace};

/// Derive the number of non-background labels in a segmentation
/// volume: `floor(max scalar)`, capped by the palette size.
pub fn discover_labels(volume: &Volume, palette_len: usize) -> usize {
    let (_, max) = volume.scalar_range();
    if max < 1.0 {
        return 0;
    }
    (max.floor() as usize).min(palette_len)
}

/// How label surfaces are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Each label keeps its own palette color
    Multi,
    /// Every label is painted the designated single color
    Single,
}

/// Observable state of one label slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelState {
    /// Extraction found nothing; the UI control should be disabled
    Absent,
    /// Surface exists but is toggled off
    Hidden,
    /// Surface exists and is shown
    Visible,
}

/// Per-label configuration, mutable through the manager.
#[derive(Debug, Clone)]
pub struct LabelSpec {
    /// Iso value for continuous data, label id for discrete data
    pub iso: f32,
    pub color: [f32; 3],
    pub opacity: f32,
    pub smoothness: usize,
}

/// A surface paired with its rendering state.
///
/// Existence and visibility are independent: a label whose opacity or
/// visibility is turned off still has a mesh, while an absent label
/// has none at all.
#[derive(Debug, Clone)]
pub struct RenderableLabel {
    pub mesh: StripMesh,
    pub material: Material,
    pub visible: bool,
}

/// One slot of the ordered label collection.
pub struct LabelEntry {
    pub spec: LabelSpec,
    pipeline: LabelPipeline,
    pub renderable: Option<RenderableLabel>,
}

impl LabelEntry {
    pub fn state(&self) -> LabelState {
        match &self.renderable {
            None => LabelState::Absent,
            Some(r) if r.visible => LabelState::Visible,
            Some(_) => LabelState::Hidden,
        }
    }

    /// Whether the UI control for this label should be enabled
    pub fn enabled(&self) -> bool {
        self.renderable.is_some()
    }

    pub fn trace(&self) -> StageTrace {
        self.pipeline.trace()
    }
}

/// Ordered collection of label pipelines for one volume.
pub struct MultiLabelManager {
    entries: Vec<LabelEntry>,
    color_mode: ColorMode,
    single_color: [f32; 3],
}

impl MultiLabelManager {
    /// Build one pipeline per discovered label of a segmentation
    /// volume, eagerly running each through the full chain.
    ///
    /// Labels whose extraction comes back empty get an absent entry;
    /// they never fail the whole manager.
    pub fn from_segmentation(volume: Arc<Volume>, config: &ViewerConfig) -> Result<Self> {
        let count = discover_labels(&volume, config.palette.len());
        log::info!(
            "segmentation scalar range {:?} -> {} label(s)",
            volume.scalar_range(),
            count
        );

        let mut entries = Vec::with_capacity(count);
        for index in 1..=count {
            let spec = LabelSpec {
                iso: index as f32,
                color: config.palette[index - 1],
                opacity: 1.0,
                smoothness: config.smoothing_iterations,
            };
            let params = PipelineParams {
                target_reduction: config.target_reduction,
                smoothing_iterations: spec.smoothness,
                feature_angle_deg: config.feature_angle_deg,
                ..PipelineParams::label(index as u32)
            };
            entries.push(Self::build_entry(volume.clone(), spec, params)?);
        }

        Ok(Self {
            entries,
            color_mode: ColorMode::Multi,
            single_color: config.single_color,
        })
    }

    /// The single-entry collection for a structural volume contoured
    /// at one threshold.
    pub fn structural(volume: Arc<Volume>, config: &ViewerConfig, threshold: f32) -> Result<Self> {
        let spec = LabelSpec {
            iso: threshold,
            color: config.brain_color,
            opacity: config.brain_opacity,
            smoothness: config.smoothing_iterations,
        };
        let params = PipelineParams {
            target_reduction: config.target_reduction,
            smoothing_iterations: spec.smoothness,
            feature_angle_deg: config.feature_angle_deg,
            ..PipelineParams::continuous(threshold)
        };
        let entry = Self::build_entry(volume, spec, params)?;

        Ok(Self {
            entries: vec![entry],
            color_mode: ColorMode::Multi,
            single_color: config.single_color,
        })
    }

    fn build_entry(
        volume: Arc<Volume>,
        spec: LabelSpec,
        params: PipelineParams,
    ) -> Result<LabelEntry> {
        let mut pipeline = LabelPipeline::new(volume, params);
        let renderable = pipeline.surface()?.map(|mesh| RenderableLabel {
            mesh: mesh.clone(),
            material: Material::new(spec.color, spec.opacity),
            visible: true,
        });
        if renderable.is_none() {
            log::info!("label at iso {} is absent; control disabled", spec.iso);
        }
        Ok(LabelEntry {
            spec,
            pipeline,
            renderable,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&LabelEntry> {
        self.entries.get(index)
    }

    /// Number of labels that produced a surface
    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|e| e.enabled()).count()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Set every label's opacity. Materials mutate in place; no mesh
    /// is rebuilt.
    pub fn set_opacity_all(&mut self, opacity: f32) {
        for entry in &mut self.entries {
            entry.spec.opacity = opacity.clamp(0.0, 1.0);
            if let Some(renderable) = &mut entry.renderable {
                renderable.material.opacity = entry.spec.opacity;
            }
        }
    }

    /// Set every label's smoothing iteration count and rebuild the
    /// affected stages. Cached extractions are reused.
    pub fn set_smoothness_all(&mut self, iterations: usize) -> Result<()> {
        for entry in &mut self.entries {
            entry.spec.smoothness = iterations;
            entry.pipeline.set_smoothness(iterations);
            if entry.renderable.is_some() {
                if let Some(mesh) = entry.pipeline.surface()? {
                    if let Some(renderable) = &mut entry.renderable {
                        renderable.mesh = mesh.clone();
                    }
                }
            }
        }
        Ok(())
    }

    /// Switch between per-label palette colors and the single
    /// designated color. Repaints materials in place; never rebuilds
    /// meshes.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
        for entry in &mut self.entries {
            let color = match mode {
                ColorMode::Multi => entry.spec.color,
                ColorMode::Single => self.single_color,
            };
            if let Some(renderable) = &mut entry.renderable {
                renderable.material.color = color;
            }
        }
    }

    /// Toggle one label's visibility. A no-op for absent labels and
    /// out-of-range indices.
    pub fn set_label_visible(&mut self, index: usize, visible: bool) {
        if let Some(entry) = self.entries.get_mut(index) {
            if let Some(renderable) = &mut entry.renderable {
                renderable.visible = visible;
            }
        }
    }

    /// True when any pipeline reported warnings past extraction
    /// absence, worth surfacing in the log.
    pub fn has_stage_warnings(&self) -> bool {
        self.entries.iter().any(|e| {
            e.pipeline
                .warnings()
                .iter()
                .any(|w| w.stage != StageKind::Extract)
        })
    }
}
