//! Mesh post-processing stages for neuroview
//!
//! This crate provides the filters applied to an extracted surface
//! before it is handed to the renderer:
//! - topology-preserving decimation
//! - Laplacian smoothing
//! - feature-angle vertex normal generation
//! - triangle stripping

pub mod decimate;
pub mod smooth;
pub mod normals;
pub mod strip;

pub use decimate::*;
pub use smooth::*;
pub use normals::*;
pub use strip::*;

use neuroview_core::{Result, SurfaceMesh};

/// Pipeline stage a warning originated from.
///
/// The declaration order is the pipeline order, so stages compare by
/// position in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    Extract,
    Reduce,
    Smooth,
    Normals,
    Strip,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StageKind::Extract => "extract",
            StageKind::Reduce => "reduce",
            StageKind::Smooth => "smooth",
            StageKind::Normals => "normals",
            StageKind::Strip => "strip",
        };
        f.write_str(name)
    }
}

/// A non-fatal condition reported by a pipeline stage.
///
/// Warnings are data, not errors: a stage that meets malformed or
/// empty input degrades and reports what it saw, and the caller
/// decides whether the condition means "label absent" or something
/// worth logging louder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageWarning {
    pub stage: StageKind,
    pub message: String,
}

impl StageWarning {
    pub fn new(stage: StageKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StageWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.stage, self.message)
    }
}

/// Simplify a mesh by reducing the number of faces/vertices
pub trait MeshSimplifier {
    /// Simplify mesh with target reduction ratio (0.0 = no reduction, 1.0 = maximum reduction)
    fn simplify(&self, mesh: &SurfaceMesh, reduction_ratio: f32) -> Result<SurfaceMesh>;
}
