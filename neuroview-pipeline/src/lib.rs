//! Per-label surface pipelines for neuroview
//!
//! A [`LabelPipeline`] owns the staged extract → reduce → smooth →
//! normals → strip chain for one surface and caches every stage, so a
//! parameter change re-runs only the stages downstream of it. The
//! [`MultiLabelManager`] discovers how many labels a segmentation
//! volume carries, fans out one pipeline per label, and tracks
//! per-label color, opacity, and visibility state. [`Debouncer`]
//! coalesces rapid parameter changes into a single recompute.

pub mod pipeline;
pub mod manager;
pub mod debounce;

pub use pipeline::*;
pub use manager::*;
pub use debounce::*;
