//! Camera placement and scene state for neuroview
//!
//! The renderer's internals are outside this workspace; what lives
//! here is the viewer-side state it is driven by: a [`Camera`] with
//! view/projection matrices, the three anatomical view presets, and
//! a [`Scene`] aggregating actor bounds for camera framing.

pub mod camera;
pub mod viewport;
pub mod scene;

pub use camera::*;
pub use viewport::*;
pub use scene::*;
