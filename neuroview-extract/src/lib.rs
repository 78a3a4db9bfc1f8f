//! Iso-surface extraction for neuroview
//!
//! This crate turns volumetric scalar data into triangle meshes using
//! lookup-table marching cubes. Extraction works over the
//! [`ScalarField`] seam so the same marcher serves both policies:
//! continuous structural data (one scalar cutoff) and discrete
//! segmentation data (a per-label binary mask contoured at 0.5).
//!
//! An extraction that finds no geometry is a valid outcome, reported
//! as an empty mesh rather than an error; it means the requested
//! surface is simply not present in the data.

pub mod field;
pub mod iso;
pub mod labels;
pub mod parallel;

mod tables;

pub use field::*;
pub use iso::*;
pub use labels::*;
