//! Core data structures and traits for neuroview
//!
//! This crate provides the fundamental types shared by the neuroview
//! pipeline: volumetric scalar grids, triangle and triangle-strip
//! meshes, material properties, viewer configuration, and errors.

pub mod volume;
pub mod mesh;
pub mod material;
pub mod config;
pub mod traits;
pub mod error;

pub use volume::*;
pub use mesh::*;
pub use material::*;
pub use config::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Common result type for neuroview operations
pub type Result<T> = std::result::Result<T, Error>;
