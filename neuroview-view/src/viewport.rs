//! Anatomical camera presets
//!
//! Three re-enterable view states: axial (from superior), coronal
//! (from anterior), and sagittal (from the left). A transition resets
//! the camera framing to the full scene bounds, recomputes the
//! viewing distance from the live camera geometry, repositions
//! position and view-up by the preset's fixed convention, then applies
//! a fixed zoom. Nothing is cached between transitions, so the same
//! preset over the same scene always lands on the same camera.

use nalgebra::{Point3, Vector3};
use neuroview_core::Point3f;

use crate::camera::Camera;

/// The three anatomical viewing directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPreset {
    /// Looking down the z axis from above the head
    Axial,
    /// Looking along the y axis from the front
    Coronal,
    /// Looking along the x axis from the left side
    Sagittal,
}

/// Applies view presets to a camera over a scene.
#[derive(Debug, Clone)]
pub struct ViewportController {
    /// Zoom factor applied after each transition
    pub zoom: f32,
}

impl ViewportController {
    pub fn new(zoom: f32) -> Self {
        Self { zoom }
    }

    /// Transition the camera to a preset over the given scene bounds.
    pub fn apply(&self, camera: &mut Camera, preset: ViewPreset, bounds: (Point3f, Point3f)) {
        self.reset_framing(camera, bounds);

        let distance = camera.distance();
        let focal = camera.focal_point;

        let (position, view_up) = match preset {
            ViewPreset::Axial => (
                Point3::new(focal.x, focal.y, focal.z + distance),
                Vector3::new(0.0, -1.0, 0.0),
            ),
            ViewPreset::Coronal => (
                Point3::new(focal.x, focal.y - distance, focal.z),
                Vector3::new(0.0, 0.0, 1.0),
            ),
            ViewPreset::Sagittal => (
                Point3::new(focal.x - distance, focal.y, focal.z),
                Vector3::new(0.0, 0.0, 1.0),
            ),
        };
        camera.position = position;
        camera.view_up = view_up;

        camera.zoom(self.zoom);
        log::debug!(
            "camera preset {:?}: position {:?}, distance {}",
            preset,
            camera.position,
            camera.distance()
        );
    }

    /// Re-frame the camera on the whole scene: center the focal point
    /// and back the position off along the current view direction far
    /// enough to fit the bounding sphere in the vertical field of view.
    fn reset_framing(&self, camera: &mut Camera, bounds: (Point3f, Point3f)) {
        let (min, max) = bounds;
        let center = Point3::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        );
        let radius = ((max - min).norm() / 2.0).max(1e-3);

        let direction = {
            let d = camera.position - camera.focal_point;
            if d.norm() > 1e-6 {
                d.normalize()
            } else {
                Vector3::z()
            }
        };

        let distance = radius / (camera.fov / 2.0).tan();
        camera.focal_point = center;
        camera.position = center + direction * distance;
        camera.near = (distance - 2.0 * radius).max(distance * 0.01);
        camera.far = distance + 2.0 * radius;
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self { zoom: 1.8 }
    }
}
