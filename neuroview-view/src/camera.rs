//! Camera utilities for 3D visualization

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

/// A 3D camera for viewing extracted surfaces
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub focal_point: Point3<f32>,
    pub view_up: Vector3<f32>,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(
        position: Point3<f32>,
        focal_point: Point3<f32>,
        view_up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            focal_point,
            view_up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.focal_point, &self.view_up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// Distance between position and focal point
    pub fn distance(&self) -> f32 {
        (self.position - self.focal_point).norm()
    }

    /// Dolly toward the focal point by a zoom factor (> 1 moves in).
    pub fn zoom(&mut self, factor: f32) {
        if factor <= 0.0 {
            return;
        }
        let offset = (self.position - self.focal_point) / factor;
        self.position = self.focal_point + offset;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            std::f32::consts::FRAC_PI_4,
            16.0 / 9.0,
            0.1,
            1000.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance() {
        let camera = Camera::default();
        assert_relative_eq!(camera.distance(), 5.0);
    }

    #[test]
    fn test_zoom_moves_toward_focal_point() {
        let mut camera = Camera::default();
        camera.zoom(1.8);
        assert_relative_eq!(camera.distance(), 5.0 / 1.8, epsilon = 1e-5);
        assert_eq!(camera.focal_point, Point3::origin());

        // Non-positive factors are ignored
        let before = camera.clone();
        camera.zoom(0.0);
        assert_eq!(camera, before);
    }

    #[test]
    fn test_view_matrix_looks_down_axis() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        // The focal point maps onto the negative view z axis
        let transformed = view.transform_point(&camera.focal_point);
        assert_relative_eq!(transformed.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(transformed.y, 0.0, epsilon = 1e-5);
        assert!(transformed.z < 0.0);
    }
}
