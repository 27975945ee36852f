//! Perspective camera shared by the backdrop visuals.

use glam::{Mat4, Vec3};

/// Perspective camera looking at a fixed target.
///
/// Field of view is vertical and stored in degrees, matching how backdrop
/// options express it.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_deg: f32,
    /// Width / height of the drawable area.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl PerspectiveCamera {
    /// Camera on the +Z axis at `distance`, looking at the origin.
    pub fn new(fov_deg: f32, aspect: f32, distance: f32) -> Self {
        Self {
            fov_deg,
            aspect,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
        }
    }

    /// Sets the aspect ratio from a drawable size. Degenerate sizes are ignored.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            self.aspect = width / height;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 1.0, 5.0)
    }
}
