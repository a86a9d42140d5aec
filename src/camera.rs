//! Orbit camera for the galaxy viewer.

use glam::{Mat4, Vec3};

/// Orbit camera circling a target point.
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl Camera {
    pub const FOV_Y: f32 = 45.0;
    pub const Z_NEAR: f32 = 0.1;
    pub const Z_FAR: f32 = 1000.0;

    /// Pitch is kept shy of the poles so the up vector stays valid.
    pub const PITCH_LIMIT: f32 = 1.5;
    pub const MIN_DISTANCE: f32 = 0.5;
    pub const MAX_DISTANCE: f32 = 60.0;

    /// Create a new camera with default positioning: six units out, slightly
    /// above the galactic plane.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.5,
            distance: 6.0,
            target: Vec3::ZERO,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Combined view-projection matrix for the given viewport aspect ratio.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj =
            Mat4::perspective_rh(Self::FOV_Y.to_radians(), aspect, Self::Z_NEAR, Self::Z_FAR);
        proj * self.view_matrix()
    }

    /// Apply a mouse-drag rotation delta in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Apply a scroll-wheel zoom delta.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance =
            (self.distance - scroll * 0.3).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_on_axis() {
        let camera = Camera {
            yaw: 0.0,
            pitch: 0.0,
            distance: 6.0,
            target: Vec3::ZERO,
        };
        assert!((camera.position() - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-6);
    }

    #[test]
    fn test_view_matrix_looks_at_target() {
        let camera = Camera::new();
        // The target sits straight ahead of the camera, one distance away.
        let in_view = camera.view_matrix().transform_point3(camera.target);
        assert!((in_view - Vec3::new(0.0, 0.0, -camera.distance)).length() < 1e-4);
    }

    #[test]
    fn test_pitch_and_distance_clamps() {
        let mut camera = Camera::new();
        camera.rotate(0.0, 1e6);
        assert_eq!(camera.pitch, Camera::PITCH_LIMIT);

        camera.zoom(1e6);
        assert_eq!(camera.distance, Camera::MIN_DISTANCE);
        camera.zoom(-1e6);
        assert_eq!(camera.distance, Camera::MAX_DISTANCE);
    }
}
