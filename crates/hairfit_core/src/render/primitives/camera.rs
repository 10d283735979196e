//! # Free-fly Camera
//!
//! First-person camera used to inspect the head and hair from any angle.
//! Orientation is stored as yaw/pitch in degrees; the front vector is derived
//! from them after every change.
//!
//! ## Coordinate System
//! Right-handed, Y-up. A yaw of -90 degrees with zero pitch looks down -Z.

use serde::{Deserialize, Serialize};

use crate::core::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Pitch limit used when constraining mouse look
pub const PITCH_LIMIT: f32 = 89.0;

/// Keyboard movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraMovement {
    /// Along the view direction
    Forward,
    /// Against the view direction
    Backward,
    /// Strafe left
    Left,
    /// Strafe right
    Right,
}

/// Free-fly perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct FreeFlyCamera {
    position: Vec3,
    front: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    movement_speed: f32,
    mouse_sensitivity: f32,
    fov: f32,
    min_fov: f32,
    max_fov: f32,
    near: f32,
    far: f32,
}

impl FreeFlyCamera {
    /// Create a camera from configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: Vec3::from(config.position),
            front: Vec3::new(0.0, 0.0, -1.0),
            world_up: Vec3::y(),
            yaw: config.yaw,
            pitch: config.pitch,
            movement_speed: config.movement_speed,
            mouse_sensitivity: config.mouse_sensitivity,
            fov: utils::clamp(config.fov, config.min_fov, config.max_fov),
            min_fov: config.min_fov,
            max_fov: config.max_fov,
            near: config.near,
            far: config.far,
        };
        camera.update_camera_vectors();
        camera
    }

    /// Apply a mouse delta (pixels) to yaw and pitch
    ///
    /// With `constrain_pitch` the pitch stays within ±[`PITCH_LIMIT`] so the
    /// view never flips over the pole.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = utils::clamp(self.pitch, -PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_camera_vectors();
    }

    /// Move along the view plane for `delta_time` seconds
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let right = self.right();

        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= right * velocity,
            CameraMovement::Right => self.position += right * velocity,
        }
        log::trace!("Camera position updated to: {:?}", self.position);
    }

    /// Zoom by narrowing or widening the field of view
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.fov = utils::clamp(self.fov - y_offset, self.min_fov, self.max_fov);
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        let camera_up = self.right().cross(&self.front).normalize();
        Mat4::look_at(self.position, self.position + self.front, camera_up)
    }

    /// Perspective projection for a viewport aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(utils::deg_to_rad(self.fov), aspect, self.near, self.far)
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit view direction
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Yaw in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Degrees per pixel of mouse movement
    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    fn right(&self) -> Vec3 {
        self.front.cross(&self.world_up).normalize()
    }

    fn update_camera_vectors(&mut self) {
        let (yaw, pitch) = (utils::deg_to_rad(self.yaw), utils::deg_to_rad(self.pitch));
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
    }
}

impl Default for FreeFlyCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_default_camera_looks_down_negative_z() {
        let camera = FreeFlyCamera::default();
        assert_relative_eq!(camera.front(), Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(camera.position(), Vec3::new(0.0, 0.5, 5.0), epsilon = EPSILON);
        assert_eq!(camera.fov(), 60.0);
    }

    #[test]
    fn test_pitch_is_constrained() {
        let mut camera = FreeFlyCamera::default();
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(camera.pitch(), PITCH_LIMIT);

        camera.process_mouse_movement(0.0, -100_000.0, true);
        assert_eq!(camera.pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn test_unconstrained_pitch_passes_limit() {
        let mut camera = FreeFlyCamera::default();
        camera.process_mouse_movement(0.0, 1_000.0, false);
        assert_relative_eq!(camera.pitch(), 100.0, epsilon = EPSILON);
    }

    #[test]
    fn test_keyboard_movement() {
        let mut camera = FreeFlyCamera::default();
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert_relative_eq!(camera.position(), Vec3::new(0.0, 0.5, 2.5), epsilon = EPSILON);

        camera.process_keyboard(CameraMovement::Right, 2.0);
        assert_relative_eq!(camera.position(), Vec3::new(5.0, 0.5, 2.5), epsilon = EPSILON);

        camera.process_keyboard(CameraMovement::Left, 2.0);
        camera.process_keyboard(CameraMovement::Backward, 1.0);
        assert_relative_eq!(camera.position(), Vec3::new(0.0, 0.5, 5.0), epsilon = EPSILON);
    }

    #[test]
    fn test_scroll_zoom_is_clamped() {
        let mut camera = FreeFlyCamera::default();
        camera.process_mouse_scroll(10.0);
        assert_eq!(camera.fov(), 50.0);

        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.fov(), 30.0);

        camera.process_mouse_scroll(-500.0);
        assert_eq!(camera.fov(), 90.0);
    }

    #[test]
    fn test_view_matrix_puts_camera_at_origin() {
        let camera = FreeFlyCamera::default();
        let eye_in_view = camera.view_matrix().transform_point(&Point3::from(camera.position()));
        assert_relative_eq!(eye_in_view.coords, Vec3::zeros(), epsilon = EPSILON);
    }
}
