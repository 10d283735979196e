//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of matrix builders the
//! placement pipeline and the camera need.

pub use nalgebra::{Matrix3, Matrix4, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Rotation around the X axis (radians, right-handed)
    fn rotation_x(angle: f32) -> Mat4;

    /// Rotation around the Y axis (radians, right-handed)
    fn rotation_y(angle: f32) -> Mat4;

    /// Rotation around the Z axis (radians, right-handed)
    fn rotation_z(angle: f32) -> Mat4;

    /// Right-handed perspective projection with a [-1, 1] depth range
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Upper-left 3x3 block (the linear part of an affine transform)
    fn linear_part(&self) -> Mat3;

    /// Transpose of the inverse of the linear part
    ///
    /// Returns `None` when the linear part is singular.
    fn normal_matrix(&self) -> Option<Mat3>;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = -(far + near) / (far - near);
        result[(2, 3)] = -(2.0 * far * near) / (far - near);
        result[(3, 2)] = -1.0;

        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new_translation(&-eye);

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }

    fn linear_part(&self) -> Mat3 {
        self.fixed_view::<3, 3>(0, 0).into_owned()
    }

    fn normal_matrix(&self) -> Option<Mat3> {
        self.linear_part().try_inverse().map(|inverse| inverse.transpose())
    }
}
