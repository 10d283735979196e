//! Hair placement transform
//!
//! Position, three independent Euler angles and a uniform scale, composed into
//! a model matrix in a fixed order:
//!
//! ```text
//! M = T(position) * Ry(yaw) * Rx(pitch) * Rz(roll) * S(scale)
//! ```
//!
//! Applied right to left, a vertex is scaled first, then rolled, pitched,
//! yawed and finally translated. Baked files depend on this order, so it must
//! not change.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Smallest allowed uniform scale
pub const MIN_SCALE: f32 = 0.1;

/// Scale of a freshly created transform
pub const DEFAULT_SCALE: f32 = 0.5;

/// Hair color of a freshly created transform
pub const DEFAULT_COLOR: [f32; 3] = [0.5, 0.3, 0.2];

/// Hair mesh path of a freshly created transform
pub const DEFAULT_MODEL_PATH: &str = "models/hair_front.obj";

/// World units per second per unit of held input
pub const POSITION_RATE: f32 = 0.5;

/// Scale units per second per unit of held input
pub const SCALE_RATE: f32 = 0.05;

/// Degrees per second per unit of held input
pub const ROTATION_RATE: f32 = 5.0;

/// Placement of the hair mesh relative to the head
///
/// Rotation angles are in degrees and are never wrapped. Scale never drops
/// below [`MIN_SCALE`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialTransform {
    position: Vec3,
    scale: f32,
    rotation_y: f32,
    rotation_x: f32,
    rotation_z: f32,
    color: Vec3,
    model_path: String,
}

impl Default for SpatialTransform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            scale: DEFAULT_SCALE,
            rotation_y: 0.0,
            rotation_x: 0.0,
            rotation_z: 0.0,
            color: Vec3::from(DEFAULT_COLOR),
            model_path: DEFAULT_MODEL_PATH.to_string(),
        }
    }
}

impl SpatialTransform {
    /// Transform with default placement
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity placement: origin, no rotation, scale 1
    pub fn identity() -> Self {
        let mut transform = Self::default();
        transform.reset(1.0);
        transform
    }

    /// Zero position and rotation and set the scale
    ///
    /// Color and model path are kept.
    pub fn reset(&mut self, target_scale: f32) {
        self.position = Vec3::zeros();
        self.rotation_y = 0.0;
        self.rotation_x = 0.0;
        self.rotation_z = 0.0;
        self.set_scale(target_scale);
    }

    /// `position += delta * POSITION_RATE * dt`
    pub fn adjust_position(&mut self, dx: f32, dy: f32, dz: f32, delta_time: f32) {
        self.position += Vec3::new(dx, dy, dz) * POSITION_RATE * delta_time;
    }

    /// `scale += delta * SCALE_RATE * dt`, floored at [`MIN_SCALE`]
    pub fn adjust_scale(&mut self, amount: f32, delta_time: f32) {
        self.set_scale(self.scale + amount * SCALE_RATE * delta_time);
    }

    /// Add `delta * ROTATION_RATE * dt` to each angle
    pub fn adjust_rotation(&mut self, yaw: f32, pitch: f32, roll: f32, delta_time: f32) {
        let step = ROTATION_RATE * delta_time;
        self.rotation_y += yaw * step;
        self.rotation_x += pitch * step;
        self.rotation_z += roll * step;
    }

    /// Set position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set scale, floored at [`MIN_SCALE`]
    pub fn set_scale(&mut self, scale: f32) {
        // NaN fails the comparison and lands on the floor too
        self.scale = if scale >= MIN_SCALE { scale } else { MIN_SCALE };
    }

    /// Set all three angles in degrees
    pub fn set_rotation(&mut self, yaw: f32, pitch: f32, roll: f32) {
        self.rotation_y = yaw;
        self.rotation_x = pitch;
        self.rotation_z = roll;
    }

    /// Set the display color
    pub fn set_color(&mut self, color: Vec3) {
        self.color = color;
    }

    /// Set the path the hair mesh was loaded from
    pub fn set_model_path(&mut self, path: impl Into<String>) {
        self.model_path = path.into();
    }

    /// Position in world units
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Uniform scale
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Yaw (around Y) in degrees
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Pitch (around X) in degrees
    pub fn rotation_x(&self) -> f32 {
        self.rotation_x
    }

    /// Roll (around Z) in degrees
    pub fn rotation_z(&self) -> f32 {
        self.rotation_z
    }

    /// Display color
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Path of the hair mesh this transform belongs to
    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Position adjustment rate
    pub const fn adjust_speed(&self) -> f32 {
        POSITION_RATE
    }

    /// Scale adjustment rate
    pub const fn scale_speed(&self) -> f32 {
        SCALE_RATE
    }

    /// Rotation adjustment rate
    pub const fn rotation_speed(&self) -> f32 {
        ROTATION_RATE
    }

    /// Compose `T * Ry * Rx * Rz * S`
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * Mat4::rotation_y(utils::deg_to_rad(self.rotation_y))
            * Mat4::rotation_x(utils::deg_to_rad(self.rotation_x))
            * Mat4::rotation_z(utils::deg_to_rad(self.rotation_z))
            * Mat4::new_scaling(self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_defaults() {
        let transform = SpatialTransform::new();
        assert_eq!(transform.position(), Vec3::zeros());
        assert_eq!(transform.scale(), DEFAULT_SCALE);
        assert_eq!(transform.model_path(), DEFAULT_MODEL_PATH);
        assert_eq!(transform.color(), Vec3::new(0.5, 0.3, 0.2));
    }

    #[test]
    fn test_identity_transform_yields_identity_matrix() {
        let transform = SpatialTransform::identity();
        assert_relative_eq!(transform.model_matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_composition_order_fixture() {
        // Scale to (0, 0, -2), yaw 90 carries it to (-2, 0, 0), translate to (-1, 0, 0)
        let mut transform = SpatialTransform::new();
        transform.set_position(Vec3::new(1.0, 0.0, 0.0));
        transform.set_rotation(90.0, 0.0, 0.0);
        transform.set_scale(2.0);

        let moved = transform.model_matrix().transform_point(&Point3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(moved.coords, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_translation_is_applied_after_rotation() {
        let mut transform = SpatialTransform::identity();
        transform.set_position(Vec3::new(1.0, 0.0, 0.0));
        transform.set_rotation(90.0, 0.0, 0.0);
        let rotate_then_translate = transform.model_matrix();

        let translate_then_rotate = Mat4::rotation_y(utils::deg_to_rad(90.0))
            * Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0));

        let origin = Point3::origin();
        assert_relative_eq!(rotate_then_translate.transform_point(&origin).coords, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(translate_then_rotate.transform_point(&origin).coords, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_roll_applies_before_yaw() {
        // Roll 90 takes +X to +Y, yaw leaves +Y alone
        let mut transform = SpatialTransform::identity();
        transform.set_rotation(90.0, 0.0, 90.0);
        let moved = transform.model_matrix().transform_vector(&Vec3::x());
        assert_relative_eq!(moved, Vec3::y(), epsilon = 1e-5);
    }

    #[test]
    fn test_adjust_position_uses_rate_and_delta() {
        let mut transform = SpatialTransform::new();
        transform.adjust_position(1.0, -2.0, 0.0, 0.5);
        assert_relative_eq!(transform.position(), Vec3::new(0.25, -0.5, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_adjust_scale_never_below_floor() {
        let mut transform = SpatialTransform::new();
        for _ in 0..1_000 {
            transform.adjust_scale(-1_000.0, 10.0);
            assert!(transform.scale() >= MIN_SCALE);
        }
        assert_eq!(transform.scale(), MIN_SCALE);

        transform.adjust_scale(f32::MIN, f32::MAX);
        assert_eq!(transform.scale(), MIN_SCALE);

        transform.adjust_scale(2.0, 1.0);
        assert_relative_eq!(transform.scale(), MIN_SCALE + 0.1, epsilon = EPSILON);
    }

    #[test]
    fn test_set_scale_is_floored() {
        let mut transform = SpatialTransform::new();
        transform.set_scale(0.0);
        assert_eq!(transform.scale(), MIN_SCALE);
        transform.set_scale(f32::NAN);
        assert_eq!(transform.scale(), MIN_SCALE);
    }

    #[test]
    fn test_rotation_is_not_wrapped() {
        let mut transform = SpatialTransform::new();
        transform.adjust_rotation(1.0, -1.0, 2.0, 100.0);
        assert_eq!(transform.rotation_y(), 500.0);
        assert_eq!(transform.rotation_x(), -500.0);
        assert_eq!(transform.rotation_z(), 1000.0);
    }

    #[test]
    fn test_reset_keeps_color_and_path() {
        let mut transform = SpatialTransform::new();
        transform.set_position(Vec3::new(3.0, 2.0, 1.0));
        transform.set_rotation(10.0, 20.0, 30.0);
        transform.set_color(Vec3::new(1.0, 0.0, 0.0));
        transform.set_model_path("models/bangs.obj");

        transform.reset(1.5);

        assert_eq!(transform.position(), Vec3::zeros());
        assert_eq!(
            (transform.rotation_y(), transform.rotation_x(), transform.rotation_z()),
            (0.0, 0.0, 0.0)
        );
        assert_eq!(transform.scale(), 1.5);
        assert_eq!(transform.color(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(transform.model_path(), "models/bangs.obj");
    }
}
