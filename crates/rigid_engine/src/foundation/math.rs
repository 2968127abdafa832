//! Math utilities and types
//!
//! Provides the fundamental math types for the simulation core.

pub use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// Rigid placement of a body: translation plus a 3x3 orientation matrix.
///
/// Orientation is stored as a rotation matrix and advanced with the
/// exponential map rather than a quaternion, so there is no per-step
/// renormalization. Each increment is itself a proper rotation, which keeps
/// the matrix approximately orthonormal across many steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateFrame {
    /// World-space translation
    pub translation: Vec3,

    /// World-space orientation matrix
    pub orientation: Mat3,
}

impl Default for CoordinateFrame {
    fn default() -> Self {
        Self::identity()
    }
}

impl CoordinateFrame {
    /// Create an identity frame at the origin
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            orientation: Mat3::identity(),
        }
    }

    /// Create a frame with only a translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            orientation: Mat3::identity(),
        }
    }

    /// Transform a local-space point into world space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.orientation * point + self.translation
    }

    /// Transform a world-space point into local space
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.orientation.transpose() * (point - self.translation)
    }

    /// Rotate a local-space direction into world space
    pub fn rotate_vector(&self, direction: Vec3) -> Vec3 {
        self.orientation * direction
    }

    /// Rotate a world-space direction into local space
    pub fn inverse_rotate_vector(&self, direction: Vec3) -> Vec3 {
        self.orientation.transpose() * direction
    }

    /// Get the inverse frame
    ///
    /// The orientation transpose is the inverse while the matrix stays
    /// approximately orthonormal.
    pub fn inverse(&self) -> Self {
        let transposed = self.orientation.transpose();
        Self {
            translation: transposed * -self.translation,
            orientation: transposed,
        }
    }

    /// Advance the orientation by an angular velocity over `dt` seconds
    ///
    /// Uses the exponential map (`Rotation3::new` on the scaled axis). The
    /// total rotation angle is clamped to `max_angle` radians so a single
    /// step cannot spin a body far enough to destabilize the integration.
    pub fn integrate_rotation(&mut self, angular_velocity: Vec3, dt: f32, max_angle: f32) {
        let mut scaled_axis = angular_velocity * dt;
        let angle = scaled_axis.norm();
        if angle <= f32::EPSILON {
            return;
        }
        if angle > max_angle {
            scaled_axis *= max_angle / angle;
        }
        self.orientation = Rotation3::new(scaled_axis).into_inner() * self.orientation;
    }

    /// Interpolate between two frames at parameter `t` in [0, 1]
    ///
    /// Translation interpolates linearly; orientation goes through a
    /// quaternion slerp so the result remains a rotation.
    pub fn interpolate(start: &Self, end: &Self, t: f32) -> Self {
        let qa = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
            start.orientation,
        ));
        let qb = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
            end.orientation,
        ));
        Self {
            translation: start.translation + (end.translation - start.translation) * t,
            orientation: qa.slerp(&qb, t).to_rotation_matrix().into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_point_round_trip() {
        let mut frame = CoordinateFrame::from_translation(Vec3::new(1.0, 2.0, 3.0));
        frame.integrate_rotation(Vec3::new(0.3, -0.7, 0.5), 1.0, f32::INFINITY);

        let point = Vec3::new(-4.0, 0.5, 9.0);
        let round_trip = frame.inverse_transform_point(frame.transform_point(point));
        assert_relative_eq!(round_trip, point, epsilon = 1e-4);
    }

    #[test]
    fn test_integrate_rotation_stays_orthonormal() {
        let mut frame = CoordinateFrame::identity();
        for _ in 0..1000 {
            frame.integrate_rotation(Vec3::new(1.0, 2.0, -0.5), 1.0 / 120.0, 0.25);
        }

        let product = frame.orientation * frame.orientation.transpose();
        assert_relative_eq!(product, Mat3::identity(), epsilon = 1e-3);
    }

    #[test]
    fn test_integrate_rotation_clamps_large_steps() {
        let mut clamped = CoordinateFrame::identity();
        clamped.integrate_rotation(Vec3::new(1000.0, 0.0, 0.0), 1.0, 0.25);

        let mut reference = CoordinateFrame::identity();
        reference.integrate_rotation(Vec3::new(0.25, 0.0, 0.0), 1.0, f32::INFINITY);

        assert_relative_eq!(clamped.orientation, reference.orientation, epsilon = 1e-5);
    }

    #[test]
    fn test_interpolate_endpoints() {
        let start = CoordinateFrame::from_translation(Vec3::new(0.0, 0.0, 0.0));
        let mut end = CoordinateFrame::from_translation(Vec3::new(10.0, 0.0, 0.0));
        end.integrate_rotation(Vec3::new(0.0, 1.0, 0.0), 1.0, f32::INFINITY);

        let at_start = CoordinateFrame::interpolate(&start, &end, 0.0);
        let at_end = CoordinateFrame::interpolate(&start, &end, 1.0);
        let halfway = CoordinateFrame::interpolate(&start, &end, 0.5);

        assert_relative_eq!(at_start.translation, start.translation, epsilon = 1e-5);
        assert_relative_eq!(at_end.translation, end.translation, epsilon = 1e-5);
        assert_relative_eq!(at_end.orientation, end.orientation, epsilon = 1e-4);
        assert_relative_eq!(halfway.translation, Vec3::new(5.0, 0.0, 0.0), epsilon = 1e-5);
    }
}
