//! Transform type and utilities for moving vertex groups.

use glam::{Mat4, Quat, Vec3};
use std::ops::Mul;

/// An affine transform: uniform scale, then rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    /// Create a pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Create a rotation of `angle` radians about `axis` (need not be unit length).
    /// A zero axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return Self::IDENTITY;
        }
        Self {
            rotation: Quat::from_axis_angle(axis, angle),
            ..Self::IDENTITY
        }
    }

    /// Create a uniform scale about the origin.
    pub fn from_scale(scale: f32) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    /// Build the 4x4 matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.translation)
    }

    /// Apply the transform to a point.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (point * self.scale) + self.translation
    }

    /// Apply only the linear part (rotation and scale) to a direction.
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * (vector * self.scale)
    }

    /// Matrix that applies this transform with `pivot` treated as the origin.
    pub fn about_pivot(&self, pivot: Vec3) -> Mat4 {
        Mat4::from_translation(pivot) * self.to_matrix() * Mat4::from_translation(-pivot)
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.translation += delta;
    }
}

/// `a * b` applies `b` first, then `a`.
impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            translation: self.transform_point(rhs.translation),
            rotation: (self.rotation * rhs.rotation).normalize(),
            scale: self.scale * rhs.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn axis_rotation_quarter_turn() {
        let t = Transform::from_axis_angle(Vec3::Z * 3.0, FRAC_PI_2);
        assert!(approx(t.transform_point(Vec3::X), Vec3::Y));
    }

    #[test]
    fn zero_axis_is_identity() {
        let t = Transform::from_axis_angle(Vec3::ZERO, 1.0);
        assert_eq!(t, Transform::IDENTITY);
    }

    #[test]
    fn composition_matches_matrix_product() {
        let a = Transform::from_axis_angle(Vec3::new(1.0, 2.0, 0.5), 0.7);
        let b = Transform::from_translation(Vec3::new(0.3, -1.0, 2.0)) * Transform::from_scale(0.9);
        let p = Vec3::new(0.25, 1.5, -0.75);

        let composed = (a * b).transform_point(p);
        let via_matrix = (a.to_matrix() * b.to_matrix()).transform_point3(p);
        assert!(approx(composed, via_matrix));
        assert!(approx(composed, a.transform_point(b.transform_point(p))));
    }

    #[test]
    fn scale_about_pivot_keeps_pivot_fixed() {
        let pivot = Vec3::new(1.0, 2.0, 3.0);
        let m = Transform::from_scale(0.5).about_pivot(pivot);
        assert!(approx(m.transform_point3(pivot), pivot));
        assert!(approx(m.transform_point3(pivot + Vec3::X), pivot + Vec3::X * 0.5));
    }
}
