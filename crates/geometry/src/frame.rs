//! Local orthonormal frames for growth along a direction.

use crate::transform::Transform;
use glam::Vec3;

/// Orthonormal axis triple attached to a growing face.
///
/// `x` points along the growth direction, `y` lies in the horizontal plane
/// (the horizontal projection of `x` turned a quarter turn about +Z), and
/// `z = x × y`. Rotating about `x` spins the growth in place, rotations about
/// `y` and `z` bend it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

impl LocalFrame {
    /// Derive the frame for `direction`. Returns `None` for a zero direction.
    pub fn from_direction(direction: Vec3) -> Option<Self> {
        let x = direction.try_normalize()?;
        // Quarter turn of the horizontal projection: (a, b, 0) -> (b, -a, 0).
        let y = Vec3::new(x.y, -x.x, 0.0)
            .try_normalize()
            .unwrap_or_else(|| x.any_orthonormal_vector());
        let z = x.cross(y).normalize();
        Some(Self { x, y, z })
    }

    /// Rotation `Rz * Ry * Rx` with the given angles (radians) about the local axes.
    pub fn rotation(&self, angle_x: f32, angle_y: f32, angle_z: f32) -> Transform {
        Transform::from_axis_angle(self.z, angle_z)
            * Transform::from_axis_angle(self.y, angle_y)
            * Transform::from_axis_angle(self.x, angle_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(f: &LocalFrame) {
        for axis in [f.x, f.y, f.z] {
            assert!((axis.length() - 1.0).abs() < 1e-5);
        }
        assert!(f.x.dot(f.y).abs() < 1e-5);
        assert!(f.x.dot(f.z).abs() < 1e-5);
        assert!(f.y.dot(f.z).abs() < 1e-5);
    }

    #[test]
    fn horizontal_direction_frame() {
        let f = LocalFrame::from_direction(Vec3::new(2.0, 0.0, 0.0)).unwrap();
        assert_eq!(f.x, Vec3::X);
        assert_eq!(f.y, -Vec3::Y);
        assert!((f.z - -Vec3::Z).length() < 1e-6);
        assert_orthonormal(&f);
    }

    #[test]
    fn tilted_direction_is_orthonormal() {
        let f = LocalFrame::from_direction(Vec3::new(0.3, -0.8, 0.5)).unwrap();
        assert_orthonormal(&f);
        assert_eq!(f.y.z, 0.0);
    }

    #[test]
    fn vertical_direction_falls_back() {
        let f = LocalFrame::from_direction(Vec3::Z).unwrap();
        assert_orthonormal(&f);
    }

    #[test]
    fn zero_direction_has_no_frame() {
        assert!(LocalFrame::from_direction(Vec3::ZERO).is_none());
    }

    #[test]
    fn zero_angles_give_identity_rotation() {
        let f = LocalFrame::from_direction(Vec3::new(1.0, 1.0, 0.2)).unwrap();
        let p = Vec3::new(0.4, -0.2, 1.0);
        assert!((f.rotation(0.0, 0.0, 0.0).transform_point(p) - p).length() < 1e-6);
    }
}
