use super::{Mat3, Quat, Vec3};

/// Rigid transform: rotation applied before translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: Mat3,
    pub translation: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        rotation: Mat3::IDENTITY,
        translation: Vec3::ZERO,
    };

    pub fn new(rotation: Mat3, translation: Vec3) -> Self {
        Self { rotation, translation }
    }

    pub fn from_quat(rotation: Quat, translation: Vec3) -> Self {
        Self { rotation: rotation.to_mat3(), translation }
    }

    pub fn is_finite(&self) -> bool {
        self.rotation.is_finite() && self.translation.is_finite()
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.mul_vec(p) + self.translation
    }

    /// Transform a direction: rotation only, no translation.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation.mul_vec(v)
    }

    /// Invert assuming `rotation` is orthonormal: transpose plus negated,
    /// rotated translation.
    pub fn inverse(&self) -> Transform {
        let inv_rot = self.rotation.transpose();
        Transform::new(inv_rot, inv_rot.mul_vec(-self.translation))
    }

    pub fn compose(&self, inner: &Transform) -> Transform {
        Transform::new(
            self.rotation.mul_mat(&inner.rotation),
            self.transform_point(inner.translation),
        )
    }
}

/// Build a rotation matrix for a right-handed rotation of `angle` radians
/// about `axis` (Rodrigues' formula).
pub fn rotation_matrix_from_axis_angle(axis: Vec3, angle: f32) -> Mat3 {
    let axis = axis.normalize();
    let (s, c) = (angle.sin(), angle.cos());
    let t = 1.0 - c;
    let Vec3 { x, y, z } = axis;
    Mat3::from_rows(
        Vec3::new(t * x * x + c, t * x * y - s * z, t * x * z + s * y),
        Vec3::new(t * x * y + s * z, t * y * y + c, t * y * z - s * x),
        Vec3::new(t * x * z - s * y, t * y * z + s * x, t * z * z + c),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_point_is_noop() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Transform::IDENTITY.transform_point(p), p);
    }

    #[test]
    fn inverse_of_translation_undoes_it() {
        let t = Transform::new(Mat3::IDENTITY, Vec3::new(5.0, 0.0, 0.0));
        let p = Vec3::new(1.0, 1.0, 1.0);
        let round_trip = t.inverse().transform_point(t.transform_point(p));
        assert!((round_trip - p).length() < 1e-5);
    }

    #[test]
    fn rotation_matrix_from_axis_angle_matches_quat() {
        let axis = Vec3::UNIT_Z;
        let angle = std::f32::consts::FRAC_PI_2;
        let from_rodrigues = rotation_matrix_from_axis_angle(axis, angle);
        let from_quat = Quat::axis_angle(axis, angle).to_mat3();
        let v = Vec3::new(1.0, 0.0, 0.0);
        let diff = from_rodrigues.mul_vec(v) - from_quat.mul_vec(v);
        assert!(diff.length() < 1e-5);
    }

    #[test]
    fn compose_applies_inner_then_outer() {
        let outer = Transform::new(Mat3::IDENTITY, Vec3::new(1.0, 0.0, 0.0));
        let inner = Transform::new(Mat3::IDENTITY, Vec3::new(0.0, 1.0, 0.0));
        let composed = outer.compose(&inner);
        assert_eq!(composed.transform_point(Vec3::ZERO), Vec3::new(1.0, 1.0, 0.0));
    }
}
