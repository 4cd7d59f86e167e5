use super::{Mat3, Vec3, SINGULARITY_EPSILON};

/// Unit quaternion `(w, x, y, z)`.
///
/// Invariant: normalized on construction, with singularity fallback to
/// identity when the source length is `<= 1e-6`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };

    /// Construct and normalize; falls back to identity for near-zero input.
    pub fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        let len = (w * w + x * x + y * y + z * z).sqrt();
        if len <= SINGULARITY_EPSILON {
            Quat::IDENTITY
        } else {
            let inv = 1.0 / len;
            Quat { w: w * inv, x: x * inv, y: y * inv, z: z * inv }
        }
    }

    pub fn is_finite(self) -> bool {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn dot(self, rhs: Quat) -> f32 {
        self.w * rhs.w + self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn axis_angle(axis: Vec3, angle: f32) -> Quat {
        let axis = axis.normalize();
        let half = angle * 0.5;
        let s = half.sin();
        Quat::new(half.cos(), axis.x * s, axis.y * s, axis.z * s)
    }

    /// Normalized linear interpolation: component lerp then renormalize.
    /// Cheaper than [`Quat::slerp`]; loses angular-velocity uniformity for
    /// large angles.
    pub fn nlerp(self, rhs: Quat, t: f32) -> Quat {
        let rhs = if self.dot(rhs) < 0.0 {
            Quat { w: -rhs.w, x: -rhs.x, y: -rhs.y, z: -rhs.z }
        } else {
            rhs
        };
        Quat::new(
            self.w + (rhs.w - self.w) * t,
            self.x + (rhs.x - self.x) * t,
            self.y + (rhs.y - self.y) * t,
            self.z + (rhs.z - self.z) * t,
        )
    }

    /// Spherical linear interpolation; falls back to [`Quat::nlerp`] when the
    /// two orientations are nearly coincident (unstable sin(theta) divisor).
    pub fn slerp(self, rhs: Quat, t: f32) -> Quat {
        let mut rhs = rhs;
        let mut cos_theta = self.dot(rhs);
        if cos_theta < 0.0 {
            rhs = Quat { w: -rhs.w, x: -rhs.x, y: -rhs.y, z: -rhs.z };
            cos_theta = -cos_theta;
        }
        if cos_theta > 0.9995 {
            return self.nlerp(rhs, t);
        }
        let theta = cos_theta.acos();
        let sin_theta = theta.sin();
        let a = ((1.0 - t) * theta).sin() / sin_theta;
        let b = (t * theta).sin() / sin_theta;
        Quat::new(
            self.w * a + rhs.w * b,
            self.x * a + rhs.x * b,
            self.y * a + rhs.y * b,
            self.z * a + rhs.z * b,
        )
    }

    pub fn to_mat3(self) -> Mat3 {
        let Quat { w, x, y, z } = self;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);
        Mat3::from_rows(
            Vec3::new(1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy)),
            Vec3::new(2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx)),
            Vec3::new(2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy)),
        )
    }

    pub fn from_mat3(m: Mat3) -> Quat {
        let trace = m.rows[0].x + m.rows[1].y + m.rows[2].z;
        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Quat::new(
                0.25 * s,
                (m.rows[2].y - m.rows[1].z) / s,
                (m.rows[0].z - m.rows[2].x) / s,
                (m.rows[1].x - m.rows[0].y) / s,
            )
        } else if m.rows[0].x > m.rows[1].y && m.rows[0].x > m.rows[2].z {
            let s = (1.0 + m.rows[0].x - m.rows[1].y - m.rows[2].z).sqrt() * 2.0;
            Quat::new(
                (m.rows[2].y - m.rows[1].z) / s,
                0.25 * s,
                (m.rows[0].y + m.rows[1].x) / s,
                (m.rows[0].z + m.rows[2].x) / s,
            )
        } else if m.rows[1].y > m.rows[2].z {
            let s = (1.0 + m.rows[1].y - m.rows[0].x - m.rows[2].z).sqrt() * 2.0;
            Quat::new(
                (m.rows[0].z - m.rows[2].x) / s,
                (m.rows[0].y + m.rows[1].x) / s,
                0.25 * s,
                (m.rows[1].z + m.rows[2].y) / s,
            )
        } else {
            let s = (1.0 + m.rows[2].z - m.rows[0].x - m.rows[1].y).sqrt() * 2.0;
            Quat::new(
                (m.rows[0].y - m.rows[1].x) / s,
                (m.rows[0].z + m.rows[2].x) / s,
                (m.rows[1].z + m.rows[2].y) / s,
                0.25 * s,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_zero_quaternion_falls_back_to_identity() {
        assert_eq!(Quat::new(0.0, 0.0, 0.0, 0.0), Quat::IDENTITY);
    }

    #[test]
    fn axis_angle_roundtrips_through_matrix() {
        let q = Quat::axis_angle(Vec3::UNIT_Z, std::f32::consts::FRAC_PI_2);
        let m = q.to_mat3();
        let back = Quat::from_mat3(m);
        assert!((q.dot(back).abs() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn nlerp_at_zero_and_one_returns_endpoints() {
        let a = Quat::IDENTITY;
        let b = Quat::axis_angle(Vec3::UNIT_Y, 1.0);
        assert!((a.nlerp(b, 0.0).dot(a).abs() - 1.0).abs() < 1e-4);
        assert!((a.nlerp(b, 1.0).dot(b).abs() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn slerp_matches_nlerp_for_close_orientations() {
        let a = Quat::IDENTITY;
        let b = Quat::axis_angle(Vec3::UNIT_X, 0.001);
        let s = a.slerp(b, 0.5);
        let n = a.nlerp(b, 0.5);
        assert!((s.dot(n).abs() - 1.0).abs() < 1e-3);
    }
}
