use crate::config::RotationInterpolation;
use crate::math::{clamp, lerp_vec, rotation_matrix_from_axis_angle, Quat, Transform, Vec3};

/// A motion sampled over `t ∈ [0, 1]` to produce a placing transform.
#[derive(Debug, Clone, Copy)]
pub enum Motion {
    /// Translation lerps start→end; rotation interpolates per the engine's
    /// configured mode (nlerp by default, slerp optionally).
    LinearInterp { start: Transform, end: Transform },
    /// Constant-velocity screw: axis-angle rotation plus axial and
    /// orthogonal translation, both scaled linearly by `t`.
    Screw {
        start: Transform,
        axis: Vec3,
        angular_velocity: f32,
        linear_velocity: f32,
        orthogonal_translation: Vec3,
    },
}

impl Motion {
    pub fn evaluate(&self, t: f32, rotation_interpolation: RotationInterpolation) -> Transform {
        let t = clamp(t, 0.0, 1.0);
        match self {
            Motion::LinearInterp { start, end } => {
                let translation = lerp_vec(start.translation, end.translation, t);
                let qa = Quat::from_mat3(start.rotation);
                let qb = Quat::from_mat3(end.rotation);
                let q = match rotation_interpolation {
                    RotationInterpolation::Nlerp => qa.nlerp(qb, t),
                    RotationInterpolation::Slerp => qa.slerp(qb, t),
                };
                Transform::from_quat(q, translation)
            }
            Motion::Screw { start, axis, angular_velocity, linear_velocity, orthogonal_translation } => {
                let delta_rotation = rotation_matrix_from_axis_angle(*axis, angular_velocity * t);
                let rotation = delta_rotation.mul_mat(&start.rotation);
                let translation =
                    start.translation + (axis.scale(*linear_velocity) + *orthogonal_translation).scale(t);
                Transform::new(rotation, translation)
            }
        }
    }

    /// Net translation over the full `[0, 1]` sweep, used only for the
    /// relative-speed gate between bisection and conservative advancement.
    pub fn translation_delta(&self) -> Vec3 {
        match self {
            Motion::LinearInterp { start, end } => end.translation - start.translation,
            Motion::Screw { axis, linear_velocity, orthogonal_translation, .. } => {
                axis.scale(*linear_velocity) + *orthogonal_translation
            }
        }
    }
}
