//! Continuous collision detection: find the first time along two motions
//! at which the swept shapes touch, gated between a bisection search
//! (near-stationary pairs) and conservative advancement (everything else).

mod motion;

pub use motion::Motion;

use crate::config::RotationInterpolation;
use crate::narrow::{self, ContactInfo};
use crate::registry::Snapshot;

const DEFAULT_TOLERANCE: f32 = 1e-4;
const DEFAULT_MAX_ITERATIONS: u32 = 64;
const RELATIVE_SPEED_EPSILON: f32 = 1e-8;

#[derive(Debug, Clone, Copy)]
pub struct CcdResult {
    pub intersecting: bool,
    pub time_of_impact: f64,
    pub contact: ContactInfo,
}

/// Sweep two snapshots along their motions and report the first
/// time-of-impact. `tolerance <= 0.0` and `max_iterations == 0` fall back to
/// the engine defaults rather than being treated as zero-budget queries.
pub fn continuous_collide(
    snapshot_a: &Snapshot,
    motion_a: &Motion,
    snapshot_b: &Snapshot,
    motion_b: &Motion,
    tolerance: f32,
    max_iterations: u32,
    rotation_interpolation: RotationInterpolation,
) -> CcdResult {
    let tolerance = if tolerance > 0.0 { tolerance } else { DEFAULT_TOLERANCE };
    let max_iterations = if max_iterations > 0 { max_iterations } else { DEFAULT_MAX_ITERATIONS };

    let speed = motion_a.translation_delta().length() + motion_b.translation_delta().length();
    if speed <= RELATIVE_SPEED_EPSILON {
        bisection(snapshot_a, motion_a, snapshot_b, motion_b, tolerance, max_iterations, rotation_interpolation)
    } else {
        conservative_advancement(
            snapshot_a,
            motion_a,
            snapshot_b,
            motion_b,
            tolerance,
            max_iterations,
            rotation_interpolation,
            speed,
        )
    }
}

fn bisection(
    snapshot_a: &Snapshot,
    motion_a: &Motion,
    snapshot_b: &Snapshot,
    motion_b: &Motion,
    tolerance: f32,
    max_iterations: u32,
    rotation_interpolation: RotationInterpolation,
) -> CcdResult {
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut intersecting = false;
    let mut contact = ContactInfo::ZERO;

    for _ in 0..max_iterations {
        let mid = (lo + hi) * 0.5;
        let xform_a = motion_a.evaluate(mid, rotation_interpolation);
        let xform_b = motion_b.evaluate(mid, rotation_interpolation);
        let (hit, hit_contact) = narrow::collide(snapshot_a, &xform_a, snapshot_b, &xform_b);
        intersecting = hit;
        contact = hit_contact;
        if hit {
            hi = mid;
        } else {
            lo = mid;
        }
        if hi - lo <= tolerance {
            break;
        }
    }

    let time_of_impact = if intersecting { hi } else { 1.0 };
    CcdResult {
        intersecting,
        time_of_impact: time_of_impact.clamp(0.0, 1.0) as f64,
        contact: if intersecting { contact } else { ContactInfo::ZERO },
    }
}

fn conservative_advancement(
    snapshot_a: &Snapshot,
    motion_a: &Motion,
    snapshot_b: &Snapshot,
    motion_b: &Motion,
    tolerance: f32,
    max_iterations: u32,
    rotation_interpolation: RotationInterpolation,
    speed: f32,
) -> CcdResult {
    let mut t = 0.0f32;

    for _ in 0..max_iterations {
        let xform_a = motion_a.evaluate(t, rotation_interpolation);
        let xform_b = motion_b.evaluate(t, rotation_interpolation);

        let (hit, contact) = narrow::collide(snapshot_a, &xform_a, snapshot_b, &xform_b);
        if hit {
            return CcdResult { intersecting: true, time_of_impact: (t as f64).clamp(0.0, 1.0), contact };
        }

        let (separation, _, _) = narrow::distance(snapshot_a, &xform_a, snapshot_b, &xform_b);
        if separation <= tolerance {
            break;
        }

        let advance = (separation / speed.max(RELATIVE_SPEED_EPSILON)).max(tolerance);
        t += advance;
        if t >= 1.0 {
            t = 1.0;
            break;
        }
    }

    CcdResult { intersecting: false, time_of_impact: (t as f64).clamp(0.0, 1.0), contact: ContactInfo::ZERO }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Mat3, Transform, Vec3};
    use crate::registry::{GeometryDescriptor, Registry};

    fn snapshot_for(registry: &Registry, descriptor: GeometryDescriptor) -> Snapshot {
        let handle = registry.create(descriptor).unwrap();
        let (token, snapshot) = registry.acquire(handle).unwrap();
        registry.release(token);
        snapshot
    }

    #[test]
    fn linear_sweep_into_stationary_sphere_reports_impact_before_end() {
        let registry = Registry::new();
        let a = snapshot_for(&registry, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 });
        let b = snapshot_for(
            &registry,
            GeometryDescriptor::Sphere { center: Vec3::new(6.0, 0.0, 0.0), radius: 1.0 },
        );

        let motion_a = Motion::LinearInterp {
            start: Transform::IDENTITY,
            end: Transform::new(Mat3::IDENTITY, Vec3::new(4.0, 0.0, 0.0)),
        };
        let motion_b = Motion::LinearInterp { start: Transform::IDENTITY, end: Transform::IDENTITY };

        let result = continuous_collide(&a, &motion_a, &b, &motion_b, 1e-4, 64, RotationInterpolation::Nlerp);
        assert!(result.intersecting);
        assert!(result.time_of_impact > 0.0 && result.time_of_impact < 1.0);
    }

    #[test]
    fn linear_sweep_that_never_reaches_target_reports_no_impact() {
        let registry = Registry::new();
        let a = snapshot_for(&registry, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 });
        let b = snapshot_for(
            &registry,
            GeometryDescriptor::Sphere { center: Vec3::new(10.0, 0.0, 0.0), radius: 1.0 },
        );

        let motion_a = Motion::LinearInterp {
            start: Transform::IDENTITY,
            end: Transform::new(Mat3::IDENTITY, Vec3::new(4.0, 0.0, 0.0)),
        };
        let motion_b = Motion::LinearInterp { start: Transform::IDENTITY, end: Transform::IDENTITY };

        let result = continuous_collide(&a, &motion_a, &b, &motion_b, 1e-4, 64, RotationInterpolation::Nlerp);
        assert!(!result.intersecting);
        assert_eq!(result.time_of_impact, 1.0);
    }

    #[test]
    fn stationary_pair_uses_bisection_path_and_terminates() {
        let registry = Registry::new();
        let a = snapshot_for(&registry, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 });
        let b = snapshot_for(
            &registry,
            GeometryDescriptor::Sphere { center: Vec3::new(0.5, 0.0, 0.0), radius: 1.0 },
        );
        let stationary = Motion::LinearInterp { start: Transform::IDENTITY, end: Transform::IDENTITY };

        let result = continuous_collide(&a, &stationary, &b, &stationary, 1e-4, 64, RotationInterpolation::Nlerp);
        assert!(result.intersecting);
    }

    #[test]
    fn zero_tolerance_and_iterations_fall_back_to_defaults() {
        let registry = Registry::new();
        let a = snapshot_for(&registry, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 });
        let b = snapshot_for(
            &registry,
            GeometryDescriptor::Sphere { center: Vec3::new(6.0, 0.0, 0.0), radius: 1.0 },
        );
        let motion_a = Motion::LinearInterp {
            start: Transform::IDENTITY,
            end: Transform::new(Mat3::IDENTITY, Vec3::new(4.0, 0.0, 0.0)),
        };
        let motion_b = Motion::LinearInterp { start: Transform::IDENTITY, end: Transform::IDENTITY };

        let result = continuous_collide(&a, &motion_a, &b, &motion_b, 0.0, 0, RotationInterpolation::Nlerp);
        assert!(result.intersecting);
    }
}
