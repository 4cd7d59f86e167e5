//! Pair-type dispatch: analytic routines for Sphere/Sphere, Sphere/OBB, and
//! OBB/OBB; a generic support-function path (GJK intersection test, MPR
//! penetration extraction, OBBRSS pre-pruning) for anything else, which in
//! practice means any pair involving a `Mesh`.

mod analytic;
mod distance;
mod epa;
mod gjk;
mod mpr;
mod simplex;
mod support;

pub use epa::penetration as epa_penetration;
pub use support::{shape_support, ShapeSupport, Support};

use crate::bounds::Obbrss;
use crate::math::Transform;
use crate::registry::{GeometryKind, Snapshot};

/// Fixed-layout contact record. Zero-initialized (`ContactInfo::ZERO`) when
/// there is no collision; never partially populated on a negative result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactInfo {
    pub point_on_a: crate::math::Vec3,
    pub point_on_b: crate::math::Vec3,
    pub normal: crate::math::Vec3,
    pub penetration: f32,
}

impl ContactInfo {
    pub const ZERO: ContactInfo = ContactInfo {
        point_on_a: crate::math::Vec3::ZERO,
        point_on_b: crate::math::Vec3::ZERO,
        normal: crate::math::Vec3::ZERO,
        penetration: 0.0,
    };
}

impl Default for ContactInfo {
    fn default() -> Self {
        ContactInfo::ZERO
    }
}

fn generic_pre_prune(a: &ShapeSupport, b: &ShapeSupport) -> bool {
    Obbrss::overlap(&a.bounding_volume(), &b.bounding_volume())
}

/// Run the full dispatch matrix on two placed snapshots: analytic routine
/// when one exists for the pair, otherwise OBBRSS pre-pruning followed by
/// GJK and, on a positive result, MPR for the penetration witness.
pub fn collide(a: &Snapshot, xform_a: &Transform, b: &Snapshot, xform_b: &Transform) -> (bool, ContactInfo) {
    use GeometryKind::*;
    match (a.kind, b.kind) {
        (Sphere, Sphere) => {
            let (sa, sb) = (sphere_data(a), sphere_data(b));
            analytic::sphere_sphere(sa, xform_a, sb, xform_b)
        }
        (Sphere, Obb) => analytic::sphere_obb(sphere_data(a), xform_a, obb_data(b), xform_b),
        (Obb, Sphere) => analytic::obb_sphere(obb_data(a), xform_a, sphere_data(b), xform_b),
        (Obb, Obb) => analytic::obb_obb(obb_data(a), xform_a, obb_data(b), xform_b),
        _ => generic_collide(a, xform_a, b, xform_b),
    }
}

fn generic_collide(a: &Snapshot, xform_a: &Transform, b: &Snapshot, xform_b: &Transform) -> (bool, ContactInfo) {
    let support_a = shape_support(a, xform_a);
    let support_b = shape_support(b, xform_b);

    if !generic_pre_prune(&support_a, &support_b) {
        return (false, ContactInfo::ZERO);
    }
    if !gjk::intersect(&support_a, &support_b, gjk::MAX_ITERATIONS) {
        return (false, ContactInfo::ZERO);
    }
    match mpr::penetration(&support_a, &support_b, mpr::MPR_MAX_ITERATIONS) {
        Some(contact) => (true, contact),
        None => (false, ContactInfo::ZERO),
    }
}

/// Separation distance and closest-point witnesses. Uses an analytic
/// shortcut for sphere pairs and sphere/box pairs; falls back to the
/// generic support-based closest-points search otherwise.
pub fn distance(
    a: &Snapshot,
    xform_a: &Transform,
    b: &Snapshot,
    xform_b: &Transform,
) -> (f32, crate::math::Vec3, crate::math::Vec3) {
    use GeometryKind::*;
    match (a.kind, b.kind) {
        (Sphere, Sphere) => {
            let (intersecting, contact) = {
                let (sa, sb) = (sphere_data(a), sphere_data(b));
                analytic::sphere_sphere(sa, xform_a, sb, xform_b)
            };
            sphere_pair_distance(a, xform_a, b, xform_b, intersecting, contact)
        }
        (Sphere, Obb) | (Obb, Sphere) => {
            let support_a = shape_support(a, xform_a);
            let support_b = shape_support(b, xform_b);
            distance::closest_points(&support_a, &support_b, gjk::MAX_ITERATIONS)
        }
        _ => {
            let support_a = shape_support(a, xform_a);
            let support_b = shape_support(b, xform_b);
            distance::closest_points(&support_a, &support_b, gjk::MAX_ITERATIONS)
        }
    }
}

fn sphere_pair_distance(
    a: &Snapshot,
    xform_a: &Transform,
    b: &Snapshot,
    xform_b: &Transform,
    intersecting: bool,
    contact: ContactInfo,
) -> (f32, crate::math::Vec3, crate::math::Vec3) {
    if intersecting {
        return (0.0, contact.point_on_a, contact.point_on_b);
    }
    let support_a = shape_support(a, xform_a);
    let support_b = shape_support(b, xform_b);
    distance::closest_points(&support_a, &support_b, gjk::MAX_ITERATIONS)
}

fn sphere_data(snapshot: &Snapshot) -> &crate::registry::SphereData {
    match &snapshot.payload {
        crate::registry::SnapshotPayload::Sphere(data) => data,
        _ => unreachable!("dispatch matrix guarantees payload matches kind"),
    }
}

fn obb_data(snapshot: &Snapshot) -> &crate::registry::ObbData {
    match &snapshot.payload {
        crate::registry::SnapshotPayload::Obb(data) => data,
        _ => unreachable!("dispatch matrix guarantees payload matches kind"),
    }
}
