use crate::math::{Vec3, SINGULARITY_EPSILON};

use super::simplex::{minkowski_support, SimplexPoint};
use super::support::Support;
use super::ContactInfo;

pub const MPR_TOLERANCE: f32 = 1e-4;
pub const MPR_MAX_ITERATIONS: u32 = 64;

/// Minkowski Portal Refinement: given two already-overlapping shapes,
/// converge a triangular "portal" facing the ray from an interior point
/// through the origin onto the true Minkowski-difference boundary, then
/// read off normal, depth, and witness points from the converged portal.
///
/// Returns `None` if the shapes turn out not to overlap along the way (the
/// caller is expected to have already established intersection via GJK;
/// this is a defensive check, not a second independent test).
pub fn penetration(a: &dyn Support, b: &dyn Support, max_iterations: u32) -> Option<ContactInfo> {
    let center_diff = b.center() - a.center();
    let v0 = if center_diff.length() > SINGULARITY_EPSILON { center_diff } else { Vec3::new(1e-4, 0.0, 0.0) };

    let mut n = -v0;
    let mut p1 = minkowski_support(a, b, n);
    if p1.diff.dot(n) <= 0.0 {
        return None;
    }

    n = p1.diff.cross(v0);
    if n.length_squared() <= SINGULARITY_EPSILON {
        n = (p1.diff - v0).normalize();
    }
    let mut p2 = minkowski_support(a, b, n);
    if p2.diff.dot(n) <= 0.0 {
        return None;
    }

    n = (p1.diff - v0).cross(p2.diff - v0);
    if n.dot(v0) > 0.0 {
        std::mem::swap(&mut p1, &mut p2);
        n = -n;
    }

    let mut p3;
    loop {
        p3 = minkowski_support(a, b, n);
        if p3.diff.dot(n) <= 0.0 {
            return None;
        }

        if p3.diff.cross(p1.diff).dot(v0) < 0.0 {
            p2 = p3;
            n = (p1.diff - v0).cross(p2.diff - v0);
            continue;
        }
        if p3.diff.cross(p2.diff).dot(v0) > 0.0 {
            p1 = p3;
            n = (p1.diff - v0).cross(p2.diff - v0);
            continue;
        }
        break;
    }

    for _ in 0..max_iterations.max(1) {
        n = (p2.diff - p1.diff).cross(p3.diff - p1.diff);
        let len = n.length();
        if len <= SINGULARITY_EPSILON {
            break;
        }
        n = n.scale(1.0 / len);
        if n.dot(p1.diff) < 0.0 {
            n = -n;
        }

        let support_depth = n.dot(p1.diff);
        let candidate = minkowski_support(a, b, n);
        let candidate_depth = candidate.diff.dot(n);

        if candidate_depth - support_depth < MPR_TOLERANCE {
            return Some(portal_contact(p1, p2, p3, n, candidate_depth.max(0.0)));
        }

        if candidate.diff.cross(p1.diff).dot(v0) < 0.0 {
            if candidate.diff.cross(p2.diff).dot(v0) < 0.0 {
                p1 = candidate;
            } else {
                p3 = candidate;
            }
        } else if candidate.diff.cross(p3.diff).dot(v0) < 0.0 {
            p2 = candidate;
        } else {
            p1 = candidate;
        }
    }

    None
}

fn portal_contact(p1: SimplexPoint, p2: SimplexPoint, p3: SimplexPoint, normal: Vec3, depth: f32) -> ContactInfo {
    let (_closest, weights) = super::simplex::closest_on_triangle(p1.diff, p2.diff, p3.diff);
    let point_on_a = p1.on_a.scale(weights[0]) + p2.on_a.scale(weights[1]) + p3.on_a.scale(weights[2]);
    let point_on_b = p1.on_b.scale(weights[0]) + p2.on_b.scale(weights[1]) + p3.on_b.scale(weights[2]);
    ContactInfo { point_on_a, point_on_b, normal, penetration: depth }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrow::support::ShapeSupport;

    fn sphere(center: Vec3, radius: f32) -> ShapeSupport {
        ShapeSupport::Sphere { center, radius }
    }

    fn tetrahedron(offset: Vec3) -> ShapeSupport {
        use crate::bounds::Obbrss;
        let world_vertices = vec![
            offset,
            offset + Vec3::UNIT_X,
            offset + Vec3::UNIT_Y,
            offset + Vec3::UNIT_Z,
        ];
        ShapeSupport::Mesh { world_vertices, root_volume: Obbrss::empty() }
    }

    #[test]
    fn penetration_depth_is_plausible_for_overlapping_spheres() {
        let a = sphere(Vec3::ZERO, 1.0);
        let b = sphere(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let contact = penetration(&a, &b, MPR_MAX_ITERATIONS).expect("overlapping");
        assert!(contact.penetration > 0.0 && contact.penetration < 1.0);
        assert!(contact.normal.dot(Vec3::UNIT_X) > 0.0);
    }

    #[test]
    fn deeply_overlapping_spheres_report_larger_depth() {
        let a = sphere(Vec3::ZERO, 1.0);
        let b = sphere(Vec3::new(0.5, 0.0, 0.0), 1.0);
        let contact = penetration(&a, &b, MPR_MAX_ITERATIONS).expect("overlapping");
        assert!(contact.penetration > 1.0);
    }

    #[test]
    fn exhausting_a_zero_iteration_cap_reports_no_contact_instead_of_a_partial_one() {
        let a = tetrahedron(Vec3::ZERO);
        let b = tetrahedron(Vec3::new(0.25, 0.25, 0.25));
        assert!(penetration(&a, &b, 0).is_none());
    }
}
