use crate::math::{Vec3, SINGULARITY_EPSILON};

use super::simplex::{minkowski_support, SimplexPoint};
use super::support::Support;

pub const MAX_ITERATIONS: u32 = 128;

fn same_direction(a: Vec3, b: Vec3) -> bool {
    a.dot(b) > 0.0
}

fn any_perpendicular(v: Vec3) -> Vec3 {
    let candidate = if v.x.abs() < 0.9 { Vec3::UNIT_X } else { Vec3::UNIT_Y };
    v.cross(candidate).normalize()
}

/// Reduce the simplex to the feature closest to the origin and produce the
/// next search direction. Returns `true` when the simplex has grown to a
/// tetrahedron enclosing the origin (termination: intersecting).
fn next_direction(simplex: &mut Vec<SimplexPoint>, direction: &mut Vec3) -> bool {
    match simplex.len() {
        2 => {
            line_case(simplex, direction);
            false
        }
        3 => {
            triangle_case(simplex, direction);
            false
        }
        4 => tetrahedron_case(simplex, direction),
        _ => unreachable!("simplex size out of range"),
    }
}

fn line_case(simplex: &mut Vec<SimplexPoint>, direction: &mut Vec3) {
    let a = simplex[1];
    let b = simplex[0];
    let ab = b.diff - a.diff;
    let ao = -a.diff;

    if same_direction(ab, ao) {
        let perp = ab.cross(ao).cross(ab);
        *direction = if perp.length() > SINGULARITY_EPSILON { perp } else { any_perpendicular(ab) };
    } else {
        *simplex = vec![a];
        *direction = ao;
    }
}

fn triangle_case(simplex: &mut Vec<SimplexPoint>, direction: &mut Vec3) {
    let a = simplex[2];
    let b = simplex[1];
    let c = simplex[0];
    let ab = b.diff - a.diff;
    let ac = c.diff - a.diff;
    let ao = -a.diff;
    let abc = ab.cross(ac);

    if same_direction(abc.cross(ac), ao) {
        if same_direction(ac, ao) {
            *simplex = vec![c, a];
            line_case(simplex, direction);
        } else {
            *simplex = vec![b, a];
            line_case(simplex, direction);
        }
    } else if same_direction(ab.cross(abc), ao) {
        *simplex = vec![b, a];
        line_case(simplex, direction);
    } else if same_direction(abc, ao) {
        *simplex = vec![c, b, a];
        *direction = abc;
    } else {
        *simplex = vec![b, c, a];
        *direction = -abc;
    }
}

fn tetrahedron_case(simplex: &mut Vec<SimplexPoint>, direction: &mut Vec3) -> bool {
    let a = simplex[3];
    let b = simplex[2];
    let c = simplex[1];
    let d = simplex[0];
    let ab = b.diff - a.diff;
    let ac = c.diff - a.diff;
    let ad = d.diff - a.diff;
    let ao = -a.diff;

    let abc = ab.cross(ac);
    let acd = ac.cross(ad);
    let adb = ad.cross(ab);

    if same_direction(abc, ao) {
        *simplex = vec![c, b, a];
        triangle_case(simplex, direction);
        return false;
    }
    if same_direction(acd, ao) {
        *simplex = vec![d, c, a];
        triangle_case(simplex, direction);
        return false;
    }
    if same_direction(adb, ao) {
        *simplex = vec![b, d, a];
        triangle_case(simplex, direction);
        return false;
    }
    true
}

/// Standard GJK termination test: grow a simplex of Minkowski-difference
/// support points toward the origin, reducing to the closest feature each
/// iteration. Reports `intersecting = false` (never a partial contact) if
/// the iteration cap is exhausted without a conclusive simplex.
pub fn intersect(a: &dyn Support, b: &dyn Support, max_iterations: u32) -> bool {
    intersect_with_simplex(a, b, max_iterations).is_some()
}

/// Same termination test, but on a positive result also returns the
/// enclosing tetrahedron simplex so [`super::epa`] can expand it.
pub fn intersect_with_simplex(
    a: &dyn Support,
    b: &dyn Support,
    max_iterations: u32,
) -> Option<Vec<SimplexPoint>> {
    let seed = b.center() - a.center();
    let mut direction = if seed.length() > SINGULARITY_EPSILON { seed } else { Vec3::UNIT_X };

    let mut simplex = vec![minkowski_support(a, b, direction)];
    direction = -simplex[0].diff;
    if direction.length() <= SINGULARITY_EPSILON {
        direction = Vec3::UNIT_X;
    }

    for _ in 0..max_iterations {
        let point = minkowski_support(a, b, direction);
        if point.diff.dot(direction) < 0.0 {
            return None;
        }
        simplex.push(point);

        let enclosed = if simplex.len() < 4 {
            next_direction(&mut simplex, &mut direction)
        } else {
            tetrahedron_case(&mut simplex, &mut direction)
        };
        if enclosed {
            return Some(simplex);
        }

        if direction.length() <= SINGULARITY_EPSILON {
            return Some(simplex);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrow::support::ShapeSupport;

    fn sphere(center: Vec3, radius: f32) -> ShapeSupport {
        ShapeSupport::Sphere { center, radius }
    }

    #[test]
    fn overlapping_spheres_intersect() {
        let a = sphere(Vec3::ZERO, 1.0);
        let b = sphere(Vec3::new(1.0, 0.0, 0.0), 1.0);
        assert!(intersect(&a, &b, MAX_ITERATIONS));
    }

    #[test]
    fn separated_spheres_do_not_intersect() {
        let a = sphere(Vec3::ZERO, 1.0);
        let b = sphere(Vec3::new(10.0, 0.0, 0.0), 1.0);
        assert!(!intersect(&a, &b, MAX_ITERATIONS));
    }

    #[test]
    fn nearly_touching_spheres_report_intersecting() {
        let a = sphere(Vec3::ZERO, 1.0);
        let b = sphere(Vec3::new(1.99, 0.0, 0.0), 1.0);
        assert!(intersect(&a, &b, MAX_ITERATIONS));
    }

    #[test]
    fn concentric_spheres_intersect() {
        let a = sphere(Vec3::ZERO, 1.0);
        let b = sphere(Vec3::ZERO, 1.0);
        assert!(intersect(&a, &b, MAX_ITERATIONS));
    }
}
