use crate::math::Vec3;

use super::support::Support;

/// One vertex of a GJK simplex: the Minkowski-difference point plus the
/// individual support points on each shape that produced it, carried along
/// so a final witness pair can be reconstructed from barycentric weights.
#[derive(Debug, Clone, Copy)]
pub struct SimplexPoint {
    pub diff: Vec3,
    pub on_a: Vec3,
    pub on_b: Vec3,
}

pub fn minkowski_support(a: &dyn Support, b: &dyn Support, direction: Vec3) -> SimplexPoint {
    let on_a = a.support(direction);
    let on_b = b.support(-direction);
    SimplexPoint { diff: on_a - on_b, on_a, on_b }
}

/// Closest point to the origin on segment `[a, b]`, clamped to the segment
/// (not the infinite line), with its barycentric weights `[u, v]`.
pub fn closest_on_segment(a: Vec3, b: Vec3) -> (Vec3, [f32; 2]) {
    let ab = b - a;
    let t = -a.dot(ab);
    let len2 = ab.length_squared();
    if len2 <= 1e-12 {
        return (a, [1.0, 0.0]);
    }
    let t = (t / len2).clamp(0.0, 1.0);
    (a + ab.scale(t), [1.0 - t, t])
}

/// Closest point to the origin on triangle `(a, b, c)`, clamped inside the
/// triangle (Ericson-style Voronoi region test), with barycentric weights.
pub fn closest_on_triangle(a: Vec3, b: Vec3, c: Vec3) -> (Vec3, [f32; 3]) {
    let ab = b - a;
    let ac = c - a;
    let ap = -a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return (a, [1.0, 0.0, 0.0]);
    }

    let bp = -b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return (b, [0.0, 1.0, 0.0]);
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return (a + ab.scale(v), [1.0 - v, v, 0.0]);
    }

    let cp = -c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return (c, [0.0, 0.0, 1.0]);
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return (a + ac.scale(w), [1.0 - w, 0.0, w]);
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (b + (c - b).scale(w), [0.0, 1.0 - w, w]);
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    (a + ab.scale(v) + ac.scale(w), [1.0 - v - w, v, w])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_on_segment_clamps_to_endpoint() {
        let (p, w) = closest_on_segment(Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(p, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(w, [1.0, 0.0]);
    }

    #[test]
    fn closest_on_segment_interior_projects_onto_origin() {
        let (p, _w) = closest_on_segment(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        assert!((p - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn closest_on_triangle_above_face_projects_straight_down() {
        let a = Vec3::new(-1.0, -1.0, 1.0);
        let b = Vec3::new(1.0, -1.0, 1.0);
        let c = Vec3::new(0.0, 1.0, 1.0);
        let (p, _w) = closest_on_triangle(a, b, c);
        assert!((p.z - 1.0).abs() < 1e-5);
        assert!(p.x.abs() < 1e-5);
    }
}
