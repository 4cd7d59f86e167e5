use crate::math::Vec3;

use super::gjk::intersect_with_simplex;
use super::simplex::SimplexPoint;
use super::support::Support;
use super::ContactInfo;

const EPA_TOLERANCE: f32 = 1e-4;
const EPA_MAX_ITERATIONS: u32 = 64;

#[derive(Clone, Copy)]
struct Face {
    indices: [usize; 3],
    normal: Vec3,
    distance: f32,
}

fn make_face(points: &[SimplexPoint], indices: [usize; 3]) -> Face {
    let a = points[indices[0]].diff;
    let b = points[indices[1]].diff;
    let c = points[indices[2]].diff;
    let mut normal = (b - a).cross(c - a).normalize();
    if normal.dot(a) < 0.0 {
        normal = -normal;
    }
    Face { indices, normal, distance: normal.dot(a) }
}

fn initial_polytope(points: &[SimplexPoint]) -> Vec<Face> {
    vec![
        make_face(points, [0, 1, 2]),
        make_face(points, [0, 3, 1]),
        make_face(points, [0, 2, 3]),
        make_face(points, [1, 3, 2]),
    ]
}

/// Expand a GJK-terminating tetrahedron into a penetration normal, depth,
/// and a witness point pair, by iteratively replacing the closest face
/// with a fan of faces through a new support point until the polytope
/// surface converges to within [`EPA_TOLERANCE`] of the true boundary.
///
/// Kept for callers that want a penetration result straight from a GJK
/// simplex; the engine's own dispatch uses MPR instead (cheaper, same
/// result to working tolerance).
pub fn penetration(a: &dyn Support, b: &dyn Support, max_iterations: u32) -> Option<ContactInfo> {
    let simplex = intersect_with_simplex(a, b, max_iterations)?;
    if simplex.len() < 4 {
        return None;
    }

    let mut points = simplex;
    let mut faces = initial_polytope(&points);

    for _ in 0..EPA_MAX_ITERATIONS {
        let (closest_idx, closest) = faces
            .iter()
            .enumerate()
            .min_by(|(_, x), (_, y)| x.distance.partial_cmp(&y.distance).unwrap())
            .map(|(i, f)| (i, *f))?;

        let support = super::simplex::minkowski_support(a, b, closest.normal);
        let support_distance = support.diff.dot(closest.normal);

        if support_distance - closest.distance < EPA_TOLERANCE {
            return Some(face_contact(&points, &closest));
        }

        let new_index = points.len();
        points.push(support);

        let mut edges: Vec<(usize, usize)> = Vec::new();
        faces.retain(|face| {
            if face.normal.dot(support.diff - points[face.indices[0]].diff) > 0.0 {
                add_edge(&mut edges, (face.indices[0], face.indices[1]));
                add_edge(&mut edges, (face.indices[1], face.indices[2]));
                add_edge(&mut edges, (face.indices[2], face.indices[0]));
                false
            } else {
                true
            }
        });

        let _ = closest_idx;
        for (i, j) in edges {
            faces.push(make_face(&points, [i, j, new_index]));
        }
    }

    None
}

fn add_edge(edges: &mut Vec<(usize, usize)>, edge: (usize, usize)) {
    if let Some(pos) = edges.iter().position(|&(a, b)| a == edge.1 && b == edge.0) {
        edges.remove(pos);
    } else {
        edges.push(edge);
    }
}

fn face_contact(points: &[SimplexPoint], face: &Face) -> ContactInfo {
    let a = points[face.indices[0]];
    let b = points[face.indices[1]];
    let c = points[face.indices[2]];
    let (_closest, weights) = super::simplex::closest_on_triangle(a.diff, b.diff, c.diff);
    let point_on_a = a.on_a.scale(weights[0]) + b.on_a.scale(weights[1]) + c.on_a.scale(weights[2]);
    let point_on_b = a.on_b.scale(weights[0]) + b.on_b.scale(weights[1]) + c.on_b.scale(weights[2]);
    ContactInfo {
        point_on_a,
        point_on_b,
        normal: face.normal,
        penetration: face.distance.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrow::support::ShapeSupport;

    fn sphere(center: Vec3, radius: f32) -> ShapeSupport {
        ShapeSupport::Sphere { center, radius }
    }

    #[test]
    fn penetration_depth_matches_sphere_overlap() {
        let a = sphere(Vec3::ZERO, 1.0);
        let b = sphere(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let contact = penetration(&a, &b, 128).expect("spheres overlap");
        assert!((contact.penetration - 0.5).abs() < 1e-2);
    }

    #[test]
    fn penetration_returns_none_when_separated() {
        let a = sphere(Vec3::ZERO, 1.0);
        let b = sphere(Vec3::new(10.0, 0.0, 0.0), 1.0);
        assert!(penetration(&a, &b, 128).is_none());
    }
}
