use crate::math::{Vec3, SINGULARITY_EPSILON};

use super::simplex::{closest_on_segment, closest_on_triangle, minkowski_support, SimplexPoint};
use super::support::Support;

const CONVERGENCE_TOLERANCE: f32 = 1e-5;

struct Candidate {
    point: Vec3,
    indices: Vec<usize>,
    weights: Vec<f32>,
}

fn best_subset(points: &[SimplexPoint]) -> Candidate {
    let mut best: Option<Candidate> = None;
    let mut consider = |point: Vec3, indices: Vec<usize>, weights: Vec<f32>| {
        let dist = point.length_squared();
        if best.as_ref().map(|b| dist < b.point.length_squared()).unwrap_or(true) {
            best = Some(Candidate { point, indices, weights });
        }
    };

    for i in 0..points.len() {
        consider(points[i].diff, vec![i], vec![1.0]);
    }
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let (p, w) = closest_on_segment(points[i].diff, points[j].diff);
            consider(p, vec![i, j], w.to_vec());
        }
    }
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            for k in (j + 1)..points.len() {
                let (p, w) = closest_on_triangle(points[i].diff, points[j].diff, points[k].diff);
                consider(p, vec![i, j, k], w.to_vec());
            }
        }
    }

    best.expect("points is non-empty")
}

fn witnesses(points: &[SimplexPoint], candidate: &Candidate) -> (Vec3, Vec3) {
    let mut on_a = Vec3::ZERO;
    let mut on_b = Vec3::ZERO;
    for (idx, &weight) in candidate.indices.iter().zip(candidate.weights.iter()) {
        on_a = on_a + points[*idx].on_a.scale(weight);
        on_b = on_b + points[*idx].on_b.scale(weight);
    }
    (on_a, on_b)
}

/// Separation distance and closest-point witnesses between two shapes that
/// are not (or not known to be) intersecting. Iteratively refines a small
/// simplex of Minkowski-difference support points, each step searching in
/// the direction of the simplex's closest point to the origin, and stops
/// when a new support point brings no further improvement.
///
/// Returns `0.0` with the simplex's current closest-feature witnesses if
/// the shapes turn out to overlap (origin inside the simplex).
pub fn closest_points(a: &dyn Support, b: &dyn Support, max_iterations: u32) -> (f32, Vec3, Vec3) {
    let seed = b.center() - a.center();
    let direction = if seed.length() > SINGULARITY_EPSILON { seed } else { Vec3::UNIT_X };
    let mut points = vec![minkowski_support(a, b, direction)];

    for _ in 0..max_iterations.max(1) {
        let candidate = best_subset(&points);
        let distance = candidate.point.length();

        if distance <= SINGULARITY_EPSILON {
            let (on_a, on_b) = witnesses(&points, &candidate);
            return (0.0, on_a, on_b);
        }

        let search_direction = -candidate.point.scale(1.0 / distance);
        let new_point = minkowski_support(a, b, search_direction);
        let projected = new_point.diff.dot(search_direction);

        if projected - distance < CONVERGENCE_TOLERANCE {
            let (on_a, on_b) = witnesses(&points, &candidate);
            return (distance, on_a, on_b);
        }

        let mut next_points: Vec<SimplexPoint> = candidate.indices.iter().map(|&i| points[i]).collect();
        next_points.push(new_point);
        points = next_points;
    }

    let candidate = best_subset(&points);
    let (on_a, on_b) = witnesses(&points, &candidate);
    (candidate.point.length(), on_a, on_b)
}
