use crate::math::{Mat3, Transform, Vec3, LINEAR_EPSILON, SINGULARITY_EPSILON};
use crate::registry::{ObbData, SphereData};

use super::ContactInfo;

fn world_sphere(data: &SphereData, transform: &Transform) -> (Vec3, f32) {
    (transform.transform_point(data.center), data.radius)
}

fn world_obb(data: &ObbData, transform: &Transform) -> (Vec3, Mat3, Vec3) {
    let center = transform.transform_point(data.center);
    let rotation = transform.rotation.mul_mat(&data.rotation);
    (center, rotation, data.half_extents)
}

/// `d = |c_b - c_a|`, colliding iff `d^2 <= (r_a+r_b)^2 + LINEAR_EPSILON`.
pub fn sphere_sphere(
    a: &SphereData,
    xform_a: &Transform,
    b: &SphereData,
    xform_b: &Transform,
) -> (bool, ContactInfo) {
    let (center_a, radius_a) = world_sphere(a, xform_a);
    let (center_b, radius_b) = world_sphere(b, xform_b);

    let d = center_b - center_a;
    let d2 = d.length_squared();
    let r = radius_a + radius_b;

    if d2 > r * r + LINEAR_EPSILON {
        return (false, ContactInfo::ZERO);
    }

    let dist = d2.sqrt();
    let normal = if dist > SINGULARITY_EPSILON { d.scale(1.0 / dist) } else { Vec3::UNIT_X };
    let penetration = (r - dist).max(0.0);
    let contact = ContactInfo {
        point_on_a: center_a + normal.scale(radius_a),
        point_on_b: center_b - normal.scale(radius_b),
        normal,
        penetration,
    };
    (true, contact)
}

/// Clamp the sphere center (transformed into the box's local frame) to the
/// box extents; the clamped point re-expressed in world space is the
/// closest point on the box.
pub fn sphere_obb(
    sphere: &SphereData,
    xform_sphere: &Transform,
    obb: &ObbData,
    xform_obb: &Transform,
) -> (bool, ContactInfo) {
    let (sphere_center, radius) = world_sphere(sphere, xform_sphere);
    let (box_center, box_rotation, half_extents) = world_obb(obb, xform_obb);

    let local = sphere_center - box_center;
    let local_coords = Vec3::new(
        local.dot(box_rotation.column(0)),
        local.dot(box_rotation.column(1)),
        local.dot(box_rotation.column(2)),
    );
    let clamped = Vec3::new(
        local_coords.x.clamp(-half_extents.x, half_extents.x),
        local_coords.y.clamp(-half_extents.y, half_extents.y),
        local_coords.z.clamp(-half_extents.z, half_extents.z),
    );
    let closest = box_center
        + box_rotation.column(0).scale(clamped.x)
        + box_rotation.column(1).scale(clamped.y)
        + box_rotation.column(2).scale(clamped.z);

    let delta = sphere_center - closest;
    let d2 = delta.length_squared();
    if d2 > radius * radius + LINEAR_EPSILON {
        return (false, ContactInfo::ZERO);
    }

    let dist = d2.sqrt();
    let normal = if dist > SINGULARITY_EPSILON { delta.scale(1.0 / dist) } else { Vec3::UNIT_X };
    let contact = ContactInfo {
        point_on_a: sphere_center - normal.scale(radius),
        point_on_b: closest,
        normal,
        penetration: (radius - dist).max(0.0),
    };
    (true, contact)
}

/// `Obb × Sphere`: delegate to [`sphere_obb`] with operands swapped, then
/// invert the normal and swap the witness points back into A/B order.
pub fn obb_sphere(
    obb: &ObbData,
    xform_obb: &Transform,
    sphere: &SphereData,
    xform_sphere: &Transform,
) -> (bool, ContactInfo) {
    let (intersecting, contact) = sphere_obb(sphere, xform_sphere, obb, xform_obb);
    if !intersecting {
        return (false, ContactInfo::ZERO);
    }
    let flipped = ContactInfo {
        point_on_a: contact.point_on_b,
        point_on_b: contact.point_on_a,
        normal: -contact.normal,
        penetration: contact.penetration,
    };
    (true, flipped)
}

const AXIS_EPSILON: f32 = crate::math::AXIS_EPSILON;
const PROJECTION_TOLERANCE: f32 = 1e-5;

/// Same 15-axis SAT as [`crate::bounds::Obbrss::overlap`], but additionally
/// tracks the axis of minimum overlap across all non-separating axes to
/// produce a contact normal and penetration depth.
pub fn obb_obb(a: &ObbData, xform_a: &Transform, b: &ObbData, xform_b: &Transform) -> (bool, ContactInfo) {
    let (center_a, rot_a, extents_a) = world_obb(a, xform_a);
    let (center_b, rot_b, extents_b) = world_obb(b, xform_b);
    let axes_a = [rot_a.column(0), rot_a.column(1), rot_a.column(2)];
    let axes_b = [rot_b.column(0), rot_b.column(1), rot_b.column(2)];
    let extents_a = [extents_a.x, extents_a.y, extents_a.z];
    let extents_b = [extents_b.x, extents_b.y, extents_b.z];

    let mut r = [[0.0f32; 3]; 3];
    let mut abs_r = [[0.0f32; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            r[i][j] = axes_a[i].dot(axes_b[j]);
            abs_r[i][j] = r[i][j].abs() + AXIS_EPSILON;
        }
    }

    let translation = center_b - center_a;
    let t = [translation.dot(axes_a[0]), translation.dot(axes_a[1]), translation.dot(axes_a[2])];

    let mut best_overlap = f32::MAX;
    let mut best_axis = Vec3::UNIT_X;

    macro_rules! track_axis {
        ($axis:expr, $projection:expr, $radius:expr) => {
            let projection = $projection;
            let radius = $radius;
            if projection > radius + PROJECTION_TOLERANCE {
                return (false, ContactInfo::ZERO);
            }
            let overlap = radius - projection;
            if overlap < best_overlap {
                best_overlap = overlap;
                let axis = $axis;
                best_axis = if translation.dot(axis) < 0.0 { -axis } else { axis };
            }
        };
    }

    for i in 0..3 {
        let ra = extents_a[i];
        let rb: f32 = (0..3).map(|j| extents_b[j] * abs_r[i][j]).sum();
        track_axis!(axes_a[i], t[i].abs(), ra + rb);
    }

    for j in 0..3 {
        let ra: f32 = (0..3).map(|i| extents_a[i] * abs_r[i][j]).sum();
        let rb = extents_b[j];
        let projection = (t[0] * r[0][j] + t[1] * r[1][j] + t[2] * r[2][j]).abs();
        track_axis!(axes_b[j], projection, ra + rb);
    }

    for i in 0..3 {
        for j in 0..3 {
            let axis = axes_a[i].cross(axes_b[j]);
            if axis.length() <= AXIS_EPSILON {
                continue;
            }
            let axis = axis.normalize();
            let (i1, i2) = ((i + 1) % 3, (i + 2) % 3);
            let (j1, j2) = ((j + 1) % 3, (j + 2) % 3);
            let ra = extents_a[i1] * abs_r[i2][j] + extents_a[i2] * abs_r[i1][j];
            let rb = extents_b[j1] * abs_r[i][j2] + extents_b[j2] * abs_r[i][j1];
            let projection = (t[i1] * r[i2][j] - t[i2] * r[i1][j]).abs();
            track_axis!(axis, projection, ra + rb);
        }
    }

    let support = |center: Vec3, axes: [Vec3; 3], extents: [f32; 3], direction: Vec3| -> Vec3 {
        let mut point = center;
        for k in 0..3 {
            let sign = if direction.dot(axes[k]) >= 0.0 { 1.0 } else { -1.0 };
            point = point + axes[k].scale(sign * extents[k]);
        }
        point
    };

    let point_on_a = support(center_a, axes_a, extents_a, best_axis);
    let point_on_b = support(center_b, axes_b, extents_b, -best_axis);

    (
        true,
        ContactInfo {
            point_on_a,
            point_on_b,
            normal: best_axis,
            penetration: best_overlap.max(0.0),
        },
    )
}
