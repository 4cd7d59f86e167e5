//! Pairwise overlap detection over a batch of placed shapes. Both
//! strategies below are bounded-output-buffer: they always report the true
//! total pair count, and write as many pairs as the caller's buffer holds.

mod brute_force;
mod tree;

pub use brute_force::find_pairs as find_pairs_brute_force;
pub use tree::Tree;

use crate::bounds::{Aabb, Obbrss};
use crate::math::{Transform, Vec3};
use crate::registry::{Handle, Snapshot, SnapshotPayload};

/// One placed shape's world AABB, keyed by its registry handle.
#[derive(Debug, Clone, Copy)]
pub struct Item {
    pub handle: Handle,
    pub aabb: Aabb,
}

/// World-space AABB for a placed snapshot: sphere center ± radius, OBB
/// center ± Σ|axis_i|·extent_i, mesh root OBBRSS transformed and enclosed
/// (falling back to a vertex min/max fold if the mesh carries no BVH root).
pub fn world_aabb(snapshot: &Snapshot, transform: &Transform) -> Aabb {
    match &snapshot.payload {
        SnapshotPayload::Sphere(data) => {
            let center = transform.transform_point(data.center);
            Aabb::from_center_half_extents(center, Vec3::splat(data.radius))
        }
        SnapshotPayload::Obb(data) => {
            let center = transform.transform_point(data.center);
            let rotation = transform.rotation.mul_mat(&data.rotation);
            let axes = [rotation.column(0), rotation.column(1), rotation.column(2)];
            let volume = Obbrss::from_obb(center, axes, data.half_extents);
            Aabb::from_obbrss(&volume)
        }
        SnapshotPayload::Mesh(data) => match data.bvh.root() {
            Some(node) => Aabb::from_obbrss(&node.volume.transform_by(transform)),
            None => {
                let world: Vec<Vec3> = data.bvh.vertices().iter().map(|v| transform.transform_point(*v)).collect();
                Aabb::from_points(&world)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat3;
    use crate::registry::{GeometryDescriptor, Registry};

    #[test]
    fn world_aabb_for_sphere_matches_center_plus_radius() {
        let registry = Registry::new();
        let handle = registry
            .create(GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 2.0 })
            .unwrap();
        let (token, snapshot) = registry.acquire(handle).unwrap();
        let xform = Transform::new(Mat3::IDENTITY, Vec3::new(1.0, 0.0, 0.0));
        let aabb = world_aabb(&snapshot, &xform);
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 2.0, 2.0));
        registry.release(token);
    }
}
