use crate::bounds::Obbrss;
use crate::math::{Mat3, Transform, Vec3};
use crate::registry::{Snapshot, SnapshotPayload};

/// Extremal-vertex abstraction consumed by GJK/EPA/MPR. Every shape kind
/// the registry can hold reduces to this single interface so the generic
/// solvers never need to know about `Sphere`/`Obb`/`Mesh` directly.
pub trait Support {
    /// World-space point of this shape extremal along `direction`.
    fn support(&self, direction: Vec3) -> Vec3;

    /// A representative interior point, used to seed the first GJK
    /// direction when shapes are exactly concentric.
    fn center(&self) -> Vec3;

    /// Pre-prune volume in world space, when one is cheaply available.
    fn bounding_volume(&self) -> Obbrss;
}

pub enum ShapeSupport {
    Sphere { center: Vec3, radius: f32 },
    Obb { center: Vec3, axes: [Vec3; 3], extents: Vec3 },
    Mesh { world_vertices: Vec<Vec3>, root_volume: Obbrss },
}

impl Support for ShapeSupport {
    fn support(&self, direction: Vec3) -> Vec3 {
        match self {
            ShapeSupport::Sphere { center, radius } => *center + direction.normalize().scale(*radius),
            ShapeSupport::Obb { center, axes, extents } => {
                let mut point = *center;
                for i in 0..3 {
                    let sign = if direction.dot(axes[i]) >= 0.0 { 1.0 } else { -1.0 };
                    point = point + axes[i].scale(sign * extents.component(i));
                }
                point
            }
            ShapeSupport::Mesh { world_vertices, .. } => {
                let mut best = world_vertices[0];
                let mut best_proj = best.dot(direction);
                for &v in &world_vertices[1..] {
                    let proj = v.dot(direction);
                    if proj > best_proj {
                        best = v;
                        best_proj = proj;
                    }
                }
                best
            }
        }
    }

    fn center(&self) -> Vec3 {
        match self {
            ShapeSupport::Sphere { center, .. } => *center,
            ShapeSupport::Obb { center, .. } => *center,
            ShapeSupport::Mesh { world_vertices, .. } => {
                let n = world_vertices.len() as f32;
                world_vertices.iter().fold(Vec3::ZERO, |acc, v| acc + *v).scale(1.0 / n)
            }
        }
    }

    fn bounding_volume(&self) -> Obbrss {
        match self {
            ShapeSupport::Sphere { center, radius } => Obbrss::from_sphere(*center, *radius),
            ShapeSupport::Obb { center, axes, extents } => Obbrss::from_obb(*center, *axes, *extents),
            ShapeSupport::Mesh { root_volume, .. } => *root_volume,
        }
    }
}

fn obb_world_axes(local_rotation: Mat3, transform: &Transform) -> [Vec3; 3] {
    let world_rotation = transform.rotation.mul_mat(&local_rotation);
    [world_rotation.column(0), world_rotation.column(1), world_rotation.column(2)]
}

/// Build the world-space support abstraction for a snapshot placed by
/// `transform`.
pub fn shape_support(snapshot: &Snapshot, transform: &Transform) -> ShapeSupport {
    match &snapshot.payload {
        SnapshotPayload::Sphere(data) => ShapeSupport::Sphere {
            center: transform.transform_point(data.center),
            radius: data.radius,
        },
        SnapshotPayload::Obb(data) => ShapeSupport::Obb {
            center: transform.transform_point(data.center),
            axes: obb_world_axes(data.rotation, transform),
            extents: data.half_extents,
        },
        SnapshotPayload::Mesh(data) => {
            let world_vertices: Vec<Vec3> = data
                .bvh
                .vertices()
                .iter()
                .map(|v| transform.transform_point(*v))
                .collect();
            let root_volume = data
                .bvh
                .root()
                .map(|node| node.volume.transform_by(transform))
                .unwrap_or_else(Obbrss::empty);
            ShapeSupport::Mesh { world_vertices, root_volume }
        }
    }
}
