//! Bounding-volume types: per-shape OBBRSS fitting and the mesh BVH built
//! from it.

mod aabb;
mod bvh;
mod obbrss;

pub use aabb::Aabb;
pub use bvh::{BvhModel, BvhNode};
pub use obbrss::Obbrss;
