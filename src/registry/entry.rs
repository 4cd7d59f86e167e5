use std::sync::Arc;

use crate::bounds::BvhModel;
use crate::error::Error;
use crate::math::{Mat3, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Sphere,
    Obb,
    Mesh,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereData {
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObbData {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub rotation: Mat3,
}

/// Owned mesh payload: a defensive copy of the caller's vertex/index
/// buffers plus the BVH built over them.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub bvh: BvhModel,
}

/// Caller-supplied geometry description, tagged by shape. `create_geometry`
/// validates and deep-copies this into registry-owned storage.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryDescriptor {
    Sphere { center: Vec3, radius: f32 },
    Obb { center: Vec3, half_extents: Vec3, rotation: Mat3 },
    Mesh { vertices: Vec<Vec3>, indices: Vec<u32> },
}

impl GeometryDescriptor {
    pub fn kind(&self) -> GeometryKind {
        match self {
            GeometryDescriptor::Sphere { .. } => GeometryKind::Sphere,
            GeometryDescriptor::Obb { .. } => GeometryKind::Obb,
            GeometryDescriptor::Mesh { .. } => GeometryKind::Mesh,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Sphere(SphereData),
    Obb(ObbData),
    Mesh(Arc<MeshData>),
}

pub(crate) struct Entry {
    pub kind: GeometryKind,
    pub payload: Payload,
    pub active_refs: u32,
}

/// Matrices used as rotations must satisfy `det ≈ 1` within this tolerance.
const ROTATION_DETERMINANT_TOLERANCE: f32 = 1e-4;

pub(crate) fn validate_sphere(center: Vec3, radius: f32) -> Result<SphereData, Error> {
    if !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidParameter);
    }
    Ok(SphereData { center, radius })
}

pub(crate) fn validate_obb(center: Vec3, half_extents: Vec3, rotation: Mat3) -> Result<ObbData, Error> {
    if !center.is_finite() || !half_extents.is_finite() || !rotation.is_finite() {
        return Err(Error::InvalidParameter);
    }
    if half_extents.x <= 0.0 || half_extents.y <= 0.0 || half_extents.z <= 0.0 {
        return Err(Error::InvalidParameter);
    }
    if (rotation.determinant() - 1.0).abs() > ROTATION_DETERMINANT_TOLERANCE {
        return Err(Error::InvalidParameter);
    }
    Ok(ObbData { center, half_extents, rotation })
}

pub(crate) fn validate_mesh_with_config(
    vertices: &[Vec3],
    indices: &[u32],
    leaf_threshold: u32,
    pca_obbrss: bool,
) -> Result<Arc<MeshData>, Error> {
    let bvh = BvhModel::build_with_config(vertices, indices, leaf_threshold, pca_obbrss)?;
    Ok(Arc::new(MeshData { bvh }))
}
