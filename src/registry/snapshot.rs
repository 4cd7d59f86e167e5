use std::sync::Arc;

use super::entry::{GeometryKind, MeshData, ObbData, Payload, SphereData};
use super::handle::Handle;

/// Shape-tagged payload copied out of a registry entry by `acquire`.
/// Scalar shapes (`Sphere`, `Obb`) are copy-by-value; `Mesh` holds a cheap
/// `Arc` clone of the owned mesh, valid independent of the registry lock
/// for as long as the paired `RefToken` is held.
#[derive(Debug, Clone)]
pub enum SnapshotPayload {
    Sphere(SphereData),
    Obb(ObbData),
    Mesh(Arc<MeshData>),
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub handle: Handle,
    pub kind: GeometryKind,
    pub payload: SnapshotPayload,
}

impl Snapshot {
    pub(crate) fn from_entry(handle: Handle, kind: GeometryKind, payload: &Payload) -> Self {
        let payload = match payload {
            Payload::Sphere(data) => SnapshotPayload::Sphere(*data),
            Payload::Obb(data) => SnapshotPayload::Obb(*data),
            Payload::Mesh(data) => SnapshotPayload::Mesh(Arc::clone(data)),
        };
        Snapshot { handle, kind, payload }
    }
}
