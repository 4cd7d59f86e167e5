//! Handle-based geometry table. Mutators (`create`/`destroy`/`update_mesh`)
//! serialize under an exclusive lock; `acquire`/`release` take the same
//! lock only long enough to adjust a refcount.

mod entry;
mod handle;
mod snapshot;

use std::collections::BTreeMap;
use std::sync::RwLock;

pub use entry::{GeometryDescriptor, GeometryKind, MeshData, ObbData, SphereData};
pub use handle::{Handle, RefToken};
pub use snapshot::{Snapshot, SnapshotPayload};

use entry::{validate_mesh_with_config, validate_obb, validate_sphere, Entry, Payload};

use crate::error::Error;
use crate::math::Vec3;

struct Inner {
    entries: BTreeMap<u64, Entry>,
    next_handle: u64,
}

/// Process-wide geometry table. Treated as an explicit singleton owned by
/// the engine: constructed once, never behind a lazy static.
///
/// `mesh_leaf_threshold`/`mesh_pca_obbrss` mirror `EngineConfig`'s BVH
/// tunables; the registry takes copies rather than a config reference so it
/// never depends on the engine that owns it.
pub struct Registry {
    inner: RwLock<Inner>,
    mesh_leaf_threshold: u32,
    mesh_pca_obbrss: bool,
}

impl Registry {
    pub fn new() -> Self {
        Registry::with_mesh_config(4, true)
    }

    pub fn with_mesh_config(mesh_leaf_threshold: u32, mesh_pca_obbrss: bool) -> Self {
        Registry {
            inner: RwLock::new(Inner { entries: BTreeMap::new(), next_handle: 1 }),
            mesh_leaf_threshold,
            mesh_pca_obbrss,
        }
    }

    pub fn create(&self, descriptor: GeometryDescriptor) -> Result<Handle, Error> {
        let payload = match &descriptor {
            GeometryDescriptor::Sphere { center, radius } => {
                Payload::Sphere(validate_sphere(*center, *radius)?)
            }
            GeometryDescriptor::Obb { center, half_extents, rotation } => {
                Payload::Obb(validate_obb(*center, *half_extents, *rotation)?)
            }
            GeometryDescriptor::Mesh { vertices, indices } => Payload::Mesh(validate_mesh_with_config(
                vertices,
                indices,
                self.mesh_leaf_threshold,
                self.mesh_pca_obbrss,
            )?),
        };
        let kind = descriptor.kind();

        let mut inner = self.inner.write().expect("registry lock poisoned");
        let handle_id = inner.next_handle;
        inner.next_handle += 1;
        inner.entries.insert(handle_id, Entry { kind, payload, active_refs: 0 });
        Ok(Handle(handle_id))
    }

    pub fn destroy(&self, handle: Handle) -> Result<(), Error> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let entry = inner.entries.get(&handle.0).ok_or(Error::InvalidHandle)?;
        if entry.active_refs > 0 {
            log::debug!("destroy({}) rejected: active_refs={}", handle.0, entry.active_refs);
            return Err(Error::Busy);
        }
        inner.entries.remove(&handle.0);
        Ok(())
    }

    /// Allocate-then-swap: validate and build the new mesh payload before
    /// touching the entry, so a failure never leaves it half-updated.
    pub fn update_mesh(&self, handle: Handle, vertices: &[Vec3], indices: &[u32]) -> Result<(), Error> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let entry = inner.entries.get(&handle.0).ok_or(Error::InvalidHandle)?;
        if entry.kind != GeometryKind::Mesh {
            return Err(Error::NotSupported);
        }
        if entry.active_refs > 0 {
            log::debug!("update_mesh({}) rejected: active_refs={}", handle.0, entry.active_refs);
            return Err(Error::Busy);
        }

        let new_payload = validate_mesh_with_config(vertices, indices, self.mesh_leaf_threshold, self.mesh_pca_obbrss)?;
        let entry = inner.entries.get_mut(&handle.0).expect("entry present under write lock");
        entry.payload = Payload::Mesh(new_payload);
        Ok(())
    }

    pub fn acquire(&self, handle: Handle) -> Result<(RefToken, Snapshot), Error> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let entry = inner.entries.get_mut(&handle.0).ok_or(Error::InvalidHandle)?;
        entry.active_refs += 1;
        let snapshot = Snapshot::from_entry(handle, entry.kind, &entry.payload);
        Ok((RefToken { handle }, snapshot))
    }

    pub fn release(&self, token: RefToken) {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        if let Some(entry) = inner.entries.get_mut(&token.handle.0) {
            entry.active_refs = entry.active_refs.saturating_sub(1);
        }
    }

    pub fn is_valid(&self, handle: Handle) -> bool {
        if !handle.is_valid_value() {
            return false;
        }
        let inner = self.inner.read().expect("registry lock poisoned");
        inner.entries.contains_key(&handle.0)
    }

    /// Drain every entry regardless of outstanding references. Callers must
    /// not hold reference tokens past this call.
    pub fn shutdown(&self) {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        inner.entries.clear();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}
