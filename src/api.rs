//! Public query surface. Every entry point wraps snapshot acquisition,
//! input validation, dispatch, release, and telemetry timing around the
//! `registry`/`narrow`/`broad`/`ccd` modules.

use std::time::Instant;

use crate::broad::{self, Item};
use crate::ccd::{self, CcdResult, Motion};
use crate::config::{EngineConfig, RotationInterpolation};
use crate::error::Error;
use crate::math::{Transform, Vec3};
use crate::narrow::{self, ContactInfo};
use crate::registry::{GeometryDescriptor, Handle, Registry, Snapshot};
use crate::telemetry::{NullSink, QueryKind, TelemetrySink};

/// Which scheduling context a call is made from. High-priority contexts
/// (interrupt-like, no blocking allowed) may only reach the snapshot-core
/// entry points that take pre-acquired snapshots; everything that touches
/// the registry lock requires `QuerySafe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    QuerySafe,
    HighPriority,
}

fn require_query_safe(context: ExecutionContext) -> Result<(), Error> {
    match context {
        ExecutionContext::QuerySafe => Ok(()),
        ExecutionContext::HighPriority => Err(Error::InvalidState),
    }
}

fn validate_transform(transform: &Transform) -> Result<(), Error> {
    if transform.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter)
    }
}

/// Process-wide entry point: owns the geometry registry, the active
/// configuration, and the telemetry sink every successful query reports
/// its duration to.
pub struct Engine {
    registry: Registry,
    config: EngineConfig,
    telemetry: Box<dyn TelemetrySink>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Engine::with_telemetry(config, Box::new(NullSink))
    }

    pub fn with_telemetry(config: EngineConfig, telemetry: Box<dyn TelemetrySink>) -> Self {
        let registry = Registry::with_mesh_config(config.bvh_leaf_threshold, config.pca_obbrss);
        Engine { registry, config, telemetry }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn time<T>(&self, kind: QueryKind, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.telemetry.record_duration(kind, start.elapsed().as_micros() as u64);
        result
    }

    pub fn create_geometry(&self, context: ExecutionContext, descriptor: GeometryDescriptor) -> Result<Handle, Error> {
        require_query_safe(context)?;
        let result = self.registry.create(descriptor);
        if let Err(err) = &result {
            log::warn!("create_geometry failed: {}", err);
        }
        result
    }

    pub fn destroy_geometry(&self, context: ExecutionContext, handle: Handle) -> Result<(), Error> {
        require_query_safe(context)?;
        let result = self.registry.destroy(handle);
        if let Err(err) = &result {
            log::warn!("destroy_geometry({}) failed: {}", handle.raw(), err);
        }
        result
    }

    pub fn update_mesh_geometry(
        &self,
        context: ExecutionContext,
        handle: Handle,
        vertices: &[Vec3],
        indices: &[u32],
    ) -> Result<(), Error> {
        require_query_safe(context)?;
        let result = self.registry.update_mesh(handle, vertices, indices);
        if let Err(err) = &result {
            log::warn!("update_mesh_geometry({}) failed: {}", handle.raw(), err);
        }
        result
    }

    /// Acquire both handles, dispatch `collide`, release. Requires
    /// `QuerySafe`; high-priority callers use [`Engine::collide_snapshots`].
    pub fn collide(
        &self,
        context: ExecutionContext,
        handle_a: Handle,
        xform_a: Transform,
        handle_b: Handle,
        xform_b: Transform,
    ) -> Result<(bool, ContactInfo), Error> {
        require_query_safe(context)?;
        validate_transform(&xform_a)?;
        validate_transform(&xform_b)?;

        let (token_a, snapshot_a) = self.registry.acquire(handle_a)?;
        let (token_b, snapshot_b) = self.registry.acquire(handle_b)?;
        let result = self.time(QueryKind::Collision, || narrow::collide(&snapshot_a, &xform_a, &snapshot_b, &xform_b));
        self.registry.release(token_a);
        self.registry.release(token_b);
        Ok(result)
    }

    /// Snapshot-core equivalent of [`Engine::collide`]: no registry lock,
    /// callable from a high-priority context.
    pub fn collide_snapshots(
        &self,
        snapshot_a: &Snapshot,
        xform_a: &Transform,
        snapshot_b: &Snapshot,
        xform_b: &Transform,
    ) -> Result<(bool, ContactInfo), Error> {
        validate_transform(xform_a)?;
        validate_transform(xform_b)?;
        Ok(self.time(QueryKind::HighPriorityCollision, || narrow::collide(snapshot_a, xform_a, snapshot_b, xform_b)))
    }

    pub fn distance(
        &self,
        context: ExecutionContext,
        handle_a: Handle,
        xform_a: Transform,
        handle_b: Handle,
        xform_b: Transform,
    ) -> Result<(f32, Vec3, Vec3), Error> {
        require_query_safe(context)?;
        validate_transform(&xform_a)?;
        validate_transform(&xform_b)?;

        let (token_a, snapshot_a) = self.registry.acquire(handle_a)?;
        let (token_b, snapshot_b) = self.registry.acquire(handle_b)?;
        let result = self.time(QueryKind::Distance, || narrow::distance(&snapshot_a, &xform_a, &snapshot_b, &xform_b));
        self.registry.release(token_a);
        self.registry.release(token_b);
        Ok(result)
    }

    /// Snapshot-core equivalent of [`Engine::distance`]: no registry lock,
    /// callable from a high-priority context.
    pub fn distance_snapshots(
        &self,
        snapshot_a: &Snapshot,
        xform_a: &Transform,
        snapshot_b: &Snapshot,
        xform_b: &Transform,
    ) -> Result<(f32, Vec3, Vec3), Error> {
        validate_transform(xform_a)?;
        validate_transform(xform_b)?;
        Ok(self.time(QueryKind::Distance, || narrow::distance(snapshot_a, xform_a, snapshot_b, xform_b)))
    }

    pub fn continuous_collide(
        &self,
        context: ExecutionContext,
        handle_a: Handle,
        motion_a: Motion,
        handle_b: Handle,
        motion_b: Motion,
        tolerance: f32,
        max_iterations: u32,
    ) -> Result<CcdResult, Error> {
        require_query_safe(context)?;

        let (token_a, snapshot_a) = self.registry.acquire(handle_a)?;
        let (token_b, snapshot_b) = self.registry.acquire(handle_b)?;
        let tolerance = if tolerance > 0.0 { tolerance } else { self.config.ccd_default_tolerance };
        let max_iterations = if max_iterations > 0 { max_iterations } else { self.config.ccd_default_max_iterations };
        let rotation_interpolation = self.config.rotation_interpolation;
        let result = self.time(QueryKind::Ccd, || {
            ccd::continuous_collide(
                &snapshot_a,
                &motion_a,
                &snapshot_b,
                &motion_b,
                tolerance,
                max_iterations,
                rotation_interpolation,
            )
        });
        self.registry.release(token_a);
        self.registry.release(token_b);
        Ok(result)
    }

    /// Snapshot-core equivalent of [`Engine::continuous_collide`]: no
    /// registry lock, callable from a high-priority context.
    pub fn continuous_collide_snapshots(
        &self,
        snapshot_a: &Snapshot,
        motion_a: &Motion,
        snapshot_b: &Snapshot,
        motion_b: &Motion,
        tolerance: f32,
        max_iterations: u32,
    ) -> CcdResult {
        let tolerance = if tolerance > 0.0 { tolerance } else { self.config.ccd_default_tolerance };
        let max_iterations = if max_iterations > 0 { max_iterations } else { self.config.ccd_default_max_iterations };
        let rotation_interpolation = self.config.rotation_interpolation;
        self.time(QueryKind::Ccd, || {
            ccd::continuous_collide(snapshot_a, motion_a, snapshot_b, motion_b, tolerance, max_iterations, rotation_interpolation)
        })
    }

    /// Brute-force broadphase over `{handle, transform}` pairs. Writes up
    /// to `out.len()` pairs, always returns the true total pair count.
    pub fn broadphase_brute_force(
        &self,
        context: ExecutionContext,
        objects: &[(Handle, Transform)],
        out: &mut [(Handle, Handle)],
    ) -> Result<usize, Error> {
        require_query_safe(context)?;
        let (items, tokens) = self.collect_items(objects)?;
        let (total, result) = broad::find_pairs_brute_force(&items, out);
        for token in tokens {
            self.registry.release(token);
        }
        match result {
            Ok(()) => Ok(total),
            Err(err) => Err(err),
        }
    }

    /// Dynamic-AABB-tree broadphase over `{handle, transform}` pairs. Same
    /// bounded-buffer semantics and result set as
    /// [`Engine::broadphase_brute_force`].
    pub fn broadphase_tree(
        &self,
        context: ExecutionContext,
        objects: &[(Handle, Transform)],
        out: &mut [(Handle, Handle)],
    ) -> Result<usize, Error> {
        require_query_safe(context)?;
        let (items, tokens) = self.collect_items(objects)?;
        let tree = broad::Tree::build(&items);
        let (total, result) = tree.find_pairs(&items, out);
        for token in tokens {
            self.registry.release(token);
        }
        match result {
            Ok(()) => Ok(total),
            Err(err) => Err(err),
        }
    }

    fn collect_items(
        &self,
        objects: &[(Handle, Transform)],
    ) -> Result<(Vec<Item>, Vec<crate::registry::RefToken>), Error> {
        let mut items = Vec::with_capacity(objects.len());
        let mut tokens = Vec::with_capacity(objects.len());
        for (handle, transform) in objects {
            validate_transform(transform)?;
            let (token, snapshot) = self.registry.acquire(*handle)?;
            let aabb = broad::world_aabb(&snapshot, transform);
            items.push(Item { handle: *handle, aabb });
            tokens.push(token);
        }
        Ok((items, tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat3;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default())
    }

    #[test]
    fn collide_rejects_high_priority_context() {
        let engine = engine();
        let handle = engine
            .create_geometry(ExecutionContext::QuerySafe, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 })
            .unwrap();
        let result = engine.collide(
            ExecutionContext::HighPriority,
            handle,
            Transform::IDENTITY,
            handle,
            Transform::IDENTITY,
        );
        assert_eq!(result, Err(Error::InvalidState));
    }

    #[test]
    fn collide_rejects_nan_transform() {
        let engine = engine();
        let handle = engine
            .create_geometry(ExecutionContext::QuerySafe, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 })
            .unwrap();
        let nan_xform = Transform::new(Mat3::IDENTITY, Vec3::new(f32::NAN, 0.0, 0.0));
        let result = engine.collide(ExecutionContext::QuerySafe, handle, nan_xform, handle, Transform::IDENTITY);
        assert_eq!(result, Err(Error::InvalidParameter));
    }

    #[test]
    fn collide_snapshots_is_callable_from_high_priority_path() {
        let engine = engine();
        let handle_a = engine
            .create_geometry(ExecutionContext::QuerySafe, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 })
            .unwrap();
        let handle_b = engine
            .create_geometry(
                ExecutionContext::QuerySafe,
                GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 },
            )
            .unwrap();
        let (token_a, snapshot_a) = engine.registry.acquire(handle_a).unwrap();
        let (token_b, snapshot_b) = engine.registry.acquire(handle_b).unwrap();

        let xform_b = Transform::new(Mat3::IDENTITY, Vec3::new(0.5, 0.0, 0.0));
        let (hit, _) = engine
            .collide_snapshots(&snapshot_a, &Transform::IDENTITY, &snapshot_b, &xform_b)
            .unwrap();
        assert!(hit);

        engine.registry.release(token_a);
        engine.registry.release(token_b);
    }

    #[test]
    fn distance_snapshots_is_callable_from_high_priority_path() {
        let engine = engine();
        let handle_a = engine
            .create_geometry(ExecutionContext::QuerySafe, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 })
            .unwrap();
        let handle_b = engine
            .create_geometry(
                ExecutionContext::QuerySafe,
                GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 },
            )
            .unwrap();
        let (token_a, snapshot_a) = engine.registry.acquire(handle_a).unwrap();
        let (token_b, snapshot_b) = engine.registry.acquire(handle_b).unwrap();

        let xform_b = Transform::new(Mat3::IDENTITY, Vec3::new(4.0, 0.0, 0.0));
        let (separation, _, _) = engine
            .distance_snapshots(&snapshot_a, &Transform::IDENTITY, &snapshot_b, &xform_b)
            .unwrap();
        assert!((separation - 2.0).abs() < 1e-2);

        engine.registry.release(token_a);
        engine.registry.release(token_b);
    }

    #[test]
    fn broadphase_brute_force_reports_expected_pair_count() {
        let engine = engine();
        let h1 = engine
            .create_geometry(ExecutionContext::QuerySafe, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 })
            .unwrap();
        let h2 = engine
            .create_geometry(ExecutionContext::QuerySafe, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 })
            .unwrap();
        let h3 = engine
            .create_geometry(ExecutionContext::QuerySafe, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 })
            .unwrap();

        let objects = [
            (h1, Transform::IDENTITY),
            (h2, Transform::new(Mat3::IDENTITY, Vec3::new(0.4, 0.0, 0.0))),
            (h3, Transform::new(Mat3::IDENTITY, Vec3::new(5.0, 0.0, 0.0))),
        ];
        let mut out = vec![(Handle::default(), Handle::default()); 8];
        let count = engine.broadphase_brute_force(ExecutionContext::QuerySafe, &objects, &mut out).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn broadphase_with_zero_capacity_reports_buffer_too_small() {
        let engine = engine();
        let h1 = engine
            .create_geometry(ExecutionContext::QuerySafe, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 })
            .unwrap();
        let h2 = engine
            .create_geometry(ExecutionContext::QuerySafe, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 })
            .unwrap();
        let objects = [(h1, Transform::IDENTITY), (h2, Transform::IDENTITY)];
        let mut out: Vec<(Handle, Handle)> = Vec::new();
        let result = engine.broadphase_brute_force(ExecutionContext::QuerySafe, &objects, &mut out);
        assert_eq!(result, Err(Error::BufferTooSmall));
    }
}
