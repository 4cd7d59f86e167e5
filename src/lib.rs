//! 3D collision-detection and distance engine.
//!
//! A geometry registry holds spheres, oriented boxes, and BVH-backed
//! triangle meshes behind opaque handles. Queries place two handles with
//! transforms and ask for a boolean collision test, a separation distance,
//! continuous time-of-impact along a motion, or broadphase pair
//! enumeration over a batch of objects. See [`api::Engine`] for the entry
//! points and [`config::EngineConfig`] for the tunables.

pub mod api;
pub mod bounds;
pub mod broad;
pub mod ccd;
pub mod config;
pub mod error;
pub mod math;
pub mod narrow;
pub mod registry;
pub mod telemetry;

pub use api::{Engine, ExecutionContext};
pub use ccd::{CcdResult, Motion};
pub use config::{EngineConfig, RotationInterpolation};
pub use error::{Error, Result};
pub use narrow::ContactInfo;
pub use registry::{GeometryDescriptor, GeometryKind, Handle};
pub use telemetry::{NullSink, QueryKind, TelemetrySink};
