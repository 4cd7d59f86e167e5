//! A sphere swept toward a stationary one; prints the first time of impact.
//! Ported from the teacher's `examples/spatial3d.rs` (ray/query demo),
//! adapted to this crate's continuous-collision query instead of a DBVT
//! ray cast.

use geomcollide::math::{Mat3, Transform, Vec3};
use geomcollide::{Engine, EngineConfig, ExecutionContext, GeometryDescriptor, Motion};

fn main() {
    let engine = Engine::new(EngineConfig::default());
    let ctx = ExecutionContext::QuerySafe;

    let moving = engine
        .create_geometry(ctx, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 })
        .expect("create moving sphere");
    let stationary = engine
        .create_geometry(ctx, GeometryDescriptor::Sphere { center: Vec3::ZERO, radius: 1.0 })
        .expect("create stationary sphere");

    let sweep = Motion::LinearInterp {
        start: Transform::IDENTITY,
        end: Transform::new(Mat3::IDENTITY, Vec3::new(4.0, 0.0, 0.0)),
    };
    let parked = Motion::LinearInterp {
        start: Transform::new(Mat3::IDENTITY, Vec3::new(6.0, 0.0, 0.0)),
        end: Transform::new(Mat3::IDENTITY, Vec3::new(6.0, 0.0, 0.0)),
    };

    let result = engine
        .continuous_collide(ctx, moving, sweep, stationary, parked, 0.0, 0)
        .expect("ccd query");

    println!("intersecting: {}", result.intersecting);
    println!("time of impact: {:.4}", result.time_of_impact);
}
