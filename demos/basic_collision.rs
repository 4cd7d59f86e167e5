//! Two boxes placed a few units apart, queried once for contact.
//! Ported from the teacher's `examples/basic3d.rs`.

use geomcollide::math::{Mat3, Transform, Vec3};
use geomcollide::{Engine, EngineConfig, ExecutionContext, GeometryDescriptor};

fn main() {
    let engine = Engine::new(EngineConfig::default());
    let ctx = ExecutionContext::QuerySafe;

    let a = engine
        .create_geometry(
            ctx,
            GeometryDescriptor::Obb {
                center: Vec3::ZERO,
                half_extents: Vec3::splat(5.0),
                rotation: Mat3::IDENTITY,
            },
        )
        .expect("create box a");

    let b = engine
        .create_geometry(
            ctx,
            GeometryDescriptor::Obb {
                center: Vec3::ZERO,
                half_extents: Vec3::splat(5.0),
                rotation: Mat3::IDENTITY,
            },
        )
        .expect("create box b");

    let xform_b = Transform::new(Mat3::IDENTITY, Vec3::new(3.0, 2.0, 0.0));
    let (hit, contact) = engine
        .collide(ctx, a, Transform::IDENTITY, b, xform_b)
        .expect("collide query");

    println!("intersecting: {}", hit);
    if hit {
        println!("normal: {:?}, penetration: {:.4}", contact.normal, contact.penetration);
    }
}
