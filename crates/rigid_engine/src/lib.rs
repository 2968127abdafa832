//! # Rigid Engine
//!
//! A rigid-body physics simulation core with swept collision detection.
//!
//! ## Features
//!
//! - **Sweep-and-Prune Broadphase**: Incremental sorted-endpoint pruning
//!   with pair start/update/stop events
//! - **Support-Mapping Narrowphase**: One portal-refinement algorithm for
//!   every convex shape pair, with exact closed forms for spheres
//! - **Swept Collision**: Conservative-advancement time of impact for fast
//!   movers that would otherwise tunnel
//! - **Concave Meshes**: Static triangle meshes behind a flattened
//!   bounding-plane tree, traversed without recursion
//! - **Fixed-Step Simulation**: Frame-rate independent stepping with an
//!   accumulation cap, layer filtering, and sleeping
//!
//! ## Quick Start
//!
//! ```rust
//! use rigid_engine::prelude::*;
//!
//! let mut world = World::default();
//!
//! world.add_body(
//!     Body::new(CollisionShape::cuboid(Vec3::new(10.0, 0.5, 10.0))).with_static(),
//! )?;
//! let ball = world.add_body(
//!     Body::new(CollisionShape::sphere(0.5)).with_translation(Vec3::new(0.0, 5.0, 0.0)),
//! )?;
//!
//! for _ in 0..60 {
//!     world.tick(1.0 / 60.0);
//! }
//! assert!(world.body(ball).unwrap().translation().y < 5.0);
//! # Ok::<(), rigid_engine::world::WorldError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod foundation;
pub mod physics;
pub mod spatial;
pub mod world;

/// Common imports for simulation users
pub mod prelude {
    pub use crate::{
        core::SimulationConfig,
        foundation::math::{CoordinateFrame, Vec3},
        physics::{
            collision_layers::CollisionLayers, CollisionShape, ContactPoint, Triangle,
            TriangleMesh,
        },
        spatial::AABB,
        world::{Body, BodyHandle, ContactEvent, World, WorldError},
    };
}
