//! Collision detection: shapes, filtering, narrowphase, and swept tests

pub mod collision;
pub mod collision_layers;
pub mod continuous;
pub mod narrowphase;

pub use collision::{CollisionShape, ConvexHull, Sphere, SupportMap, Triangle, TriangleMesh};
pub use collision_layers::{should_collide, CollisionLayers};
pub use continuous::{conservative_distance, continuous_collide, support_continuous_collide};
pub use narrowphase::{collide, collide_with_triangle, support_collide};

use crate::foundation::math::Vec3;

/// A single point of contact between two shapes
///
/// The normal points from shape A toward shape B. The witness points lie on
/// the respective surfaces; when the shapes overlap, A's witness has passed
/// B's along the normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// Witness point on the surface of shape A (world space)
    pub point_a: Vec3,
    /// Witness point on the surface of shape B (world space)
    pub point_b: Vec3,
    /// Unit contact normal, pointing from A toward B
    pub normal: Vec3,
}

impl ContactPoint {
    /// Penetration depth along the normal (positive while overlapping)
    pub fn penetration(&self) -> f32 {
        (self.point_a - self.point_b).dot(&self.normal)
    }
}
