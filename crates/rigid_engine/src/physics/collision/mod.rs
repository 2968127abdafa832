//! Shapes, triangles, and concave meshes

pub mod mesh;
pub mod primitives;
pub mod shape;

pub use mesh::TriangleMesh;
pub use primitives::Triangle;
pub use shape::{CollisionShape, ConvexHull, Sphere, SupportMap};
