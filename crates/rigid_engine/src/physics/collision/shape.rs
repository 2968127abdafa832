//! Collision shapes and the support-mapping trait
//!
//! Convex shapes are described to the narrowphase purely through their
//! support mapping, so one algorithm covers spheres, hulls, and any future
//! convex primitive. Triangle meshes are the one non-convex shape; the
//! simulation decomposes them into per-triangle convex tests.

use crate::foundation::math::{CoordinateFrame, Vec3};
use crate::spatial::AABB;

use super::mesh::TriangleMesh;

/// Support mapping of a convex shape, in the shape's local space
pub trait SupportMap {
    /// Extreme point of the shape in `direction` (need not be unit length)
    fn local_support(&self, direction: Vec3) -> Vec3;

    /// A point in the interior of the shape
    fn local_interior(&self) -> Vec3;
}

/// Sphere centered at the local origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Sphere radius
    pub radius: f32,
}

impl Sphere {
    /// Create a sphere with the given radius
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl SupportMap for Sphere {
    fn local_support(&self, direction: Vec3) -> Vec3 {
        let length = direction.norm();
        if length <= f32::EPSILON {
            Vec3::new(self.radius, 0.0, 0.0)
        } else {
            direction * (self.radius / length)
        }
    }

    fn local_interior(&self) -> Vec3 {
        Vec3::zeros()
    }
}

/// Convex hull of a point cloud
///
/// Points are kept as given; the support function scans them, so interior
/// points only cost time, not correctness.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    points: Vec<Vec3>,
    interior: Vec3,
    local_bounds: AABB,
}

impl ConvexHull {
    /// Create a hull from its corner points (must be non-empty)
    pub fn new(points: Vec<Vec3>) -> Self {
        assert!(!points.is_empty(), "convex hull needs at least one point");
        let interior = points.iter().sum::<Vec3>() / points.len() as f32;
        let local_bounds = AABB::new(
            points.iter().fold(Vec3::repeat(f32::INFINITY), |m, p| m.inf(p)),
            points
                .iter()
                .fold(Vec3::repeat(f32::NEG_INFINITY), |m, p| m.sup(p)),
        );
        Self {
            points,
            interior,
            local_bounds,
        }
    }

    /// Axis-aligned box with the given half-extents, centered at the origin
    pub fn cuboid(extents: Vec3) -> Self {
        let mut points = Vec::with_capacity(8);
        for &x in &[-extents.x, extents.x] {
            for &y in &[-extents.y, extents.y] {
                for &z in &[-extents.z, extents.z] {
                    points.push(Vec3::new(x, y, z));
                }
            }
        }
        Self::new(points)
    }

    /// The hull's corner points
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}

impl SupportMap for ConvexHull {
    fn local_support(&self, direction: Vec3) -> Vec3 {
        let mut best = self.points[0];
        let mut best_dot = best.dot(&direction);
        for point in &self.points[1..] {
            let dot = point.dot(&direction);
            if dot > best_dot {
                best = *point;
                best_dot = dot;
            }
        }
        best
    }

    fn local_interior(&self) -> Vec3 {
        self.interior
    }
}

/// Any collidable shape
#[derive(Debug, Clone)]
pub enum CollisionShape {
    /// Sphere centered at the body origin
    Sphere(Sphere),
    /// Convex point-cloud hull
    Convex(ConvexHull),
    /// Static concave triangle mesh
    Mesh(TriangleMesh),
}

impl CollisionShape {
    /// Sphere shape with the given radius
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere(Sphere::new(radius))
    }

    /// Axis-aligned cuboid with the given half-extents
    pub fn cuboid(extents: Vec3) -> Self {
        Self::Convex(ConvexHull::cuboid(extents))
    }

    /// Convex hull of the given points
    pub fn convex(points: Vec<Vec3>) -> Self {
        Self::Convex(ConvexHull::new(points))
    }

    /// Concave triangle mesh
    pub fn mesh(mesh: TriangleMesh) -> Self {
        Self::Mesh(mesh)
    }

    /// Local-space bounds of the shape
    pub fn local_aabb(&self) -> AABB {
        match self {
            Self::Sphere(sphere) => AABB::from_center_extents(
                Vec3::zeros(),
                Vec3::repeat(sphere.radius),
            ),
            Self::Convex(hull) => hull.local_bounds,
            Self::Mesh(mesh) => mesh.bounds(),
        }
    }

    /// World-space bounds of the shape placed by `frame`
    ///
    /// Spheres stay tight under rotation; other shapes get the conservative
    /// rotated-box bound.
    pub fn world_aabb(&self, frame: &CoordinateFrame) -> AABB {
        match self {
            Self::Sphere(sphere) => AABB::from_center_extents(
                frame.translation,
                Vec3::repeat(sphere.radius),
            ),
            _ => self.local_aabb().transformed(frame),
        }
    }

    /// The shape's support mapping, if it is convex
    pub fn as_support(&self) -> Option<&dyn SupportMap> {
        match self {
            Self::Sphere(sphere) => Some(sphere),
            Self::Convex(hull) => Some(hull),
            Self::Mesh(_) => None,
        }
    }

    /// The underlying mesh, if this is a mesh shape
    pub fn as_mesh(&self) -> Option<&TriangleMesh> {
        match self {
            Self::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}
