//! Convex narrowphase collision via Minkowski portal refinement
//!
//! Works on the Minkowski difference M = A - B through the shapes' support
//! mappings alone. A ray from an interior point of M toward the origin
//! finds a candidate portal (a triangle on M's surface); the portal is then
//! refined toward the boundary until it brackets the origin's projection.
//! The origin lying inside M is exactly the shapes overlapping, and the
//! final portal yields the contact normal, witness points, and depth.
//!
//! Sphere pairs and sphere-triangle tests short-circuit to closed forms,
//! which are both cheaper and exact.

use crate::foundation::math::{CoordinateFrame, Vec3};
use crate::physics::ContactPoint;

use super::collision::primitives::{sphere_sphere, sphere_triangle, Triangle};
use super::collision::shape::{CollisionShape, SupportMap};

const PORTAL_TOLERANCE: f32 = 1e-4;
const DEGENERATE_EPSILON: f32 = 1e-10;
const DISCOVERY_ITERATIONS: usize = 64;
const REFINEMENT_ITERATIONS: usize = 32;

/// Contact test between two placed shapes; `None` when separated
///
/// Mesh shapes are not handled here: the simulation decomposes meshes into
/// triangles and calls [`collide_with_triangle`] per candidate.
pub fn collide(
    shape_a: &CollisionShape,
    frame_a: &CoordinateFrame,
    shape_b: &CollisionShape,
    frame_b: &CoordinateFrame,
) -> Option<ContactPoint> {
    match (shape_a, shape_b) {
        (CollisionShape::Sphere(a), CollisionShape::Sphere(b)) => {
            sphere_sphere(a.radius, frame_a, b.radius, frame_b)
        }
        _ => {
            let support_a = shape_a.as_support()?;
            let support_b = shape_b.as_support()?;
            support_collide(support_a, frame_a, support_b, frame_b)
        }
    }
}

/// Contact test between a placed convex shape and a world-space triangle
///
/// The normal points from the shape toward the triangle.
pub fn collide_with_triangle(
    shape: &CollisionShape,
    frame: &CoordinateFrame,
    triangle: &Triangle,
) -> Option<ContactPoint> {
    match shape {
        CollisionShape::Sphere(sphere) => sphere_triangle(sphere.radius, frame, triangle),
        _ => {
            let support = shape.as_support()?;
            support_collide(support, frame, triangle, &CoordinateFrame::identity())
        }
    }
}

/// A sampled point of the Minkowski difference with its witness points
#[derive(Debug, Clone, Copy)]
struct SupportSample {
    /// Point on the difference surface: `a - b`
    w: Vec3,
    /// Witness on shape A (world space)
    a: Vec3,
    /// Witness on shape B (world space)
    b: Vec3,
}

fn world_support(shape: &dyn SupportMap, frame: &CoordinateFrame, direction: Vec3) -> Vec3 {
    let local = frame.inverse_rotate_vector(direction);
    frame.transform_point(shape.local_support(local))
}

/// Portal-refinement contact test on two support mappings
pub fn support_collide(
    shape_a: &dyn SupportMap,
    frame_a: &CoordinateFrame,
    shape_b: &dyn SupportMap,
    frame_b: &CoordinateFrame,
) -> Option<ContactPoint> {
    let sample = |direction: Vec3| -> SupportSample {
        let a = world_support(shape_a, frame_a, direction);
        let b = world_support(shape_b, frame_b, -direction);
        SupportSample { w: a - b, a, b }
    };

    // Interior point of the difference, from the shapes' interior points.
    let interior_a = frame_a.transform_point(shape_a.local_interior());
    let interior_b = frame_b.transform_point(shape_b.local_interior());
    let mut v0 = interior_a - interior_b;
    if v0.norm_squared() <= DEGENERATE_EPSILON {
        // Coincident interiors: any ray works, keep it deterministic.
        v0 = Vec3::new(1e-5, 0.0, 0.0);
    }

    // The ray from v0 through the origin exits M where the portal must be.
    let v1 = sample(-v0);
    if v1.w.dot(&-v0) <= 0.0 {
        return None;
    }

    let n = v1.w.cross(&v0);
    if n.norm_squared() <= DEGENERATE_EPSILON {
        // Origin on the v0-v1 segment: the ray itself is the contact axis.
        let axis = (-v0).normalize();
        let offset = v1.a - v1.b;
        let normal = if offset.norm_squared() > DEGENERATE_EPSILON {
            offset.normalize()
        } else {
            axis
        };
        return Some(ContactPoint {
            point_a: v1.a,
            point_b: v1.b,
            normal,
        });
    }

    let v2 = sample(n);
    if v2.w.dot(&n) <= 0.0 {
        return None;
    }

    let mut n = (v1.w - v0).cross(&(v2.w - v0));
    let (mut v1, mut v2) = if n.dot(&v0) > 0.0 {
        n = -n;
        (v2, v1)
    } else {
        (v1, v2)
    };

    // Rotate the candidate portal until the origin ray passes through it.
    let mut v3 = None;
    for _ in 0..DISCOVERY_ITERATIONS {
        let candidate = sample(n);
        if candidate.w.dot(&n) <= 0.0 {
            return None;
        }
        if v1.w.cross(&candidate.w).dot(&v0) < 0.0 {
            v2 = candidate;
            n = (v1.w - v0).cross(&(candidate.w - v0));
            continue;
        }
        if candidate.w.cross(&v2.w).dot(&v0) < 0.0 {
            v1 = candidate;
            n = (candidate.w - v0).cross(&(v2.w - v0));
            continue;
        }
        v3 = Some(candidate);
        break;
    }
    let mut v3 = v3?;

    // Push the portal out to the surface of the difference.
    let mut hit = false;
    for _ in 0..REFINEMENT_ITERATIONS {
        let mut portal_normal = (v2.w - v1.w).cross(&(v3.w - v1.w));
        let length = portal_normal.norm();
        if length <= DEGENERATE_EPSILON {
            break;
        }
        portal_normal /= length;
        // Keep the normal pointing away from the interior point.
        if portal_normal.dot(&v0) > 0.0 {
            portal_normal = -portal_normal;
            std::mem::swap(&mut v1, &mut v2);
        }

        if v1.w.dot(&portal_normal) >= 0.0 {
            hit = true;
        }

        let v4 = sample(portal_normal);
        let progress = (v4.w - v3.w).dot(&portal_normal);
        if progress <= PORTAL_TOLERANCE {
            return hit.then(|| portal_contact(&v1, &v2, &v3, portal_normal));
        }

        // Replace the portal vertex on the far side of the (v4, v0) plane.
        let cross = v4.w.cross(&v0);
        if v1.w.dot(&cross) > 0.0 {
            if v2.w.dot(&cross) > 0.0 {
                v1 = v4;
            } else {
                v3 = v4;
            }
        } else if v3.w.dot(&cross) > 0.0 {
            v2 = v4;
        } else {
            v1 = v4;
        }
    }

    hit.then(|| {
        let mut portal_normal = (v2.w - v1.w).cross(&(v3.w - v1.w));
        if portal_normal.dot(&v0) > 0.0 {
            portal_normal = -portal_normal;
        }
        let length = portal_normal.norm();
        if length > DEGENERATE_EPSILON {
            portal_normal /= length;
        } else {
            portal_normal = (-v0).normalize();
        }
        portal_contact(&v1, &v2, &v3, portal_normal)
    })
}

/// Blend the portal's witness points into a contact
///
/// The origin is projected along the portal normal onto the portal
/// triangle and expressed in the triangle's barycentric coordinates; the
/// same weights blend the stored witness points on each shape, so the
/// witness offset keeps the portal plane's depth along the normal. A
/// degenerate portal falls back to the plain vertex average.
fn portal_contact(
    v1: &SupportSample,
    v2: &SupportSample,
    v3: &SupportSample,
    normal: Vec3,
) -> ContactPoint {
    let b1 = v2.w.cross(&v3.w).dot(&normal);
    let b2 = v3.w.cross(&v1.w).dot(&normal);
    let b3 = v1.w.cross(&v2.w).dot(&normal);
    let sum = b1 + b2 + b3;

    let (point_a, point_b) = if sum.abs() > DEGENERATE_EPSILON {
        let inv = 1.0 / sum;
        (
            (b1 * v1.a + b2 * v2.a + b3 * v3.a) * inv,
            (b1 * v1.b + b2 * v2.b + b3 * v3.b) * inv,
        )
    } else {
        (
            (v1.a + v2.a + v3.a) / 3.0,
            (v1.b + v2.b + v3.b) / 3.0,
        )
    };

    ContactPoint {
        point_a,
        point_b,
        normal,
    }
}
