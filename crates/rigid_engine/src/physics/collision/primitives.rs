//! Triangles and closed-form contact tests
//!
//! Spheres get exact closed-form contacts against spheres and triangles.
//! Everything else goes through the support-mapping narrowphase; the
//! closed forms double as reference results in its tests.

use crate::foundation::math::{CoordinateFrame, Vec3};
use crate::physics::ContactPoint;
use crate::spatial::AABB;

use super::shape::SupportMap;

const DEGENERATE_EPSILON: f32 = 1e-6;

/// A single triangle with counter-clockwise winding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Create a triangle from three vertices
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unit face normal (counter-clockwise winding); +Y for degenerate
    /// triangles
    pub fn normal(&self) -> Vec3 {
        let cross = (self.v1 - self.v0).cross(&(self.v2 - self.v0));
        let length = cross.norm();
        if length <= DEGENERATE_EPSILON {
            Vec3::y()
        } else {
            cross / length
        }
    }

    /// Centroid of the three vertices
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Tight axis-aligned bounds of the triangle
    pub fn aabb(&self) -> AABB {
        AABB::new(
            self.v0.inf(&self.v1).inf(&self.v2),
            self.v0.sup(&self.v1).sup(&self.v2),
        )
    }

    /// The triangle placed by a coordinate frame
    pub fn transformed(&self, frame: &CoordinateFrame) -> Self {
        Self {
            v0: frame.transform_point(self.v0),
            v1: frame.transform_point(self.v1),
            v2: frame.transform_point(self.v2),
        }
    }

    /// Closest point on the triangle to `point`
    ///
    /// Classifies the point against the triangle's Voronoi regions using
    /// barycentric coordinates, then projects onto the matching vertex,
    /// edge, or face.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let ab = self.v1 - self.v0;
        let ac = self.v2 - self.v0;

        let ap = point - self.v0;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.v0;
        }

        let bp = point - self.v1;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return self.v1;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return self.v0 + ab * v;
        }

        let cp = point - self.v2;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return self.v2;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return self.v0 + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.v1 + (self.v2 - self.v1) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        self.v0 + ab * v + ac * w
    }
}

impl SupportMap for Triangle {
    fn local_support(&self, direction: Vec3) -> Vec3 {
        let d0 = self.v0.dot(&direction);
        let d1 = self.v1.dot(&direction);
        let d2 = self.v2.dot(&direction);
        if d0 >= d1 && d0 >= d2 {
            self.v0
        } else if d1 >= d2 {
            self.v1
        } else {
            self.v2
        }
    }

    fn local_interior(&self) -> Vec3 {
        self.centroid()
    }
}

/// Exact sphere-sphere contact; `None` when separated or touching
///
/// The normal points from A toward B; coincident centers fall back to +X so
/// the result is always well defined.
pub fn sphere_sphere(
    radius_a: f32,
    frame_a: &CoordinateFrame,
    radius_b: f32,
    frame_b: &CoordinateFrame,
) -> Option<ContactPoint> {
    let delta = frame_b.translation - frame_a.translation;
    let distance = delta.norm();
    if distance >= radius_a + radius_b {
        return None;
    }
    let normal = if distance > DEGENERATE_EPSILON {
        delta / distance
    } else {
        Vec3::x()
    };
    Some(ContactPoint {
        point_a: frame_a.translation + normal * radius_a,
        point_b: frame_b.translation - normal * radius_b,
        normal,
    })
}

/// Exact contact between a sphere and a world-space triangle
///
/// The normal points from the sphere toward the triangle. A center lying on
/// the triangle surface falls back to the face normal oriented against the
/// side the sphere approaches from.
pub fn sphere_triangle(
    radius: f32,
    frame: &CoordinateFrame,
    triangle: &Triangle,
) -> Option<ContactPoint> {
    let center = frame.translation;
    let closest = triangle.closest_point(center);
    let delta = closest - center;
    let distance = delta.norm();
    if distance >= radius {
        return None;
    }
    let normal = if distance > DEGENERATE_EPSILON {
        delta / distance
    } else {
        let face = triangle.normal();
        if (center - triangle.centroid()).dot(&face) >= 0.0 {
            -face
        } else {
            face
        }
    };
    Some(ContactPoint {
        point_a: center + normal * radius,
        point_b: closest,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(-5.0, 0.0, -5.0),
            Vec3::new(5.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 5.0),
        )
    }

    #[test]
    fn test_closest_point_face_interior() {
        let triangle = floor_triangle();
        let closest = triangle.closest_point(Vec3::new(0.0, 3.0, 0.0));
        assert_relative_eq!(closest, Vec3::new(0.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_closest_point_vertex_region() {
        let triangle = floor_triangle();
        let closest = triangle.closest_point(Vec3::new(0.0, 1.0, 20.0));
        assert_relative_eq!(closest, Vec3::new(0.0, 0.0, 5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_closest_point_edge_region() {
        let triangle = floor_triangle();
        let closest = triangle.closest_point(Vec3::new(0.0, 2.0, -8.0));
        assert_relative_eq!(closest, Vec3::new(0.0, 0.0, -5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_sphere_penetration_depth() {
        let a = CoordinateFrame::from_translation(Vec3::zeros());
        let b = CoordinateFrame::from_translation(Vec3::new(1.5, 0.0, 0.0));
        let contact = sphere_sphere(1.0, &a, 1.0, &b).unwrap();

        assert_relative_eq!(contact.normal, Vec3::x(), epsilon = 1e-6);
        // Overlap of two unit spheres 1.5 apart is 0.5.
        assert_relative_eq!(contact.penetration(), 0.5, epsilon = 1e-5);
        assert_relative_eq!(contact.point_a, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(contact.point_b, Vec3::new(0.5, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_sphere_touching_is_separated() {
        let a = CoordinateFrame::from_translation(Vec3::zeros());
        let b = CoordinateFrame::from_translation(Vec3::new(2.0, 0.0, 0.0));
        assert!(sphere_sphere(1.0, &a, 1.0, &b).is_none());
    }

    #[test]
    fn test_sphere_sphere_coincident_centers_canonical_normal() {
        let a = CoordinateFrame::from_translation(Vec3::new(3.0, 1.0, -2.0));
        let contact = sphere_sphere(1.0, &a, 1.0, &a).unwrap();
        assert_relative_eq!(contact.normal, Vec3::x(), epsilon = 1e-6);
        assert_relative_eq!(contact.penetration(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_triangle_resting_contact() {
        let frame = CoordinateFrame::from_translation(Vec3::new(0.0, 0.6, 0.0));
        let contact = sphere_triangle(1.0, &frame, &floor_triangle()).unwrap();

        assert_relative_eq!(contact.normal, -Vec3::y(), epsilon = 1e-5);
        assert_relative_eq!(contact.point_b, Vec3::zeros(), epsilon = 1e-5);
        assert_relative_eq!(contact.penetration(), 0.4, epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_triangle_misses_from_afar() {
        let frame = CoordinateFrame::from_translation(Vec3::new(0.0, 5.0, 0.0));
        assert!(sphere_triangle(1.0, &frame, &floor_triangle()).is_none());
    }

    #[test]
    fn test_triangle_support_picks_extreme_vertex() {
        let triangle = floor_triangle();
        assert_relative_eq!(
            triangle.local_support(Vec3::new(0.0, 0.0, 1.0)),
            Vec3::new(0.0, 0.0, 5.0)
        );
        assert_relative_eq!(
            triangle.local_support(Vec3::new(1.0, 0.0, -0.1)),
            Vec3::new(5.0, 0.0, -5.0)
        );
    }
}
