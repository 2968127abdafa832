//! Axis-aligned bounding boxes for the broadphase and tree queries

use crate::foundation::math::{CoordinateFrame, Vec3};

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents (half-size)
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB strictly overlaps another AABB
    ///
    /// Exactly touching faces do not count as an intersection; the
    /// broadphase applies the same strict convention to its sorted
    /// endpoints, so the two predicates always agree.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x &&
        self.min.y < other.max.y && self.max.y > other.min.y &&
        self.min.z < other.max.z && self.max.z > other.min.z
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Expand the box by a uniform margin on all sides
    pub fn expanded(&self, margin: f32) -> Self {
        let expansion = Vec3::new(margin, margin, margin);
        Self {
            min: self.min - expansion,
            max: self.max + expansion,
        }
    }

    /// Grow this box so it also encloses `other`
    pub fn merged(&self, other: &AABB) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Conservative bounds of this box placed by a coordinate frame
    ///
    /// The rotated box is re-bounded axis-aligned: the new extents are the
    /// absolute orientation matrix applied to the old extents, so the result
    /// always encloses the rotated geometry (and is larger when the rotation
    /// is not axis-aligned).
    pub fn transformed(&self, frame: &CoordinateFrame) -> Self {
        let center = frame.transform_point(self.center());
        let extents = frame.orientation.abs() * self.extents();
        Self::from_center_extents(center, extents)
    }
}
