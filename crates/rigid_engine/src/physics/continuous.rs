//! Continuous collision detection by conservative advancement
//!
//! Fast bodies can step across thin geometry between sub-steps. For pairs
//! flagged for swept testing, the motion over the step is searched for the
//! first time of impact: at each candidate time a support-plane lower bound
//! on the separation distance is computed, and time advances by the
//! fraction of the remaining relative displacement that distance permits.
//! Because the bound never exceeds the true distance, the search cannot
//! jump past the actual impact.

use crate::foundation::math::{CoordinateFrame, Vec3};

use super::collision::shape::{CollisionShape, SupportMap};

const DEGENERATE_EPSILON: f32 = 1e-10;
const DISTANCE_ITERATIONS: usize = 8;
const ADVANCEMENT_ITERATIONS: usize = 64;

fn world_support(shape: &dyn SupportMap, frame: &CoordinateFrame, direction: Vec3) -> Vec3 {
    let local = frame.inverse_rotate_vector(direction);
    frame.transform_point(shape.local_support(local))
}

/// Lower bound on the separation distance of two convex shapes
///
/// Starts from the axis between the shapes' interior points and refines the
/// direction toward the support-plane witnesses. Every sampled axis yields
/// a valid lower bound, so the maximum over the iterations is one too.
/// Exact for sphere pairs; negative or zero means possibly touching.
pub fn conservative_distance(
    shape_a: &dyn SupportMap,
    frame_a: &CoordinateFrame,
    shape_b: &dyn SupportMap,
    frame_b: &CoordinateFrame,
) -> f32 {
    let interior_a = frame_a.transform_point(shape_a.local_interior());
    let interior_b = frame_b.transform_point(shape_b.local_interior());
    let mut axis = interior_b - interior_a;
    if axis.norm_squared() <= DEGENERATE_EPSILON {
        // Interior points coincide: certainly overlapping.
        return 0.0;
    }

    let mut best = f32::NEG_INFINITY;
    for _ in 0..DISTANCE_ITERATIONS {
        let direction = axis.normalize();
        let on_a = world_support(shape_a, frame_a, direction);
        let on_b = world_support(shape_b, frame_b, -direction);
        let gap = (on_b - on_a).dot(&direction);
        if gap > best {
            best = gap;
        }

        // Steer the axis toward the current witness offset.
        let offset = on_b - on_a;
        if offset.norm_squared() <= DEGENERATE_EPSILON {
            break;
        }
        if offset.normalize().dot(&direction) > 1.0 - 1e-6 {
            break;
        }
        axis = offset;
    }
    best
}

/// First time of impact of two moving convex shapes over one step
///
/// Frames are interpolated between their start and end placements; the
/// returned time is in [0, 1]. `None` means the shapes stay separated for
/// the whole step (or a shape has no support mapping). Pairs already
/// touching at the start report an impact at time zero.
pub fn continuous_collide(
    shape_a: &CollisionShape,
    start_a: &CoordinateFrame,
    end_a: &CoordinateFrame,
    shape_b: &CollisionShape,
    start_b: &CoordinateFrame,
    end_b: &CoordinateFrame,
    tolerance: f32,
) -> Option<f32> {
    let support_a = shape_a.as_support()?;
    let support_b = shape_b.as_support()?;
    support_continuous_collide(
        support_a, start_a, end_a, support_b, start_b, end_b, tolerance,
    )
}

/// Time-of-impact search on two bare support mappings
///
/// The mesh path uses this directly against individual triangles.
pub fn support_continuous_collide(
    support_a: &dyn SupportMap,
    start_a: &CoordinateFrame,
    end_a: &CoordinateFrame,
    support_b: &dyn SupportMap,
    start_b: &CoordinateFrame,
    end_b: &CoordinateFrame,
    tolerance: f32,
) -> Option<f32> {
    let displacement_a = end_a.translation - start_a.translation;
    let displacement_b = end_b.translation - start_b.translation;
    let max_displacement = (displacement_b - displacement_a).norm();

    if max_displacement <= DEGENERATE_EPSILON {
        // No relative motion: only the starting placement matters.
        let distance = conservative_distance(support_a, start_a, support_b, start_b);
        return (distance <= 0.0).then_some(0.0);
    }

    let mut t = 0.0_f32;
    for _ in 0..ADVANCEMENT_ITERATIONS {
        let frame_a = CoordinateFrame::interpolate(start_a, end_a, t);
        let frame_b = CoordinateFrame::interpolate(start_b, end_b, t);
        let distance = conservative_distance(support_a, &frame_a, support_b, &frame_b);
        if distance <= 0.0 {
            return Some(t);
        }

        // The tolerance floor guarantees forward progress as the gap
        // shrinks toward zero.
        t += distance.max(tolerance) / max_displacement;
        if t >= 1.0 {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn at(x: f32, y: f32, z: f32) -> CoordinateFrame {
        CoordinateFrame::from_translation(Vec3::new(x, y, z))
    }

    #[test]
    fn test_conservative_distance_exact_for_spheres() {
        let a = CollisionShape::sphere(1.0);
        let b = CollisionShape::sphere(0.5);
        let distance = conservative_distance(
            a.as_support().unwrap(),
            &at(0.0, 0.0, 0.0),
            b.as_support().unwrap(),
            &at(4.0, 0.0, 0.0),
        );
        assert_relative_eq!(distance, 2.5, epsilon = 1e-5);
    }

    #[test]
    fn test_conservative_distance_negative_when_overlapping() {
        let a = CollisionShape::sphere(1.0);
        let distance = conservative_distance(
            a.as_support().unwrap(),
            &at(0.0, 0.0, 0.0),
            a.as_support().unwrap(),
            &at(1.5, 0.0, 0.0),
        );
        assert!(distance <= 0.0);
    }

    #[test]
    fn test_sphere_sweep_finds_the_impact_time() {
        let moving = CollisionShape::sphere(0.5);
        let target = CollisionShape::sphere(0.5);
        let rest = at(3.0, 0.0, 0.0);

        let toi = continuous_collide(
            &moving,
            &at(0.0, 0.0, 0.0),
            &at(5.0, 0.0, 0.0),
            &target,
            &rest,
            &rest,
            1e-3,
        )
        .unwrap();

        // Surfaces meet when the moving center reaches x = 2.
        assert_relative_eq!(toi, 0.4, epsilon = 1e-2);
    }

    #[test]
    fn test_long_sweep_stops_at_touching_distance() {
        let moving = CollisionShape::sphere(1.0);
        let target = CollisionShape::sphere(1.0);
        let rest = at(0.0, 0.0, 0.0);

        let toi = continuous_collide(
            &moving,
            &at(-10.0, 0.0, 0.0),
            &at(10.0, 0.0, 0.0),
            &target,
            &rest,
            &rest,
            1e-3,
        )
        .unwrap();

        assert!(toi > 0.0 && toi < 1.0);
        // At the reported time the centers are at combined-radius distance.
        let x = -10.0 + 20.0 * toi;
        assert!(x.abs() <= 2.0 + 1e-2, "interpolated center at {x}");
        assert_relative_eq!(toi, 0.4, epsilon = 1e-2);
    }

    #[test]
    fn test_sweep_misses_off_axis_target() {
        let moving = CollisionShape::sphere(0.5);
        let target = CollisionShape::sphere(0.5);
        let rest = at(3.0, 4.0, 0.0);

        assert!(continuous_collide(
            &moving,
            &at(0.0, 0.0, 0.0),
            &at(5.0, 0.0, 0.0),
            &target,
            &rest,
            &rest,
            1e-3,
        )
        .is_none());
    }

    #[test]
    fn test_sweep_catches_tunneling_through_a_thin_wall() {
        let bullet = CollisionShape::sphere(0.1);
        let wall = CollisionShape::cuboid(Vec3::new(0.1, 5.0, 5.0));
        let rest = at(0.0, 0.0, 0.0);

        // Discrete tests at both endpoints would miss this wall entirely.
        let toi = continuous_collide(
            &bullet,
            &at(-5.0, 0.0, 0.0),
            &at(5.0, 0.0, 0.0),
            &wall,
            &rest,
            &rest,
            1e-3,
        )
        .unwrap();

        assert_relative_eq!(toi, 0.48, epsilon = 1e-2);
    }

    #[test]
    fn test_overlap_at_start_reports_time_zero() {
        let a = CollisionShape::sphere(1.0);
        let toi = continuous_collide(
            &a,
            &at(0.0, 0.0, 0.0),
            &at(1.0, 0.0, 0.0),
            &a,
            &at(1.0, 0.0, 0.0),
            &at(1.0, 0.0, 0.0),
            1e-3,
        )
        .unwrap();
        assert_relative_eq!(toi, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_no_relative_motion_stays_separated() {
        let a = CollisionShape::sphere(1.0);
        let here = at(0.0, 0.0, 0.0);
        let there = at(5.0, 0.0, 0.0);
        assert!(continuous_collide(&a, &here, &here, &a, &there, &there, 1e-3).is_none());
    }
}
