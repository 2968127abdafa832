//! Rigid bodies and their handles

use std::sync::Arc;

use slotmap::new_key_type;

use crate::foundation::math::{CoordinateFrame, Vec3};
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::CollisionShape;
use crate::spatial::{ProxyId, AABB};

new_key_type! {
    /// Stable handle to a body in a [`World`](crate::world::World)
    pub struct BodyHandle;
}

/// A rigid body: shape, placement, velocities, and response parameters
///
/// Bodies are configured with the `with_*` builders before being added to a
/// world. An inverse mass of zero makes the body immovable; immovable
/// bodies never integrate and absorb no impulses.
#[derive(Debug, Clone)]
pub struct Body {
    shape: Arc<CollisionShape>,
    frame: CoordinateFrame,
    prev_frame: CoordinateFrame,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    inverse_mass: f32,
    friction: f32,
    layers: CollisionLayers,
    mask: CollisionLayers,
    gravity_affected: bool,
    continuous: bool,
    sleeping: bool,
    low_motion_steps: u32,
    pub(crate) proxy: Option<ProxyId>,
    pub(crate) bounds_dirty: bool,
}

impl Body {
    /// Create a dynamic body of unit mass at the origin
    pub fn new(shape: CollisionShape) -> Self {
        let frame = CoordinateFrame::identity();
        Self {
            shape: Arc::new(shape),
            frame,
            prev_frame: frame,
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            inverse_mass: 1.0,
            friction: 0.5,
            layers: CollisionLayers::default(),
            mask: CollisionLayers::default(),
            gravity_affected: true,
            continuous: false,
            sleeping: false,
            low_motion_steps: 0,
            proxy: None,
            bounds_dirty: true,
        }
    }

    /// Place the body at a translation
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.frame.translation = translation;
        self.prev_frame = self.frame;
        self
    }

    /// Place the body with a full coordinate frame
    pub fn with_frame(mut self, frame: CoordinateFrame) -> Self {
        self.frame = frame;
        self.prev_frame = frame;
        self
    }

    /// Set the linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set the angular velocity (axis scaled by radians per second)
    pub fn with_angular_velocity(mut self, velocity: Vec3) -> Self {
        self.angular_velocity = velocity;
        self
    }

    /// Set the mass in kilograms; zero or less makes the body immovable
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.inverse_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
        self
    }

    /// Make the body immovable and exempt from gravity
    pub fn with_static(mut self) -> Self {
        self.inverse_mass = 0.0;
        self.gravity_affected = false;
        self
    }

    /// Set the friction coefficient (combined by multiplication per contact)
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Set the collision layers and mask used by broadphase filtering
    pub fn with_layers(mut self, layers: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layers = layers;
        self.mask = mask;
        self
    }

    /// Choose whether gravity applies to this body
    pub fn with_gravity(mut self, gravity_affected: bool) -> Self {
        self.gravity_affected = gravity_affected;
        self
    }

    /// Enable swept collision testing for this body
    ///
    /// Use for small fast movers that could cross thin geometry within one
    /// sub-step.
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    /// The body's collision shape
    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    pub(crate) fn shape_arc(&self) -> Arc<CollisionShape> {
        Arc::clone(&self.shape)
    }

    /// Current placement
    pub fn frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    /// Placement at the start of the current sub-step
    pub fn prev_frame(&self) -> &CoordinateFrame {
        &self.prev_frame
    }

    /// Current world-space translation
    pub fn translation(&self) -> Vec3 {
        self.frame.translation
    }

    /// Teleport the body, snapping its motion history to the new place
    ///
    /// Swept tests see no movement across a teleport, so nothing along the
    /// jumped-over path is hit.
    pub fn set_translation(&mut self, translation: Vec3) {
        self.frame.translation = translation;
        self.prev_frame = self.frame;
        self.bounds_dirty = true;
        self.wake();
    }

    /// Move the body by a delta without touching its velocity
    pub fn translate(&mut self, delta: Vec3) {
        self.frame.translation += delta;
        self.bounds_dirty = true;
        self.wake();
    }

    /// Replace the whole placement, with teleport semantics
    pub fn set_frame(&mut self, frame: CoordinateFrame) {
        self.frame = frame;
        self.prev_frame = frame;
        self.bounds_dirty = true;
        self.wake();
    }

    /// Replace the mass; zero or less makes the body immovable
    pub fn set_mass(&mut self, mass: f32) {
        self.inverse_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
        self.wake();
    }

    /// Replace the friction coefficient
    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction;
    }

    /// Choose whether gravity applies to this body
    pub fn set_gravity_affected(&mut self, gravity_affected: bool) {
        self.gravity_affected = gravity_affected;
    }

    /// Current linear velocity
    pub fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    /// Replace the linear velocity
    pub fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.linear_velocity = velocity;
        self.wake();
    }

    /// Add to the linear velocity
    pub fn add_velocity(&mut self, delta: Vec3) {
        self.linear_velocity += delta;
        self.wake();
    }

    /// Current angular velocity
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Replace the angular velocity
    pub fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.angular_velocity = velocity;
        self.wake();
    }

    /// Inverse mass; zero for immovable bodies
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Friction coefficient
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Collision layers this body belongs to
    pub fn layers(&self) -> CollisionLayers {
        self.layers
    }

    /// Collision layers this body reacts to
    pub fn mask(&self) -> CollisionLayers {
        self.mask
    }

    /// Whether the body can move at all
    pub fn is_dynamic(&self) -> bool {
        self.inverse_mass > 0.0
    }

    /// Whether swept collision testing is enabled
    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Whether the body is currently asleep
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Wake the body, restarting its rest countdown
    pub fn wake(&mut self) {
        self.sleeping = false;
        self.low_motion_steps = 0;
    }

    /// World-space bounds of the shape at the current placement
    pub fn world_aabb(&self) -> AABB {
        self.shape.world_aabb(&self.frame)
    }

    pub(crate) fn begin_step(&mut self) {
        self.prev_frame = self.frame;
    }

    pub(crate) fn integrate(&mut self, gravity: Vec3, dt: f32, max_rotation: f32) {
        if self.sleeping || !self.is_dynamic() {
            return;
        }
        if self.gravity_affected {
            self.linear_velocity += gravity * dt;
        }
        self.frame.translation += self.linear_velocity * dt;
        self.frame
            .integrate_rotation(self.angular_velocity, dt, max_rotation);
    }

    pub(crate) fn set_frame_internal(&mut self, frame: CoordinateFrame) {
        self.frame = frame;
        self.bounds_dirty = true;
    }

    pub(crate) fn shift_translation(&mut self, delta: Vec3) {
        self.frame.translation += delta;
        self.bounds_dirty = true;
    }

    pub(crate) fn apply_impulse_velocity(&mut self, delta: Vec3) {
        self.linear_velocity += delta;
    }

    /// Advance the rest countdown; returns true when the body fell asleep
    pub(crate) fn note_motion(&mut self, velocity_threshold: f32, sleep_steps: u32) -> bool {
        if self.sleeping || !self.is_dynamic() {
            return false;
        }
        let motion = self.linear_velocity.norm_squared() + self.angular_velocity.norm_squared();
        if motion < velocity_threshold {
            self.low_motion_steps += 1;
            if self.low_motion_steps >= sleep_steps {
                self.sleeping = true;
                self.linear_velocity = Vec3::zeros();
                self.angular_velocity = Vec3::zeros();
                return true;
            }
        } else {
            self.low_motion_steps = 0;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrate_applies_gravity_and_velocity() {
        let mut body = Body::new(CollisionShape::sphere(1.0))
            .with_linear_velocity(Vec3::new(2.0, 0.0, 0.0));
        body.integrate(Vec3::new(0.0, -10.0, 0.0), 0.5, 0.25);

        assert_relative_eq!(body.linear_velocity(), Vec3::new(2.0, -5.0, 0.0));
        assert_relative_eq!(body.translation(), Vec3::new(1.0, -2.5, 0.0));
    }

    #[test]
    fn test_static_body_never_moves() {
        let mut body = Body::new(CollisionShape::sphere(1.0))
            .with_static()
            .with_linear_velocity(Vec3::new(5.0, 0.0, 0.0));
        body.integrate(Vec3::new(0.0, -10.0, 0.0), 1.0, 0.25);
        assert_relative_eq!(body.translation(), Vec3::zeros());
    }

    #[test]
    fn test_teleport_snaps_motion_history() {
        let mut body = Body::new(CollisionShape::sphere(1.0));
        body.begin_step();
        body.set_translation(Vec3::new(100.0, 0.0, 0.0));
        assert_relative_eq!(body.prev_frame().translation, Vec3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn test_rest_countdown_leads_to_sleep() {
        let mut body = Body::new(CollisionShape::sphere(1.0));
        for _ in 0..4 {
            assert!(!body.is_sleeping());
            body.note_motion(1e-4, 5);
        }
        assert!(body.note_motion(1e-4, 5));
        assert!(body.is_sleeping());

        body.add_velocity(Vec3::new(1.0, 0.0, 0.0));
        assert!(!body.is_sleeping());
    }

    #[test]
    fn test_motion_resets_the_rest_countdown() {
        let mut body = Body::new(CollisionShape::sphere(1.0));
        for _ in 0..4 {
            body.note_motion(1e-4, 5);
        }
        body.set_linear_velocity(Vec3::new(1.0, 0.0, 0.0));
        assert!(!body.note_motion(1e-4, 5));
        assert!(!body.is_sleeping());
    }
}
