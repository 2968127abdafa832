//! The simulation world: bodies, stepping, and contact resolution
//!
//! The world owns the bodies, a broadphase, and a fixed-step clock.
//! Variable frame time accumulates in a pool and is consumed in fixed
//! sub-steps, so simulation behavior does not depend on frame rate. Each
//! sub-step integrates velocities, pushes moved bounds into the broadphase,
//! and resolves the contacts behind the broadphase's pair events in their
//! emission order, which is deterministic for a given sequence of
//! operations.

pub mod body;

use std::collections::HashMap;

use slotmap::SlotMap;
use thiserror::Error;

use crate::core::SimulationConfig;
use crate::foundation::math::{CoordinateFrame, Vec3};
use crate::physics::collision::TriangleMesh;
use crate::physics::continuous::{continuous_collide, support_continuous_collide};
use crate::physics::narrowphase::{collide, collide_with_triangle};
use crate::physics::{CollisionShape, ContactPoint};
use crate::spatial::{BroadphaseError, PairEvent, ProxyId, ProxyPair, SweepAndPrune};

pub use body::{Body, BodyHandle};

/// Absolute distance (scaled by the unit-meter factor) the rewound
/// placement is nudged past the impact point, so the discrete test sees a
/// sliver of overlap even against zero-thickness geometry
const IMPACT_NUDGE_DISTANCE: f32 = 0.01;

/// Errors reported by the world
#[derive(Debug, Error)]
pub enum WorldError {
    /// The broadphase could not track another body
    #[error("broadphase rejected the body")]
    Broadphase(#[from] BroadphaseError),
}

/// A resolved contact between two bodies, reported once per sub-step
#[derive(Debug, Clone, Copy)]
pub struct ContactEvent {
    /// Body on the A side of the contact
    pub body_a: BodyHandle,
    /// Body on the B side of the contact
    pub body_b: BodyHandle,
    /// The contact as it was before resolution displaced the bodies
    pub contact: ContactPoint,
}

/// A self-contained rigid-body simulation
pub struct World {
    bodies: SlotMap<BodyHandle, Body>,
    proxy_to_body: HashMap<ProxyId, BodyHandle>,
    broadphase: SweepAndPrune,
    config: SimulationConfig,
    gravity: Vec3,
    time_pool: f32,
    contacts: Vec<ContactEvent>,
    event_scratch: Vec<PairEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl World {
    /// Create a world with the given configuration
    pub fn new(config: SimulationConfig) -> Self {
        let gravity = Vec3::new(0.0, -9.81, 0.0) * config.unit_meter;
        Self {
            bodies: SlotMap::with_key(),
            proxy_to_body: HashMap::new(),
            broadphase: SweepAndPrune::new(config.collision_margin),
            config,
            gravity,
            time_pool: 0.0,
            contacts: Vec::new(),
            event_scratch: Vec::new(),
        }
    }

    /// Add a body; returns its handle
    pub fn add_body(&mut self, mut body: Body) -> Result<BodyHandle, WorldError> {
        let aabb = body.world_aabb();
        let proxy = self.broadphase.add(body.layers(), body.mask(), &aabb)?;
        body.proxy = Some(proxy);
        body.bounds_dirty = false;
        let handle = self.bodies.insert(body);
        self.proxy_to_body.insert(proxy, handle);
        log::debug!("added body {handle:?} as broadphase proxy {proxy:?}");
        Ok(handle)
    }

    /// Remove a body and return it
    ///
    /// Safe at any time, including between ticks while the body still has
    /// active contacts; its pairs are flushed on the next sub-step.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        let body = self.bodies.remove(handle)?;
        if let Some(proxy) = body.proxy {
            self.broadphase.remove(proxy);
            self.proxy_to_body.remove(&proxy);
        }
        log::debug!("removed body {handle:?}");
        Some(body)
    }

    /// Look up a body
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Look up a body for mutation
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Iterate over all bodies
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter()
    }

    /// Number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of currently-overlapping broadphase pairs
    pub fn active_pair_count(&self) -> usize {
        self.broadphase.active_pair_count()
    }

    /// Contacts resolved during the most recent [`tick`](Self::tick)
    pub fn contacts(&self) -> &[ContactEvent] {
        &self.contacts
    }

    /// Current gravity vector (world units per second squared)
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Replace the gravity vector
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// The active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Change the world scale in units per meter
    ///
    /// Gravity and the broadphase margin rescale with it; body positions
    /// and shapes are left to the caller.
    pub fn set_unit_meter(&mut self, unit_meter: f32) {
        let ratio = unit_meter / self.config.unit_meter;
        self.gravity *= ratio;
        self.config.unit_meter = unit_meter;
        self.broadphase.set_unit_meter(unit_meter);
    }

    /// Advance the simulation by `dt` seconds of wall time
    ///
    /// Time accumulates in a pool and is consumed in fixed sub-steps; a
    /// stalled caller cannot request an unbounded amount of catch-up work
    /// because the pool is capped.
    pub fn tick(&mut self, dt: f32) {
        self.time_pool = (self.time_pool + dt).min(self.config.max_accumulated_time);
        self.contacts.clear();
        let step = self.config.substep_seconds;
        while self.time_pool >= step {
            self.time_pool -= step;
            self.substep(step);
        }
    }

    fn substep(&mut self, dt: f32) {
        let gravity = self.gravity;
        let max_rotation = self.config.max_rotation_per_step;
        for (_, body) in &mut self.bodies {
            body.begin_step();
            body.integrate(gravity, dt, max_rotation);
        }

        // Push moved bounds. Swept bodies get the union of their start and
        // end boxes so the broadphase cannot miss a mid-step crossing.
        for (_, body) in &mut self.bodies {
            let Some(proxy) = body.proxy else { continue };
            if !body.bounds_dirty && body.frame() == body.prev_frame() {
                continue;
            }
            let mut aabb = body.world_aabb();
            if body.is_continuous() {
                aabb = aabb.merged(&body.shape().world_aabb(body.prev_frame()));
            }
            self.broadphase.update(proxy, &aabb);
            body.bounds_dirty = false;
        }

        let mut events = std::mem::take(&mut self.event_scratch);
        events.clear();
        self.broadphase.tick(&mut events);
        for event in &events {
            match *event {
                // A body gaining or losing a neighbour needs to react.
                PairEvent::Started(pair) | PairEvent::Stopped(pair) => self.wake_pair(pair),
                PairEvent::Updated(pair) => self.dispatch_pair(pair),
            }
        }
        self.event_scratch = events;

        let threshold = self.config.sleep_velocity_threshold
            * self.config.unit_meter
            * self.config.unit_meter;
        for (_, body) in &mut self.bodies {
            body.note_motion(threshold, self.config.sleep_steps);
        }
    }

    fn pair_handles(&self, pair: ProxyPair) -> Option<(BodyHandle, BodyHandle)> {
        let a = *self.proxy_to_body.get(&pair.first())?;
        let b = *self.proxy_to_body.get(&pair.second())?;
        Some((a, b))
    }

    fn wake_pair(&mut self, pair: ProxyPair) {
        let Some((ha, hb)) = self.pair_handles(pair) else {
            return;
        };
        for handle in [ha, hb] {
            if let Some(body) = self.bodies.get_mut(handle) {
                if body.is_dynamic() {
                    body.wake();
                }
            }
        }
    }

    fn dispatch_pair(&mut self, pair: ProxyPair) {
        let Some((ha, hb)) = self.pair_handles(pair) else {
            return;
        };
        let (Some(a), Some(b)) = (self.bodies.get(ha), self.bodies.get(hb)) else {
            return;
        };
        let a_resting = a.is_sleeping() || !a.is_dynamic();
        let b_resting = b.is_sleeping() || !b.is_dynamic();
        if a_resting && b_resting {
            return;
        }

        match (a.shape().as_mesh().is_some(), b.shape().as_mesh().is_some()) {
            // Mesh-mesh pairs are not resolved; meshes are static scenery.
            (true, true) => {}
            (false, true) => self.collide_with_mesh(ha, hb),
            (true, false) => self.collide_with_mesh(hb, ha),
            (false, false) => self.dispatch_convex(ha, hb),
        }
    }

    fn dispatch_convex(&mut self, ha: BodyHandle, hb: BodyHandle) {
        let (shape_a, frame_a, prev_a, swept_a) = {
            let a = &self.bodies[ha];
            (a.shape_arc(), *a.frame(), *a.prev_frame(), a.is_continuous())
        };
        let (shape_b, frame_b, prev_b, swept_b) = {
            let b = &self.bodies[hb];
            (b.shape_arc(), *b.frame(), *b.prev_frame(), b.is_continuous())
        };

        if let Some(contact) = collide(&shape_a, &frame_a, &shape_b, &frame_b) {
            self.apply_contact(ha, hb, &contact);
            return;
        }
        if !(swept_a || swept_b) {
            return;
        }

        let tolerance = self.config.ccd_tolerance * self.config.unit_meter;
        let Some(t) = continuous_collide(
            &shape_a, &prev_a, &frame_a, &shape_b, &prev_b, &frame_b, tolerance,
        ) else {
            return;
        };

        // Rewind both bodies to just past the impact time; the slight
        // overlap lets the discrete test recover the contact geometry.
        let displacement = ((frame_a.translation - prev_a.translation)
            - (frame_b.translation - prev_b.translation))
            .norm();
        let t_rewind = self.nudged_impact_time(t, displacement);
        let rewound_a = CoordinateFrame::interpolate(&prev_a, &frame_a, t_rewind);
        let rewound_b = CoordinateFrame::interpolate(&prev_b, &frame_b, t_rewind);
        for (handle, rewound) in [(ha, rewound_a), (hb, rewound_b)] {
            if let Some(body) = self.bodies.get_mut(handle) {
                if body.is_dynamic() {
                    body.set_frame_internal(rewound);
                    body.wake();
                }
            }
        }
        if let Some(contact) = collide(&shape_a, &rewound_a, &shape_b, &rewound_b) {
            self.apply_contact(ha, hb, &contact);
        }
    }

    /// Time just past the impact, placed `IMPACT_NUDGE_DISTANCE` along the
    /// relative motion
    fn nudged_impact_time(&self, t: f32, displacement: f32) -> f32 {
        if displacement > f32::EPSILON {
            (t + IMPACT_NUDGE_DISTANCE * self.config.unit_meter / displacement).min(1.0)
        } else {
            1.0
        }
    }

    fn collide_with_mesh(&mut self, convex: BodyHandle, mesh_body: BodyHandle) {
        let (convex_shape, mesh_shape, mesh_frame, prev, cur, swept) = {
            let a = &self.bodies[convex];
            let b = &self.bodies[mesh_body];
            (
                a.shape_arc(),
                b.shape_arc(),
                *b.frame(),
                *a.prev_frame(),
                *a.frame(),
                a.is_continuous(),
            )
        };
        let Some(mesh) = mesh_shape.as_mesh() else {
            return;
        };
        let margin = self.config.collision_margin * self.config.unit_meter;
        let mesh_inverse = mesh_frame.inverse();

        if self.discrete_mesh_pass(convex, mesh_body, &convex_shape, mesh, &mesh_frame, margin) {
            return;
        }
        if !swept {
            return;
        }
        let Some(support) = convex_shape.as_support() else {
            return;
        };
        let displacement = (cur.translation - prev.translation).norm();
        if displacement <= f32::EPSILON {
            return;
        }

        // Swept pass: find the earliest impact over every triangle the
        // motion's swept box can reach.
        let tolerance = self.config.ccd_tolerance * self.config.unit_meter;
        let sweep_query = convex_shape
            .world_aabb(&prev)
            .merged(&convex_shape.world_aabb(&cur))
            .expanded(margin)
            .transformed(&mesh_inverse);
        let identity = CoordinateFrame::identity();
        let mut earliest: Option<f32> = None;
        mesh.visit_overlaps(sweep_query, |_, triangle| {
            let world_triangle = triangle.transformed(&mesh_frame);
            if let Some(t) = support_continuous_collide(
                support,
                &prev,
                &cur,
                &world_triangle,
                &identity,
                &identity,
                tolerance,
            ) {
                if earliest.map_or(true, |best| t < best) {
                    earliest = Some(t);
                }
            }
            None
        });
        let Some(t) = earliest else {
            return;
        };

        let rewound =
            CoordinateFrame::interpolate(&prev, &cur, self.nudged_impact_time(t, displacement));
        if let Some(body) = self.bodies.get_mut(convex) {
            if body.is_dynamic() {
                body.set_frame_internal(rewound);
                body.wake();
            }
        }
        self.discrete_mesh_pass(convex, mesh_body, &convex_shape, mesh, &mesh_frame, margin);
    }

    /// One discrete narrowphase pass over the triangles near the body;
    /// returns whether any contact was resolved
    fn discrete_mesh_pass(
        &mut self,
        convex: BodyHandle,
        mesh_body: BodyHandle,
        convex_shape: &CollisionShape,
        mesh: &TriangleMesh,
        mesh_frame: &CoordinateFrame,
        margin: f32,
    ) -> bool {
        let mesh_inverse = mesh_frame.inverse();
        let query = self.bodies[convex]
            .world_aabb()
            .expanded(margin)
            .transformed(&mesh_inverse);

        let mut resolved = false;
        mesh.visit_overlaps(query, |_, triangle| {
            let frame = *self.bodies.get(convex)?.frame();
            let world_triangle = triangle.transformed(mesh_frame);
            let contact = collide_with_triangle(convex_shape, &frame, &world_triangle)?;
            self.apply_contact(convex, mesh_body, &contact);
            resolved = true;
            // Resolution displaced the body; requery from where it is now.
            let updated = self.bodies.get(convex)?.world_aabb().expanded(margin);
            Some(updated.transformed(&mesh_inverse))
        });
        resolved
    }

    /// Resolve one contact: positional correction, an inelastic normal
    /// impulse, and tangential friction, each split by inverse-mass share
    fn apply_contact(&mut self, ha: BodyHandle, hb: BodyHandle, contact: &ContactPoint) {
        let Some([a, b]) = self.bodies.get_disjoint_mut([ha, hb]) else {
            return;
        };
        let inv_a = a.inverse_mass();
        let inv_b = b.inverse_mass();
        let total = inv_a + inv_b;
        if total <= f32::EPSILON {
            return;
        }
        let depth = contact.penetration();
        if depth <= 0.0 {
            return;
        }
        let normal = contact.normal;

        a.shift_translation(-normal * (depth * inv_a / total));
        b.shift_translation(normal * (depth * inv_b / total));

        let relative = b.linear_velocity() - a.linear_velocity();
        let approach = relative.dot(&normal);
        if approach < 0.0 {
            // Perfectly inelastic: cancel the approach velocity exactly.
            let impulse = -approach / total;
            a.apply_impulse_velocity(-normal * (impulse * inv_a));
            b.apply_impulse_velocity(normal * (impulse * inv_b));
        }

        let tangential = relative - normal * approach;
        if tangential.norm_squared() > 1e-12 {
            let friction = (a.friction() * b.friction()).min(1.0);
            let correction = tangential * (friction / total);
            a.apply_impulse_velocity(correction * inv_a);
            b.apply_impulse_velocity(-correction * inv_b);
        }

        // Only a sleeping body is woken here; waking also resets the rest
        // countdown, which would keep bodies in persistent contact awake
        // forever.
        if a.is_sleeping() {
            a.wake();
        }
        if b.is_sleeping() {
            b.wake();
        }
        self.contacts.push(ContactEvent {
            body_a: ha,
            body_b: hb,
            contact: *contact,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::TriangleMesh;
    use crate::physics::{CollisionShape, Triangle};
    use approx::assert_relative_eq;

    fn run(world: &mut World, seconds: f32) {
        // Feed time in small slices so the accumulation cap never bites.
        let slice = 0.05_f32;
        let mut remaining = seconds;
        while remaining > 0.0 {
            world.tick(slice.min(remaining));
            remaining -= slice;
        }
    }

    #[test]
    fn test_free_fall_under_gravity() {
        let mut world = World::default();
        let ball = world
            .add_body(Body::new(CollisionShape::sphere(0.5)).with_translation(Vec3::new(
                0.0, 100.0, 0.0,
            )))
            .unwrap();

        run(&mut world, 1.0);

        let body = world.body(ball).unwrap();
        // Slice accumulation can leave one sub-step short of a full second.
        assert_relative_eq!(body.linear_velocity().y, -9.81, epsilon = 0.1);
        // Explicit Euler lands slightly below the analytic -4.905.
        assert!(body.translation().y < 100.0 - 4.5);
        assert!(body.translation().y > 100.0 - 5.5);
    }

    #[test]
    fn test_head_on_spheres_stop_and_separate() {
        let mut world = World::default();
        world.set_gravity(Vec3::zeros());
        let a = world
            .add_body(
                Body::new(CollisionShape::sphere(0.5))
                    .with_translation(Vec3::new(-0.45, 0.0, 0.0))
                    .with_linear_velocity(Vec3::new(1.0, 0.0, 0.0))
                    .with_friction(0.0),
            )
            .unwrap();
        let b = world
            .add_body(
                Body::new(CollisionShape::sphere(0.5))
                    .with_translation(Vec3::new(0.45, 0.0, 0.0))
                    .with_linear_velocity(Vec3::new(-1.0, 0.0, 0.0))
                    .with_friction(0.0),
            )
            .unwrap();

        world.tick(world.config().substep_seconds);

        assert!(!world.contacts().is_empty());
        let va = world.body(a).unwrap().linear_velocity();
        let vb = world.body(b).unwrap().linear_velocity();
        // Equal masses, perfectly inelastic: both end at the common velocity.
        assert_relative_eq!(va.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(vb.x, 0.0, epsilon = 1e-4);

        let gap = world.body(b).unwrap().translation().x - world.body(a).unwrap().translation().x;
        assert!(gap >= 1.0 - 1e-3, "spheres still overlap: gap {gap}");
    }

    #[test]
    fn test_sphere_rests_on_static_floor() {
        let mut world = World::default();
        world
            .add_body(
                Body::new(CollisionShape::cuboid(Vec3::new(5.0, 0.5, 5.0))).with_static(),
            )
            .unwrap();
        let ball = world
            .add_body(
                Body::new(CollisionShape::sphere(0.5)).with_translation(Vec3::new(0.0, 2.0, 0.0)),
            )
            .unwrap();

        run(&mut world, 2.0);

        let body = world.body(ball).unwrap();
        // Floor top is at 0.5, so the sphere center settles near 1.0.
        assert_relative_eq!(body.translation().y, 1.0, epsilon = 0.1);
        assert!(body.linear_velocity().norm() < 0.5);
    }

    #[test]
    fn test_static_floor_does_not_move() {
        let mut world = World::default();
        let floor = world
            .add_body(
                Body::new(CollisionShape::cuboid(Vec3::new(5.0, 0.5, 5.0))).with_static(),
            )
            .unwrap();
        world
            .add_body(
                Body::new(CollisionShape::sphere(0.5)).with_translation(Vec3::new(0.0, 1.2, 0.0)),
            )
            .unwrap();

        run(&mut world, 1.0);
        assert_relative_eq!(world.body(floor).unwrap().translation(), Vec3::zeros());
    }

    #[test]
    fn test_sphere_rests_on_mesh_floor() {
        let mut triangles = Vec::new();
        for i in -4..4 {
            for j in -4..4 {
                let (x, z) = (i as f32, j as f32);
                let a = Vec3::new(x, 0.0, z);
                let b = Vec3::new(x + 1.0, 0.0, z);
                let c = Vec3::new(x + 1.0, 0.0, z + 1.0);
                let d = Vec3::new(x, 0.0, z + 1.0);
                triangles.push(Triangle::new(a, c, b));
                triangles.push(Triangle::new(a, d, c));
            }
        }

        let mut world = World::default();
        world
            .add_body(
                Body::new(CollisionShape::mesh(TriangleMesh::new(triangles))).with_static(),
            )
            .unwrap();
        let ball = world
            .add_body(
                Body::new(CollisionShape::sphere(0.5)).with_translation(Vec3::new(0.3, 2.0, 0.3)),
            )
            .unwrap();

        run(&mut world, 2.0);

        let body = world.body(ball).unwrap();
        assert_relative_eq!(body.translation().y, 0.5, epsilon = 0.1);
    }

    #[test]
    fn test_swept_body_does_not_tunnel_through_thin_wall() {
        let mut world = World::default();
        world.set_gravity(Vec3::zeros());
        world
            .add_body(
                Body::new(CollisionShape::cuboid(Vec3::new(0.05, 5.0, 5.0)))
                    .with_static()
                    .with_translation(Vec3::new(5.0, 0.0, 0.0)),
            )
            .unwrap();
        let bullet = world
            .add_body(
                Body::new(CollisionShape::sphere(0.1))
                    .with_linear_velocity(Vec3::new(1200.0, 0.0, 0.0))
                    .with_continuous(true),
            )
            .unwrap();

        world.tick(world.config().substep_seconds);

        let x = world.body(bullet).unwrap().translation().x;
        assert!(x < 5.0, "bullet tunneled through the wall to x = {x}");
    }

    #[test]
    fn test_swept_body_does_not_tunnel_through_mesh_wall() {
        let mut world = World::default();
        world.set_gravity(Vec3::zeros());
        let wall = TriangleMesh::from_vertices(
            &[
                Vec3::new(5.0, -5.0, -5.0),
                Vec3::new(5.0, 5.0, -5.0),
                Vec3::new(5.0, 5.0, 5.0),
                Vec3::new(5.0, -5.0, 5.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
        );
        world
            .add_body(Body::new(CollisionShape::mesh(wall)).with_static())
            .unwrap();
        let bullet = world
            .add_body(
                Body::new(CollisionShape::sphere(0.1))
                    .with_linear_velocity(Vec3::new(1200.0, 0.0, 0.0))
                    .with_continuous(true),
            )
            .unwrap();

        world.tick(world.config().substep_seconds);

        // Zero-thickness triangles: only the swept pass can catch this.
        let x = world.body(bullet).unwrap().translation().x;
        assert!(x < 5.0, "bullet tunneled through the wall to x = {x}");
    }

    #[test]
    fn test_removal_mid_simulation_is_safe() {
        let mut world = World::default();
        world.set_gravity(Vec3::zeros());
        let mut handles = Vec::new();
        for i in 0..3 {
            handles.push(
                world
                    .add_body(
                        Body::new(CollisionShape::sphere(0.6))
                            .with_translation(Vec3::new(i as f32 * 0.8, 0.0, 0.0)),
                    )
                    .unwrap(),
            );
        }
        world.tick(world.config().substep_seconds);
        assert!(!world.contacts().is_empty());

        let doomed = handles.remove(1);
        world.remove_body(doomed);
        world.tick(world.config().substep_seconds);

        assert_eq!(world.body_count(), 2);
        for event in world.contacts() {
            assert_ne!(event.body_a, doomed);
            assert_ne!(event.body_b, doomed);
        }
    }

    #[test]
    fn test_resting_body_falls_asleep_and_wakes_on_impulse() {
        let mut world = World::default();
        world
            .add_body(
                Body::new(CollisionShape::cuboid(Vec3::new(5.0, 0.5, 5.0))).with_static(),
            )
            .unwrap();
        let ball = world
            .add_body(
                Body::new(CollisionShape::sphere(0.5)).with_translation(Vec3::new(0.0, 1.01, 0.0)),
            )
            .unwrap();

        run(&mut world, 3.0);
        assert!(world.body(ball).unwrap().is_sleeping());

        world
            .body_mut(ball)
            .unwrap()
            .add_velocity(Vec3::new(0.0, 5.0, 0.0));
        assert!(!world.body(ball).unwrap().is_sleeping());
        run(&mut world, 0.1);
        assert!(world.body(ball).unwrap().translation().y > 1.05);
    }

    #[test]
    fn test_unit_meter_rescales_gravity() {
        let mut world = World::default();
        assert_relative_eq!(world.gravity().y, -9.81);
        world.set_unit_meter(100.0);
        assert_relative_eq!(world.gravity().y, -981.0, epsilon = 1e-3);
        assert_relative_eq!(world.config().unit_meter, 100.0);
    }

    #[test]
    fn test_layer_filtering_prevents_contacts() {
        use crate::physics::collision_layers::CollisionLayers;

        let mut world = World::default();
        world.set_gravity(Vec3::zeros());
        world
            .add_body(
                Body::new(CollisionShape::sphere(0.5))
                    .with_layers(CollisionLayers::DEBRIS, CollisionLayers::ENVIRONMENT),
            )
            .unwrap();
        world
            .add_body(
                Body::new(CollisionShape::sphere(0.5))
                    .with_translation(Vec3::new(0.5, 0.0, 0.0))
                    .with_layers(CollisionLayers::DEBRIS, CollisionLayers::ENVIRONMENT),
            )
            .unwrap();

        world.tick(world.config().substep_seconds);
        assert!(world.contacts().is_empty());
        assert_eq!(world.active_pair_count(), 0);
    }
}
