use glam::Vec2;
use rapier2d::prelude::*;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::api::types::EntityId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra and back
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

/// Rapier interaction groups are a 32-bit mask; bit 0 is left to bodies
/// that never asked for a group.
const MAX_COLLISION_GROUPS: u32 = 31;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
        }
    }

    /// Principal angular inertia of a solid shape of the given mass.
    fn angular_inertia(&self, mass: f32) -> f32 {
        match *self {
            ColliderDesc::Ball { radius } => 0.5 * mass * radius * radius,
            ColliderDesc::Cuboid { half_width, half_height } => {
                let w = half_width * 2.0;
                let h = half_height * 2.0;
                mass * (w * w + h * h) / 12.0
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// A collision group handed out by [`PhysicsWorld::next_collision_group`].
///
/// Members of an isolated group never collide or overlap with each other,
/// but still interact with every body outside the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionGroup {
    bit: u32,
    isolate: bool,
}

impl CollisionGroup {
    fn interaction_groups(self) -> InteractionGroups {
        let member = Group::from_bits_truncate(1 << self.bit);
        let filter = if self.isolate {
            Group::ALL.difference(member)
        } else {
            Group::ALL
        };
        InteractionGroups::new(member, filter)
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub gravity_scale: f32,
    pub collider: ColliderDesc,
    /// Sensors report overlaps but never produce contact forces.
    pub sensor: bool,
    pub group: Option<CollisionGroup>,
    /// Explicit mass, independent of the collider's density.
    pub mass: Option<f32>,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            rotation: 0.0,
            gravity_scale: 1.0,
            collider,
            sensor: false,
            group: None,
            mass: None,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            gravity_scale: 0.0,
            ..Self::dynamic(collider)
        }
    }

    /// A static sensor circle: never moves, never pushes, only reports overlaps.
    pub fn static_sensor_circle(position: Vec2, radius: f32) -> Self {
        Self::fixed(ColliderDesc::Ball { radius })
            .with_position(position)
            .with_sensor(true)
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn with_group(mut self, group: CollisionGroup) -> Self {
        self.group = Some(group);
        self
    }

    /// Give the body a fixed mass (inertia derived from the collider shape).
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// Handle to a joint in the physics simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointHandle(pub(crate) ImpulseJointHandle);

/// Description of a joint to create between two bodies.
#[derive(Debug, Clone, Copy)]
pub enum JointDesc {
    /// Zero-length point constraint: the two local anchors are pinned
    /// together while both bodies rotate freely around the pin.
    Revolute { anchor_a: Vec2, anchor_b: Vec2 },
}

/// A watched body started overlapping another body during the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorOverlap {
    pub watcher: EntityId,
    pub other: EntityId,
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.collisions.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single, easy-to-use struct.
///
/// Y points down: positive gravity pulls bodies toward larger Y.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    /// Colliders whose overlap starts are reported as [`SensorOverlap`].
    watched: HashSet<ColliderHandle>,
    overlaps: Vec<SensorOverlap>,
    next_group: u32,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            watched: HashSet::new(),
            overlaps: Vec::new(),
            next_group: 0,
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn gravity(&self) -> Vec2 {
        na_to_vec2(&self.gravity)
    }

    /// Allocate a fresh collision group.
    ///
    /// # Panics
    /// When more than 31 groups are requested; groups are meant to be
    /// allocated once per rig, not per frame.
    pub fn next_collision_group(&mut self, isolate: bool) -> CollisionGroup {
        assert!(
            self.next_group < MAX_COLLISION_GROUPS,
            "collision groups exhausted ({} allocated)",
            MAX_COLLISION_GROUPS
        );
        self.next_group += 1;
        CollisionGroup {
            bit: self.next_group,
            isolate,
        }
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in the body's `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let mut builder = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(nalgebra::Vector2::new(desc.position.x, desc.position.y))
            .rotation(desc.rotation)
            .gravity_scale(desc.gravity_scale)
            .user_data(entity_id.0 as u128);

        if let Some(mass) = desc.mass {
            builder = builder.additional_mass_properties(MassProperties::new(
                nalgebra::Point2::origin(),
                mass,
                desc.collider.angular_inertia(mass),
            ));
        }

        let body_handle = self.bodies.insert(builder.build());

        let groups = desc
            .group
            .map(CollisionGroup::interaction_groups)
            .unwrap_or_else(InteractionGroups::all);

        let collider = desc
            .collider
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .sensor(desc.sensor)
            .collision_groups(groups)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        // Rapier folds collider and additional mass in lazily during a step;
        // do it now so `mass` is right before the first step.
        if let Some(rb) = self.bodies.get_mut(body_handle) {
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders and joints from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.watched.remove(&body.collider_handle);
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Report every overlap this body starts from now on as a [`SensorOverlap`].
    pub fn watch_overlaps(&mut self, body: &PhysicsBody) {
        self.watched.insert(body.collider_handle);
    }

    /// Advance the simulation by one timestep.
    ///
    /// Overlap starts involving watched bodies are queued and picked up with
    /// [`PhysicsWorld::drain_overlaps`] once the step is done, so reacting to
    /// them (e.g. creating joints) never touches a step in flight.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let CollisionEvent::Started(h1, h2, _) = event else {
                continue;
            };
            let (Some(a), Some(b)) = (self.collider_to_entity(h1), self.collider_to_entity(h2))
            else {
                continue;
            };

            if self.watched.contains(&h1) {
                self.overlaps.push(SensorOverlap { watcher: a, other: b });
            }
            if self.watched.contains(&h2) {
                self.overlaps.push(SensorOverlap { watcher: b, other: a });
            }
        }
    }

    /// Take the overlap starts queued by the last step(s).
    pub fn drain_overlaps(&mut self) -> Vec<SensorOverlap> {
        std::mem::take(&mut self.overlaps)
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Set the angular velocity (radians per second, positive = clockwise on a Y-down screen).
    pub fn set_angular_velocity(&mut self, body: &PhysicsBody, angvel: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_angvel(angvel, true);
        }
    }

    pub fn angular_velocity(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.angvel())
            .unwrap_or(0.0)
    }

    /// Teleport a body to a new position and angle.
    pub fn set_pose(&mut self, body: &PhysicsBody, pos: Vec2, rotation: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_position(nalgebra::Isometry2::new(vec2_to_na(pos), rotation), true);
        }
    }

    /// Get the current position and rotation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    /// Total mass of a body, collider density plus explicit mass (0 for dead handles).
    pub fn mass(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.mass())
            .unwrap_or(0.0)
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // -- Joint methods --

    /// Create a joint between two bodies. Returns a handle for later removal.
    pub fn create_joint(
        &mut self,
        body_a: &PhysicsBody,
        body_b: &PhysicsBody,
        desc: &JointDesc,
    ) -> JointHandle {
        let handle = match desc {
            JointDesc::Revolute { anchor_a, anchor_b } => {
                let joint = RevoluteJointBuilder::new()
                    .local_anchor1(nalgebra::Point2::new(anchor_a.x, anchor_a.y))
                    .local_anchor2(nalgebra::Point2::new(anchor_b.x, anchor_b.y))
                    .build();
                self.impulse_joints.insert(body_a.body_handle, body_b.body_handle, joint, true)
            }
        };
        JointHandle(handle)
    }

    /// Remove a joint from the simulation. Removing a joint that is already
    /// gone (e.g. dropped together with one of its bodies) does nothing.
    pub fn remove_joint(&mut self, handle: JointHandle) {
        if self.impulse_joints.remove(handle.0, true).is_none() {
            log::debug!("remove_joint: {:?} already gone", handle);
        }
    }

    /// Number of joints in the simulation.
    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    // -- private helpers --

    fn collider_to_entity(&self, collider_handle: ColliderHandle) -> Option<EntityId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(EntityId(body.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
