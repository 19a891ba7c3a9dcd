//! The player: a torso with a grabbing hand pinned to its top end.

use glam::Vec2;
use swing_engine::{
    BodyDesc, Color, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId, JointDesc,
    PhysicsBody, ShapeComponent,
};

use crate::config::ClimberConfig;

pub const TORSO_TAG: &str = "torso";
pub const HAND_TAG: &str = "hand";

const TORSO_COLOR: u32 = 0xffd166;

/// Handles to the two rig bodies. Created once, repositioned on every reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerRig {
    pub torso: EntityId,
    pub hand: EntityId,
    torso_body: PhysicsBody,
    hand_body: PhysicsBody,
    half_length: f32,
}

impl PlayerRig {
    /// Spawn torso and hand at the configured spawn point.
    ///
    /// Both bodies are sensors in one isolated group: they never push holds
    /// around and never see each other, only the hand's hold overlaps matter.
    pub fn create(ctx: &mut EngineContext, config: &ClimberConfig) -> Self {
        let spawn = config.spawn_point();
        let half_length = config.body_length / 2.0;
        let group = ctx.physics.next_collision_group(true);
        // Sensors only get mass from explicit mass properties
        let massless = ColliderMaterial { density: 0.0, ..ColliderMaterial::default() };

        let torso = ctx.next_id();
        let torso_body = ctx.physics.create_body(
            torso,
            &BodyDesc::dynamic(ColliderDesc::Cuboid {
                half_width: config.body_width / 2.0,
                half_height: half_length,
            })
            .with_position(spawn)
            .with_sensor(true)
            .with_group(group)
            .with_mass(config.torso_mass),
            massless,
        );
        ctx.scene.spawn(
            Entity::new(torso)
                .with_tag(TORSO_TAG)
                .with_pos(spawn)
                .with_shape(
                    ShapeComponent::rect(config.body_width, config.body_length, Color::from_hex(TORSO_COLOR))
                        .with_layer(1),
                )
                .with_body(torso_body),
        );

        let hand = ctx.next_id();
        let hand_start = spawn - Vec2::new(0.0, half_length);
        let hand_body = ctx.physics.create_body(
            hand,
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: config.hand_radius })
                .with_position(hand_start)
                .with_sensor(true)
                .with_group(group)
                .with_mass(config.hand_mass),
            massless,
        );
        ctx.scene.spawn(
            Entity::new(hand)
                .with_tag(HAND_TAG)
                .with_pos(hand_start)
                .with_body(hand_body),
        );

        ctx.physics.create_joint(
            &torso_body,
            &hand_body,
            &JointDesc::Revolute {
                anchor_a: Vec2::new(0.0, -half_length),
                anchor_b: Vec2::ZERO,
            },
        );
        ctx.physics.watch_overlaps(&hand_body);

        let rig = Self {
            torso,
            hand,
            torso_body,
            hand_body,
            half_length,
        };
        log::info!("player rig spawned at ({}, {}), mass {}", spawn.x, spawn.y, rig.mass(ctx));
        rig
    }

    /// Torso plus hand.
    pub fn mass(&self, ctx: &EngineContext) -> f32 {
        ctx.physics.mass(&self.torso_body) + ctx.physics.mass(&self.hand_body)
    }

    /// Put the rig back upright at `position`, motionless.
    pub fn reset(&self, ctx: &mut EngineContext, position: Vec2) {
        let physics = &mut ctx.physics;
        physics.set_pose(&self.torso_body, position, 0.0);
        physics.set_velocity(&self.torso_body, Vec2::ZERO);
        physics.set_angular_velocity(&self.torso_body, 0.0);

        physics.set_pose(&self.hand_body, position + self.hand_offset(0.0), 0.0);
        physics.set_velocity(&self.hand_body, Vec2::ZERO);
        physics.set_angular_velocity(&self.hand_body, 0.0);

        ctx.sync_bodies();
    }

    /// Torso-relative position of the grip point (the torso's top end) for a
    /// torso rotated by `angle`.
    pub fn hand_offset(&self, angle: f32) -> Vec2 {
        Vec2::new(self.half_length * angle.sin(), -self.half_length * angle.cos())
    }

    /// Anchor of the grip point in the torso's local frame.
    pub fn grip_anchor(&self) -> Vec2 {
        Vec2::new(0.0, -self.half_length)
    }

    /// World position of the grip point.
    pub fn grip_position(&self, ctx: &EngineContext) -> Vec2 {
        let (pos, angle) = ctx.physics.body_position(&self.torso_body);
        pos + self.hand_offset(angle)
    }

    /// World position of the hand sensor.
    pub fn hand_position(&self, ctx: &EngineContext) -> Vec2 {
        ctx.physics.body_position(&self.hand_body).0
    }

    pub fn torso_position(&self, ctx: &EngineContext) -> Vec2 {
        ctx.physics.body_position(&self.torso_body).0
    }

    pub fn angle(&self, ctx: &EngineContext) -> f32 {
        ctx.physics.body_position(&self.torso_body).1
    }

    pub fn angular_velocity(&self, ctx: &EngineContext) -> f32 {
        ctx.physics.angular_velocity(&self.torso_body)
    }

    pub fn set_angular_velocity(&self, ctx: &mut EngineContext, angvel: f32) {
        ctx.physics.set_angular_velocity(&self.torso_body, angvel);
    }

    pub fn velocity(&self, ctx: &EngineContext) -> Vec2 {
        ctx.physics.velocity(&self.torso_body)
    }

    /// Add `delta` to the torso's linear velocity.
    pub fn boost(&self, ctx: &mut EngineContext, delta: Vec2) {
        let v = ctx.physics.velocity(&self.torso_body);
        ctx.physics.set_velocity(&self.torso_body, v + delta);
    }

    pub fn torso_body(&self) -> &PhysicsBody {
        &self.torso_body
    }

    pub fn hand_body(&self) -> &PhysicsBody {
        &self.hand_body
    }
}
