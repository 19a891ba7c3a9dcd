use crate::core::scene::Scene;
use crate::api::types::{EntityId, SoundEvent, GameEvent};
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera2D;
use crate::renderer::shape_instance::ShapeBuffer;
#[cfg(feature = "physics")]
use crate::core::physics::{
    PhysicsWorld, BodyDesc, ColliderMaterial, SensorOverlap,
};
#[cfg(feature = "physics")]
use crate::components::entity::Entity;
#[cfg(feature = "physics")]
use glam::Vec2;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum catch-up ticks per frame (default: 10).
    pub max_steps_per_frame: u32,
    /// Viewport width in screen pixels.
    pub viewport_width: f32,
    /// Viewport height in screen pixels.
    pub viewport_height: f32,
    /// Maximum number of shape instances per frame (default: 256).
    pub max_shapes: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector for physics simulation. Default: zero (no gravity).
    /// For Y-down coordinate systems, use positive Y for downward gravity.
    #[cfg(feature = "physics")]
    pub gravity: glam::Vec2,
    /// When set, the runner steps physics after every `Game::update`.
    /// Games that gate the simulation themselves call
    /// [`EngineContext::step_physics`] and turn this off.
    #[cfg(feature = "physics")]
    pub auto_step_physics: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            viewport_width: 800.0,
            viewport_height: 600.0,
            max_shapes: 256,
            max_sounds: 32,
            max_events: 32,
            #[cfg(feature = "physics")]
            gravity: glam::Vec2::ZERO,
            #[cfg(feature = "physics")]
            auto_step_physics: true,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. Runs once per fixed timestep.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Optional read-only render pass for custom draw commands.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub camera: Camera2D,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    /// Fixed timestep of the running game, in seconds.
    pub dt: f32,
    next_id: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "physics")]
    overlap_events: Vec<SensorOverlap>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    /// Build a context matching a game's configuration: viewport size,
    /// timestep and gravity.
    pub fn from_config(config: &GameConfig) -> Self {
        #[cfg(feature = "physics")]
        let physics = {
            let mut world = PhysicsWorld::new(config.gravity);
            world.set_dt(config.fixed_dt);
            world
        };

        Self {
            scene: Scene::new(),
            camera: Camera2D::new(config.viewport_width, config.viewport_height),
            sounds: Vec::with_capacity(config.max_sounds),
            events: Vec::with_capacity(config.max_events),
            dt: config.fixed_dt,
            next_id: 1,
            #[cfg(feature = "physics")]
            physics,
            #[cfg(feature = "physics")]
            overlap_events: Vec::new(),
        }
    }

    /// Create an EngineContext with a custom gravity vector.
    #[cfg(feature = "physics")]
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self::from_config(&GameConfig { gravity, ..GameConfig::default() })
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a sound event to be forwarded to the shell.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to the shell.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Returns the EntityId.
    /// The entity's position is set from the BodyDesc.
    #[cfg(feature = "physics")]
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity
            .with_pos(desc.position)
            .with_rotation(desc.rotation)
            .with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity, cleaning up its physics body if present.
    #[cfg(feature = "physics")]
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.despawn(id) {
            if let Some(body) = &entity.body {
                self.physics.remove_body(body);
            }
        }
    }

    /// Overlap starts of watched bodies from the most recent physics step.
    #[cfg(feature = "physics")]
    pub fn overlaps(&self) -> &[SensorOverlap] {
        &self.overlap_events
    }

    /// Step the physics simulation and sync positions back to entities.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.physics.step();
        self.overlap_events = self.physics.drain_overlaps();
        self.sync_bodies();
    }

    /// Copy body poses onto their entities (also needed after teleporting
    /// bodies outside a step).
    #[cfg(feature = "physics")]
    pub fn sync_bodies(&mut self) {
        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for optional custom draw commands.
pub struct RenderContext<'a> {
    pub shapes: &'a mut ShapeBuffer,
    pub camera: &'a Camera2D,
}
