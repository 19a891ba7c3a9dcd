pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod storage;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{EntityId, SoundEvent, GameEvent};
pub use components::entity::Entity;
pub use components::shape::{Color, Shape, ShapeComponent};
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use renderer::camera::{Camera2D, CameraUniform, WorldView};
pub use renderer::shape_instance::{ShapeInstance, ShapeBuffer};
pub use input::queue::{InputEvent, InputQueue};
pub use input::action::{ActionState, keys};
pub use storage::{KeyValueStore, MemoryStore, JsonFileStore, StoreError};
pub use systems::render::build_shape_buffer;

#[cfg(feature = "physics")]
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial, CollisionGroup,
    JointHandle, JointDesc, SensorOverlap,
};

// Extensions: decoupled optional systems
pub use extensions::{Easing, lerp, lerp_vec2, ease, ease_vec2, Lerp, Tween, TweenLoop};
