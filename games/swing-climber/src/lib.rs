use wasm_bindgen::prelude::*;
use swing_engine::InputEvent;

pub mod camera;
pub mod config;
pub mod game;
pub mod holds;
pub mod palette;
pub mod rig;
pub mod score;
pub mod swing;

pub use config::{ClimberConfig, ConfigError};
pub use game::SwingClimber;

#[cfg(target_arch = "wasm32")]
swing_web::export_game!(
    SwingClimber,
    "swing-climber",
    SwingClimber::with_store(swing_web::browser_store())
);

#[cfg(not(target_arch = "wasm32"))]
swing_web::export_game!(SwingClimber, "swing-climber");
