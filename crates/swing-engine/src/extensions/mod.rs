// extensions/mod.rs
//
// Optional extension modules for the engine.
// Decoupled from Entity/Scene; games and the camera opt in by owning them.

pub mod easing;
pub mod tween;

pub use easing::{Easing, lerp, lerp_vec2, ease, ease_vec2};
pub use tween::{Lerp, Tween, TweenLoop};
