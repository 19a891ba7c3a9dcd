//! Hold outline color cycling.

use swing_engine::{Color, Easing, Tween, TweenLoop};

/// Sweeps the hue wheel once every cycle, saturation and value at full.
#[derive(Debug, Clone)]
pub struct HoldPalette {
    hue: Tween<f32>,
}

impl HoldPalette {
    pub fn new(cycle_secs: f32) -> Self {
        Self {
            hue: Tween::new(0.0, 359.0, cycle_secs, Easing::Linear).with_loop(TweenLoop::Loop),
        }
    }

    /// Whole-degree hue currently shown.
    pub fn hue(&self) -> f32 {
        self.hue.value().floor()
    }

    pub fn color(&self) -> Color {
        Color::from_hsv(self.hue(), 1.0, 1.0)
    }

    /// Advance by `dt` seconds and return the new color.
    pub fn tick(&mut self, dt: f32) -> Color {
        self.hue.tick(dt);
        self.color()
    }
}
