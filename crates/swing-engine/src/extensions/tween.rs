// extensions/tween.rs
//
// Value tweens: an eased transition between two values of any interpolable
// type, advanced by the owner each tick.
//
// Usage:
//   let mut pan = Tween::new(from, to, 0.3, Easing::CubicInOut);
//   let center = pan.tick(dt);

use glam::Vec2;
use super::easing::{Easing, lerp, lerp_vec2};

/// Values a [`Tween`] can interpolate.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        lerp(self, to, t)
    }
}

impl Lerp for Vec2 {
    fn lerp(self, to: Self, t: f32) -> Self {
        lerp_vec2(self, to, t)
    }
}

/// What happens when a tween completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop at the end value.
    #[default]
    Once,
    /// Restart from the beginning.
    Loop,
}

/// A single eased transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T: Lerp> {
    pub from: T,
    pub to: T,
    /// Duration in seconds. Zero or negative completes on the first tick.
    pub duration: f32,
    /// Elapsed time within the current pass.
    pub elapsed: f32,
    pub easing: Easing,
    pub loop_mode: TweenLoop,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
            loop_mode: TweenLoop::Once,
        }
    }

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    /// Normalized progress of the current pass [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Whether a `Once` tween has reached its end value.
    pub fn is_complete(&self) -> bool {
        self.loop_mode == TweenLoop::Once && self.progress() >= 1.0
    }

    /// Current interpolated value.
    pub fn value(&self) -> T {
        self.from.lerp(self.to, self.easing.apply(self.progress()))
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn tick(&mut self, dt: f32) -> T {
        self.elapsed += dt.max(0.0);

        if self.duration > 0.0 && self.elapsed >= self.duration {
            match self.loop_mode {
                TweenLoop::Once => self.elapsed = self.duration,
                TweenLoop::Loop => self.elapsed %= self.duration,
            }
        }

        self.value()
    }
}
