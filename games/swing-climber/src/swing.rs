//! Released/Anchored state machine for the climbing joint.

use glam::Vec2;
use swing_engine::{EngineContext, JointDesc, JointHandle, WorldView};

use crate::config::ClimberConfig;
use crate::holds::Hold;
use crate::rig::PlayerRig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwingState {
    /// Flying free (or resting before the first catch).
    Released,
    /// Pinned to a hold by the climbing joint.
    Anchored(JointHandle),
}

/// A hold was just grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catch {
    pub level: u32,
    /// The forced catch that starts a run: no sound, no score.
    pub first: bool,
}

/// Angular velocity while anchored, growing with score up to a cap.
pub fn swing_rate(score: u32, config: &ClimberConfig) -> f32 {
    (config.swing_base_rate + score as f32 * config.swing_rate_per_point).min(config.swing_max_rate)
}

/// Release kick, fading linearly to zero at `release_boost_falloff_score`.
pub fn release_boost(score: u32, config: &ClimberConfig) -> f32 {
    let remaining = 1.0 - score as f32 / config.release_boost_falloff_score;
    (config.release_boost_max * remaining).max(0.0)
}

/// Direction the torso center travels when swinging with increasing angle.
pub fn swing_direction(angle: f32) -> Vec2 {
    Vec2::new(-angle.cos(), -angle.sin())
}

/// The run is over once the torso drops past the bottom of the view.
pub fn has_fallen(view: &WorldView, torso_y: f32, epsilon: f32) -> bool {
    view.bottom + epsilon < torso_y
}

/// Owns the single climbing joint.
#[derive(Debug)]
pub struct SwingController {
    state: SwingState,
    first_catch: bool,
}

impl SwingController {
    pub fn new() -> Self {
        Self {
            state: SwingState::Released,
            first_catch: true,
        }
    }

    pub fn is_anchored(&self) -> bool {
        matches!(self.state, SwingState::Anchored(_))
    }

    /// Whether the next catch is the forced first one of a run.
    pub fn awaiting_first_catch(&self) -> bool {
        self.first_catch
    }

    /// Grab `hold` if free to. Ignored while anchored or while the release
    /// input is held.
    ///
    /// The joint pins the grip point where it currently is relative to the
    /// hold, so the catch does not yank the rig onto the hold center.
    pub fn try_catch(
        &mut self,
        ctx: &mut EngineContext,
        rig: &PlayerRig,
        hold: &Hold,
        release_held: bool,
    ) -> Option<Catch> {
        if self.is_anchored() || release_held {
            return None;
        }
        let hold_body = ctx.scene.get(hold.entity).and_then(|e| e.body)?;

        let grip = rig.grip_position(ctx);
        let joint = ctx.physics.create_joint(
            rig.torso_body(),
            &hold_body,
            &JointDesc::Revolute {
                anchor_a: rig.grip_anchor(),
                anchor_b: grip - hold.position,
            },
        );
        self.state = SwingState::Anchored(joint);

        let first = std::mem::replace(&mut self.first_catch, false);
        log::debug!("caught hold at level {} (first: {})", hold.level, first);
        Some(Catch { level: hold.level, first })
    }

    /// Let go: drop the joint and kick the torso along its swing direction.
    /// Returns false when there was nothing to release.
    pub fn release(
        &mut self,
        ctx: &mut EngineContext,
        rig: &PlayerRig,
        score: u32,
        config: &ClimberConfig,
    ) -> bool {
        if !self.release_joint(ctx) {
            return false;
        }
        let boost = release_boost(score, config);
        if boost > 0.0 {
            rig.boost(ctx, swing_direction(rig.angle(ctx)) * boost);
        }
        true
    }

    /// Remove the climbing joint if there is one. No-op when released.
    pub fn release_joint(&mut self, ctx: &mut EngineContext) -> bool {
        match std::mem::replace(&mut self.state, SwingState::Released) {
            SwingState::Anchored(joint) => {
                ctx.physics.remove_joint(joint);
                true
            }
            SwingState::Released => false,
        }
    }

    /// Keep an anchored rig spinning at the score-dependent rate.
    pub fn drive(&self, ctx: &mut EngineContext, rig: &PlayerRig, score: u32, config: &ClimberConfig) {
        if self.is_anchored() {
            rig.set_angular_velocity(ctx, swing_rate(score, config));
        }
    }

    /// The next catch is the first of a new run again.
    pub fn rearm(&mut self) {
        self.first_catch = true;
    }
}

impl Default for SwingController {
    fn default() -> Self {
        Self::new()
    }
}
