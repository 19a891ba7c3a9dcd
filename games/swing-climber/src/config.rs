//! Tuning constants for the climber, overridable from JSON.

use serde::Deserialize;
use thiserror::Error;

use swing_engine::GameConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Every gameplay constant in one place.
///
/// Lengths are world units (pixels at zoom 1), times are seconds,
/// rates are radians per second. Y points down.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClimberConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,

    /// Horizontal distance between the two holds of a row.
    pub play_width: f32,
    /// Vertical distance between rows.
    pub row_distance: i32,
    pub hold_radius: f32,
    pub hold_stroke_width: f32,

    /// Torso length; the hand sits at the top end.
    pub body_length: f32,
    pub body_width: f32,
    pub hand_radius: f32,
    pub torso_mass: f32,
    pub hand_mass: f32,
    /// Rig spawn point. `None` = straight below the left hold of row 0.
    pub spawn: Option<[f32; 2]>,

    /// Downward gravity.
    pub gravity: f32,

    pub swing_base_rate: f32,
    pub swing_rate_per_point: f32,
    pub swing_max_rate: f32,
    /// Velocity added along the swing direction on release, at score 0.
    pub release_boost_max: f32,
    /// Score at which the release boost has faded to nothing.
    pub release_boost_falloff_score: f32,

    /// How far below the view the torso may drop before the run ends.
    pub fall_epsilon: f32,
    /// Inset of the follow rectangle.
    pub view_inset: f32,
    pub follow_pan_secs: f32,
    pub catch_pan_secs: f32,
    /// Catch re-center puts the torso this fraction of the viewport height below center.
    pub catch_offset_fraction: f32,
    /// Start framing: camera center at `-start_offset_fraction * viewport_height`.
    pub start_offset_fraction: f32,
    /// Initial field reaches up to `-initial_fill_fraction * viewport_height`.
    pub initial_fill_fraction: f32,

    pub zoom_normal: f32,
    pub zoom_far: f32,
    pub zoom_secs: f32,
    pub zoom_out_on_release: bool,

    /// One full sweep of the hold outline hue.
    pub hue_cycle_secs: f32,
}

impl Default for ClimberConfig {
    fn default() -> Self {
        Self {
            viewport_width: 400.0,
            viewport_height: 800.0,

            play_width: 280.0,
            row_distance: 250,
            hold_radius: 7.0,
            hold_stroke_width: 4.0,

            body_length: 100.0,
            body_width: 15.0,
            hand_radius: 35.0,
            torso_mass: 15.0,
            hand_mass: 0.01,
            spawn: None,

            gravity: 800.0,

            swing_base_rate: 7.8,
            swing_rate_per_point: 0.14,
            swing_max_rate: 12.0,
            release_boost_max: 167.0,
            release_boost_falloff_score: 30.0,

            fall_epsilon: 2.0,
            view_inset: 10.0,
            follow_pan_secs: 0.05,
            catch_pan_secs: 0.3,
            catch_offset_fraction: 0.2,
            start_offset_fraction: 0.2,
            initial_fill_fraction: 0.8,

            zoom_normal: 0.8,
            zoom_far: 0.5,
            zoom_secs: 0.3,
            zoom_out_on_release: false,

            hue_cycle_secs: 2.0,
        }
    }
}

impl ClimberConfig {
    /// Parse overrides; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason: format!("{} is not > 0", value) })
            }
        }

        if self.row_distance <= 0 {
            return Err(ConfigError::Invalid {
                field: "row_distance",
                reason: format!("{} is not > 0", self.row_distance),
            });
        }
        positive("viewport_width", self.viewport_width)?;
        positive("viewport_height", self.viewport_height)?;
        positive("play_width", self.play_width)?;
        positive("body_length", self.body_length)?;
        positive("hand_radius", self.hand_radius)?;
        positive("hold_radius", self.hold_radius)?;
        positive("torso_mass", self.torso_mass)?;
        positive("hand_mass", self.hand_mass)?;
        positive("zoom_normal", self.zoom_normal)?;
        positive("zoom_far", self.zoom_far)?;
        positive("release_boost_falloff_score", self.release_boost_falloff_score)?;
        positive("hue_cycle_secs", self.hue_cycle_secs)?;
        Ok(())
    }

    /// Where the rig starts (and restarts after a fall).
    pub fn spawn_point(&self) -> glam::Vec2 {
        match self.spawn {
            Some([x, y]) => glam::Vec2::new(x, y),
            None => glam::Vec2::new(-self.play_width / 2.0, 0.0),
        }
    }

    /// Engine settings derived from the tuning.
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            gravity: glam::Vec2::new(0.0, self.gravity),
            auto_step_physics: false,
            ..GameConfig::default()
        }
    }
}
