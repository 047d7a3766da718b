//! Runtime game configuration
//!
//! Defaults come from `crate::consts`. A JSON document may override any
//! subset of the fields; missing fields keep their defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Side;

/// Fixed set of named numeric constants supplied at initialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Rink ===
    pub rink_width: f32,
    pub rink_height: f32,
    pub goal_width: f32,
    /// Only used when drawing
    pub goal_depth: f32,

    // === Entities ===
    pub paddle_radius: f32,
    pub puck_radius: f32,
    pub bonus_radius: f32,
    pub paddle_start_inset: f32,

    // === Motion (units per tick) ===
    /// Nominal player speed; the player paddle follows the pointer directly
    pub player_paddle_speed: f32,
    pub ai_paddle_speed: f32,
    pub puck_speed: f32,
    pub friction: f32,

    // === Match ===
    pub max_score: u32,

    // === Bonuses (milliseconds) ===
    pub bonus_lifetime_ms: f64,
    pub bonus_blink_ms: f64,
    pub effect_duration_ms: f64,
    pub ai_freeze_duration_ms: f64,
    pub bonus_respawn_delay_ms: f64,
    pub bonus_spawn_min_ms: f64,
    pub bonus_spawn_max_ms: f64,
    pub bonus_retry_ms: f64,
    pub max_bonuses: usize,

    /// Clock advance used by hosts that don't measure frame time
    pub frame_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rink_width: RINK_WIDTH,
            rink_height: RINK_HEIGHT,
            goal_width: GOAL_WIDTH,
            goal_depth: GOAL_DEPTH,

            paddle_radius: PADDLE_RADIUS,
            puck_radius: PUCK_RADIUS,
            bonus_radius: BONUS_RADIUS,
            paddle_start_inset: PADDLE_START_INSET,

            player_paddle_speed: PLAYER_PADDLE_SPEED,
            ai_paddle_speed: AI_PADDLE_SPEED,
            puck_speed: PUCK_SPEED,
            friction: FRICTION,

            max_score: MAX_SCORE,

            bonus_lifetime_ms: BONUS_LIFETIME_MS,
            bonus_blink_ms: BONUS_BLINK_MS,
            effect_duration_ms: EFFECT_DURATION_MS,
            ai_freeze_duration_ms: AI_FREEZE_DURATION_MS,
            bonus_respawn_delay_ms: BONUS_RESPAWN_DELAY_MS,
            bonus_spawn_min_ms: BONUS_SPAWN_MIN_MS,
            bonus_spawn_max_ms: BONUS_SPAWN_MAX_MS,
            bonus_retry_ms: BONUS_RETRY_MS,
            max_bonuses: MAX_BONUSES,

            frame_ms: FRAME_MS,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON document and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("rink_width", self.rink_width),
            ("rink_height", self.rink_height),
            ("goal_width", self.goal_width),
            ("paddle_radius", self.paddle_radius),
            ("puck_radius", self.puck_radius),
            ("bonus_radius", self.bonus_radius),
            ("player_paddle_speed", self.player_paddle_speed),
            ("ai_paddle_speed", self.ai_paddle_speed),
            ("puck_speed", self.puck_speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be positive, got {value}")));
            }
        }

        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(ConfigError::invalid(
                "friction",
                format!("must be in (0, 1], got {}", self.friction),
            ));
        }
        if self.goal_width >= self.rink_height {
            return Err(ConfigError::invalid(
                "goal_width",
                "goal mouth must be narrower than the rink height",
            ));
        }
        if self.paddle_radius * 2.0 >= self.rink_width / 2.0 {
            return Err(ConfigError::invalid(
                "paddle_radius",
                "paddle must fit inside its half of the rink",
            ));
        }
        if self.max_score == 0 {
            return Err(ConfigError::invalid("max_score", "must be at least 1"));
        }
        if self.max_bonuses == 0 {
            return Err(ConfigError::invalid("max_bonuses", "must be at least 1"));
        }

        let durations = [
            ("bonus_lifetime_ms", self.bonus_lifetime_ms),
            ("bonus_blink_ms", self.bonus_blink_ms),
            ("effect_duration_ms", self.effect_duration_ms),
            ("ai_freeze_duration_ms", self.ai_freeze_duration_ms),
            ("bonus_respawn_delay_ms", self.bonus_respawn_delay_ms),
            ("bonus_spawn_min_ms", self.bonus_spawn_min_ms),
            ("bonus_retry_ms", self.bonus_retry_ms),
            ("frame_ms", self.frame_ms),
        ];
        for (field, value) in durations {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be positive, got {value}")));
            }
        }
        if self.bonus_spawn_max_ms <= self.bonus_spawn_min_ms {
            return Err(ConfigError::invalid(
                "bonus_spawn_max_ms",
                "spawn interval must be a non-empty range",
            ));
        }

        Ok(())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.rink_width / 2.0, self.rink_height / 2.0)
    }

    /// Vertical span `(top, bottom)` of the goal mouth
    pub fn goal_mouth(&self) -> (f32, f32) {
        let mid = self.rink_height / 2.0;
        (mid - self.goal_width / 2.0, mid + self.goal_width / 2.0)
    }

    /// Rectangle `(min, max)` a paddle of this side lives in
    pub fn half_rink(&self, side: Side) -> (Vec2, Vec2) {
        let mid_x = self.rink_width / 2.0;
        match side {
            Side::Player => (Vec2::ZERO, Vec2::new(mid_x, self.rink_height)),
            Side::Ai => (Vec2::new(mid_x, 0.0), Vec2::new(self.rink_width, self.rink_height)),
        }
    }

    /// Where a paddle of this side starts a match
    pub fn paddle_start(&self, side: Side) -> Vec2 {
        let y = self.rink_height / 2.0;
        match side {
            Side::Player => Vec2::new(self.paddle_start_inset, y),
            Side::Ai => Vec2::new(self.rink_width - self.paddle_start_inset, y),
        }
    }
}
