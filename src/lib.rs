//! Rink Hockey - air hockey against a scripted opponent
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, AI, timed bonuses)
//! - `config`: Runtime tuning, defaults from `consts`, optional JSON overrides
//! - `error`: Configuration errors

pub mod config;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use error::ConfigError;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration (60 Hz host loop)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Rink dimensions
    pub const RINK_WIDTH: f32 = 800.0;
    pub const RINK_HEIGHT: f32 = 500.0;
    /// Scoring gap in each short wall, centered vertically
    pub const GOAL_WIDTH: f32 = 120.0;
    /// Drawn depth of the goal (cosmetic)
    pub const GOAL_DEPTH: f32 = 10.0;

    /// Entity radii
    pub const PADDLE_RADIUS: f32 = 30.0;
    pub const PUCK_RADIUS: f32 = 15.0;
    pub const BONUS_RADIUS: f32 = 20.0;

    /// Speeds (units per tick)
    pub const PLAYER_PADDLE_SPEED: f32 = 8.0;
    pub const AI_PADDLE_SPEED: f32 = 5.0;
    pub const PUCK_SPEED: f32 = 5.0;
    /// Per-tick velocity decay
    pub const FRICTION: f32 = 0.98;

    /// Paddle spawn inset from the short walls
    pub const PADDLE_START_INSET: f32 = 50.0;

    pub const MAX_SCORE: u32 = 10;

    /// Bonus timing (milliseconds)
    pub const BONUS_LIFETIME_MS: f64 = 10_000.0;
    pub const BONUS_BLINK_MS: f64 = 1256.0;
    pub const EFFECT_DURATION_MS: f64 = 5000.0;
    pub const AI_FREEZE_DURATION_MS: f64 = 3000.0;
    pub const BONUS_RESPAWN_DELAY_MS: f64 = 3000.0;
    pub const BONUS_SPAWN_MIN_MS: f64 = 4000.0;
    pub const BONUS_SPAWN_MAX_MS: f64 = 12_000.0;
    pub const BONUS_RETRY_MS: f64 = 5000.0;
    pub const MAX_BONUSES: usize = 3;

    /// Denominator guard for geometric divisions
    pub const EPSILON: f32 = 1e-4;
}

/// Clamp a point so a circle of `radius` stays inside `[min, max]` on both axes
#[inline]
pub fn clamp_circle(pos: Vec2, radius: f32, min: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(
        clamp_span(pos.x, min.x + radius, max.x - radius),
        clamp_span(pos.y, min.y + radius, max.y - radius),
    )
}

/// Like `f32::clamp`, but tolerates `lo > hi` (an oversized circle) by pinning to the midpoint
#[inline]
pub fn clamp_span(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        value.clamp(lo, hi)
    }
}

/// Normalize `v`, falling back to `fallback` when its length is below `EPSILON`
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len < consts::EPSILON || !len.is_finite() {
        fallback
    } else {
        v / len
    }
}
