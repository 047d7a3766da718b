//! Game state and core simulation types
//!
//! `GameState` is the single simulation context: every entity, the active
//! effects, the scheduled-event queue and the RNG live here and are only
//! mutated by `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bonus::BonusManager;
use super::effects::ActiveEffects;
use super::schedule::Scheduler;
use crate::clamp_circle;
use crate::config::GameConfig;
use crate::error::ConfigError;

/// Which half of the rink a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Human, left half
    Player,
    /// Scripted opponent, right half
    Ai,
}

impl Side {
    /// Winner label shown by the UI
    pub fn label(&self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Ai => "AI",
        }
    }

    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    /// Unit vector pointing from this side's goal toward the opponent
    pub fn forward(&self) -> Vec2 {
        match self {
            Side::Player => Vec2::X,
            Side::Ai => Vec2::NEG_X,
        }
    }
}

/// Short wall of the rink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalEnd {
    Left,
    Right,
}

impl GoalEnd {
    /// The side that scores when the puck enters this goal
    pub fn scorer(&self) -> Side {
        match self {
            GoalEnd::Left => Side::Ai,
            GoalEnd::Right => Side::Player,
        }
    }
}

/// A circular paddle confined to its half of the rink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub pos: Vec2,
    /// Position at the start of the previous collision pass
    pub prev_pos: Vec2,
    /// Frame-to-frame displacement, imparted to the puck on impact
    pub vel: Vec2,
    /// Radius with no size effect applied
    pub base_radius: f32,
    pub radius: f32,
    /// Units per tick. Only the AI paddle's movement is bounded by it.
    pub speed: f32,
}

impl Paddle {
    pub fn new(side: Side, config: &GameConfig) -> Self {
        let pos = config.paddle_start(side);
        Self {
            side,
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            base_radius: config.paddle_radius,
            radius: config.paddle_radius,
            speed: match side {
                Side::Player => config.player_paddle_speed,
                Side::Ai => config.ai_paddle_speed,
            },
        }
    }

    /// Jump to `target`, then clamp into the legal half-rink
    pub fn move_to(&mut self, target: Vec2, config: &GameConfig) {
        if target.is_finite() {
            self.pos = target;
        }
        self.constrain(config);
    }

    /// Keep the full circle inside this side's half and the vertical bounds
    pub fn constrain(&mut self, config: &GameConfig) {
        let (min, max) = config.half_rink(self.side);
        self.pos = clamp_circle(self.pos, self.radius, min, max);
    }

    /// Resize and re-clamp (a bigger paddle may no longer fit where it was)
    pub fn set_radius(&mut self, radius: f32, config: &GameConfig) {
        self.radius = radius;
        self.constrain(config);
    }

    /// Latch velocity from the displacement since the last call
    pub fn record_velocity(&mut self) {
        self.vel = self.pos - self.prev_pos;
        self.prev_pos = self.pos;
    }
}

/// The puck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puck {
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Launch and paddle-rebound speed before effect multipliers
    pub speed: f32,
    pub friction: f32,
}

impl Puck {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: config.center(),
            vel: Vec2::ZERO,
            radius: config.puck_radius,
            speed: config.puck_speed,
            friction: config.friction,
        }
    }

    /// Integrate one tick: move, then decay velocity
    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.vel *= self.friction;
    }

    /// Re-center and launch within ±45° of horizontal, toward a random side
    pub fn reset(&mut self, center: Vec2, rng: &mut impl Rng) {
        self.pos = center;
        let angle = rng.random_range(-45.0_f32..45.0).to_radians();
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(angle.cos() * direction, angle.sin()) * self.speed;
    }
}

/// Bonus pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BonusKind {
    EnlargePlayerPaddle,
    ShrinkAiPaddle,
    SpeedUpPlayerPuck,
    SlowDownAiPuck,
    SlowDownAi,
    #[serde(rename = "freezeAI")]
    FreezeAi,
}

impl BonusKind {
    pub const ALL: [BonusKind; 6] = [
        BonusKind::EnlargePlayerPaddle,
        BonusKind::ShrinkAiPaddle,
        BonusKind::SpeedUpPlayerPuck,
        BonusKind::SlowDownAiPuck,
        BonusKind::SlowDownAi,
        BonusKind::FreezeAi,
    ];

    /// Stable slot index, matches `ALL`
    pub fn index(&self) -> usize {
        match self {
            BonusKind::EnlargePlayerPaddle => 0,
            BonusKind::ShrinkAiPaddle => 1,
            BonusKind::SpeedUpPlayerPuck => 2,
            BonusKind::SlowDownAiPuck => 3,
            BonusKind::SlowDownAi => 4,
            BonusKind::FreezeAi => 5,
        }
    }

    /// Glow/fallback color
    pub fn color(&self) -> &'static str {
        match self {
            BonusKind::EnlargePlayerPaddle => "#2ecc71",
            BonusKind::ShrinkAiPaddle => "#9b59b6",
            BonusKind::SpeedUpPlayerPuck => "#f39c12",
            BonusKind::SlowDownAiPuck => "#1abc9c",
            BonusKind::SlowDownAi => "#34495e",
            BonusKind::FreezeAi => "#aed6f1",
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A live bonus pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonus {
    pub id: u32,
    pub kind: BonusKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Simulation time it appeared at
    pub spawned_ms: f64,
}

impl Bonus {
    pub fn remaining_ms(&self, now_ms: f64, lifetime_ms: f64) -> f64 {
        lifetime_ms - (now_ms - self.spawned_ms)
    }

    pub fn is_expired(&self, now_ms: f64, lifetime_ms: f64) -> bool {
        now_ms - self.spawned_ms > lifetime_ms
    }

    /// In the final blink window before expiry
    pub fn should_blink(&self, now_ms: f64, lifetime_ms: f64, blink_ms: f64) -> bool {
        self.remaining_ms(now_ms, lifetime_ms) < blink_ms
    }

    /// Peak opacity while blinking, fading from 1.0 toward 0.6
    pub fn blink_alpha(&self, now_ms: f64, lifetime_ms: f64, blink_ms: f64) -> f32 {
        let remaining = self.remaining_ms(now_ms, lifetime_ms).max(0.0);
        (0.6 + remaining / blink_ms * 0.4) as f32
    }

    /// Blink period; shrinks from 350 ms toward 150 ms as expiry nears
    pub fn blink_rate_ms(&self, now_ms: f64, lifetime_ms: f64, blink_ms: f64) -> f64 {
        let remaining = self.remaining_ms(now_ms, lifetime_ms).max(0.0);
        150.0 + remaining / blink_ms * 200.0
    }
}

/// Expanding ring left behind when a bonus is collected (cosmetic)
#[derive(Debug, Clone, Serialize)]
pub struct CollectionEffect {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub color: &'static str,
}

impl CollectionEffect {
    pub fn new(bonus: &Bonus) -> Self {
        Self {
            pos: bonus.pos,
            radius: bonus.radius,
            alpha: 0.8,
            color: bonus.kind.color(),
        }
    }

    /// Grow and fade; returns false once fully transparent
    pub fn update(&mut self) -> bool {
        self.alpha -= 0.05;
        self.radius += 1.0;
        self.alpha > 0.0
    }
}

/// Half-rink flash after a goal (cosmetic)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalFlash {
    pub alpha: f32,
    pub end: Option<GoalEnd>,
}

impl GoalFlash {
    pub fn trigger(&mut self, end: GoalEnd) {
        self.alpha = 1.0;
        self.end = Some(end);
    }

    pub fn decay(&mut self) {
        if self.alpha > 0.0 {
            self.alpha = (self.alpha - 0.02).max(0.0);
        }
    }
}

/// Match score and terminal state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub ai: u32,
    pub game_over: bool,
    pub winner: Option<Side>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a goal for `side`; ignored once the match is over
    pub fn record_goal(&mut self, side: Side) -> bool {
        if self.game_over {
            return false;
        }
        match side {
            Side::Player => self.player += 1,
            Side::Ai => self.ai += 1,
        }
        true
    }

    /// Latch game over the first time either side reaches `max_score`.
    /// Returns the winner only on that first call.
    pub fn check_winner(&mut self, max_score: u32) -> Option<Side> {
        if self.game_over {
            return None;
        }
        let winner = if self.player >= max_score {
            Side::Player
        } else if self.ai >= max_score {
            Side::Ai
        } else {
            return None;
        };
        self.game_over = true;
        self.winner = Some(winner);
        Some(winner)
    }

    pub fn winner_label(&self) -> &'static str {
        self.winner.map(|w| w.label()).unwrap_or("")
    }
}

/// Discrete things that happened during a tick, for audio/visual cues
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    WallHit,
    PaddleHit { side: Side },
    Goal { scorer: Side, end: GoalEnd },
    BonusSpawned { kind: BonusKind, pos: Vec2 },
    BonusExpired { kind: BonusKind },
    BonusCollected { kind: BonusKind, pos: Vec2, color: &'static str },
    EffectExpired { kind: BonusKind },
    GameOver { winner: Side },
    /// Non-finite state was detected and replaced
    StateRecovered,
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation clock (milliseconds)
    pub time_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Paddle,
    pub ai: Paddle,
    pub puck: Puck,
    pub bonuses: BonusManager,
    pub effects: ActiveEffects,
    pub scheduler: Scheduler,
    pub score: Score,
    pub goal_flash: GoalFlash,
    /// Events raised outside `tick` (start of match), delivered by the next tick
    pub(crate) pending_events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new match with the given config and seed.
    ///
    /// `config` must pass `GameConfig::validate`; use `try_new` for configs
    /// that haven't been checked.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        debug_assert!(config.validate().is_ok(), "GameState::new with invalid config");
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ms: 0.0,
            time_ticks: 0,
            player: Paddle::new(Side::Player, &config),
            ai: Paddle::new(Side::Ai, &config),
            puck: Puck::new(&config),
            bonuses: BonusManager::new(),
            effects: ActiveEffects::default(),
            scheduler: Scheduler::new(),
            score: Score::new(),
            goal_flash: GoalFlash::default(),
            pending_events: Vec::new(),
            config,
        };
        let events = state.restart();
        state.pending_events = events;
        state
    }

    /// Validate `config`, then start a match
    pub fn try_new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, seed))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(GameConfig::default(), seed)
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }

    /// Re-center the puck with a fresh random launch
    pub fn reset_puck(&mut self) {
        let center = self.config.center();
        self.puck.reset(center, &mut self.rng);
    }
}
