//! Simulation tick
//!
//! Advances one frame: the clock moves by the host-supplied `dt_ms`, physics
//! moves by one fixed step. Everything that happened is returned as events.

use glam::Vec2;
use serde::Serialize;

use super::collision::{self, GoalLine};
use super::effects::ActiveEffects;
use super::schedule::ScheduledAction;
use super::state::{
    BonusKind, CollectionEffect, GameEvent, GameState, GoalEnd, GoalFlash, Paddle, Side,
};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in rink coordinates; the player paddle jumps here
    pub pointer: Option<Vec2>,
    /// Start a fresh match (accepted at any time, including after game over)
    pub restart: bool,
}

impl TickInput {
    pub fn pointer(pos: Vec2) -> Self {
        Self {
            pointer: Some(pos),
            ..Default::default()
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) -> Vec<GameEvent> {
    let mut events = std::mem::take(&mut state.pending_events);

    if input.restart {
        events.extend(state.restart());
    }

    // Frozen after game over; only the fades keep running
    if state.score.game_over {
        update_cosmetics(state);
        return events;
    }

    if dt_ms.is_finite() && dt_ms > 0.0 {
        state.time_ms += dt_ms;
    }
    state.time_ticks += 1;

    // Timers
    while let Some(action) = state.scheduler.pop_due(state.time_ms) {
        match action {
            ScheduledAction::RevertEffect(kind) => state.revert_effect(kind, &mut events),
            ScheduledAction::SpawnBonus => state.spawn_bonus(true, &mut events),
            ScheduledAction::ReplaceBonus => state.spawn_bonus(false, &mut events),
        }
    }

    // Paddles
    if let Some(pointer) = input.pointer {
        state.player.move_to(pointer, &state.config);
    }
    state.update_ai();

    state.puck.advance();
    resolve_collisions(state, &mut events);
    collect_bonuses(state, &mut events);
    state.expire_bonuses(&mut events);
    update_cosmetics(state);

    if recover_non_finite(state) {
        events.push(GameEvent::StateRecovered);
    }

    if let Some(winner) = state.score.check_winner(state.config.max_score) {
        log::info!(
            "Game over: {} wins {}-{}",
            winner.label(),
            state.score.player,
            state.score.ai
        );
        events.push(GameEvent::GameOver { winner });
    }

    events
}

/// Walls, paddles, then goal lines
fn resolve_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.player.record_velocity();
    state.ai.record_velocity();

    let config = &state.config;
    let puck = &mut state.puck;

    if collision::bounce_vertical_walls(puck, config) {
        events.push(GameEvent::WallHit);
    }
    if collision::bounce_side_walls(puck, config) {
        events.push(GameEvent::WallHit);
    }

    for paddle in [&state.player, &state.ai] {
        let multiplier = state.effects.puck_speed_for(paddle.side);
        if collision::resolve_paddle_impact(puck, paddle, multiplier, config) {
            events.push(GameEvent::PaddleHit { side: paddle.side });
        }
    }

    for end in [GoalEnd::Right, GoalEnd::Left] {
        match collision::resolve_goal_line(&mut state.puck, end, &state.config) {
            GoalLine::Clear => {}
            GoalLine::Rebound => events.push(GameEvent::WallHit),
            GoalLine::Goal(end) => {
                score_goal(state, end, events);
                return;
            }
        }
    }
}

fn score_goal(state: &mut GameState, end: GoalEnd, events: &mut Vec<GameEvent>) {
    let scorer = end.scorer();
    if state.score.record_goal(scorer) {
        log::info!(
            "Goal for {} ({}-{})",
            scorer.label(),
            state.score.player,
            state.score.ai
        );
        events.push(GameEvent::Goal { scorer, end });
    }
    state.goal_flash.trigger(end);
    state.reset_puck();
}

/// Every bonus the puck touches this tick is collected, newest first
fn collect_bonuses(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for index in collision::touching_bonuses(&state.puck, &state.bonuses.bonuses) {
        let Some(bonus) = state.bonuses.remove(index) else {
            continue;
        };
        state.apply_bonus_effect(bonus.kind);
        state.bonuses.add_collection_effect(&bonus);
        let due = state.time_ms + state.config.bonus_respawn_delay_ms;
        state.scheduler.schedule(due, ScheduledAction::ReplaceBonus);
        log::debug!("Collected {:?} bonus #{}", bonus.kind, bonus.id);
        events.push(GameEvent::BonusCollected {
            kind: bonus.kind,
            pos: bonus.pos,
            color: bonus.kind.color(),
        });
    }
}

fn update_cosmetics(state: &mut GameState) {
    state.bonuses.update_collection_effects();
    state.goal_flash.decay();
}

/// Replace any NaN/infinite puck or paddle state. Returns true if anything
/// had to be fixed.
fn recover_non_finite(state: &mut GameState) -> bool {
    let mut recovered = false;

    if !state.puck.pos.is_finite() || !state.puck.vel.is_finite() {
        log::warn!(
            "Non-finite puck state (pos {:?}, vel {:?}); re-centering",
            state.puck.pos,
            state.puck.vel
        );
        state.reset_puck();
        recovered = true;
    }

    for side in [Side::Player, Side::Ai] {
        let start = state.config.paddle_start(side);
        let paddle = state.paddle_mut(side);
        if !paddle.pos.is_finite() || !paddle.vel.is_finite() {
            log::warn!("Non-finite {} paddle state; restoring start", side.label());
            paddle.pos = start;
            paddle.prev_pos = start;
            paddle.vel = Vec2::ZERO;
            recovered = true;
        }
    }

    recovered
}

impl GameState {
    /// Start a new match: scores, effects, timers, bonuses and entities are
    /// all reset and the periodic spawn chain starts over.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        self.score = Default::default();
        self.clear_all_effects();
        self.scheduler.clear();
        self.bonuses.clear();
        self.goal_flash = GoalFlash::default();

        self.player = Paddle::new(Side::Player, &self.config);
        self.ai = Paddle::new(Side::Ai, &self.config);
        self.reset_puck();

        self.spawn_bonus(true, &mut events);
        log::info!("Match started (seed {}, first to {})", self.seed, self.config.max_score);
        events
    }

    /// Read-only view for rendering, HUD and logging
    pub fn snapshot(&self) -> Snapshot {
        let lifetime = self.config.bonus_lifetime_ms;
        let blink = self.config.bonus_blink_ms;
        Snapshot {
            time_ms: self.time_ms,
            time_ticks: self.time_ticks,
            player_score: self.score.player,
            ai_score: self.score.ai,
            game_over: self.score.game_over,
            winner: self.score.winner,
            player: PaddleView::from(&self.player),
            ai: PaddleView::from(&self.ai),
            puck: PuckView {
                pos: self.puck.pos,
                vel: self.puck.vel,
                radius: self.puck.radius,
            },
            bonuses: self
                .bonuses
                .bonuses
                .iter()
                .map(|b| BonusView {
                    kind: b.kind,
                    pos: b.pos,
                    radius: b.radius,
                    color: b.kind.color(),
                    remaining_ms: b.remaining_ms(self.time_ms, lifetime).max(0.0),
                    blinking: b.should_blink(self.time_ms, lifetime, blink),
                    blink_alpha: b.blink_alpha(self.time_ms, lifetime, blink),
                    blink_rate_ms: b.blink_rate_ms(self.time_ms, lifetime, blink),
                })
                .collect(),
            collection_effects: self.bonuses.collection_effects.clone(),
            effects: self.effects.clone(),
            effect_labels: self.effects.labels(),
            goal_flash: self.goal_flash.clone(),
        }
    }
}

/// Serializable copy of everything a front end draws
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub time_ms: f64,
    pub time_ticks: u64,
    pub player_score: u32,
    pub ai_score: u32,
    pub game_over: bool,
    pub winner: Option<Side>,
    pub player: PaddleView,
    pub ai: PaddleView,
    pub puck: PuckView,
    pub bonuses: Vec<BonusView>,
    pub collection_effects: Vec<CollectionEffect>,
    pub effects: ActiveEffects,
    pub effect_labels: Vec<&'static str>,
    pub goal_flash: GoalFlash,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaddleView {
    pub pos: Vec2,
    pub radius: f32,
}

impl From<&Paddle> for PaddleView {
    fn from(paddle: &Paddle) -> Self {
        Self {
            pos: paddle.pos,
            radius: paddle.radius,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PuckView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BonusView {
    pub kind: BonusKind,
    pub pos: Vec2,
    pub radius: f32,
    pub color: &'static str,
    pub remaining_ms: f64,
    pub blinking: bool,
    pub blink_alpha: f32,
    pub blink_rate_ms: f64,
}
