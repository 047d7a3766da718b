//! Timed bonus effects
//!
//! Each bonus kind owns one multiplier (or the AI freeze flag) and exactly
//! one timer slot. Re-applying a kind cancels its pending revert and starts
//! the full duration again; effects never stack.

use serde::Serialize;

use super::schedule::{ScheduledAction, TimerId};
use super::state::{BonusKind, GameEvent, GameState, Side};

/// Named scalar multipliers (1.0 = neutral) plus the AI freeze flag
#[derive(Debug, Clone, Serialize)]
pub struct ActiveEffects {
    pub player_paddle_size: f32,
    pub ai_paddle_size: f32,
    pub player_puck_speed: f32,
    pub ai_puck_speed: f32,
    pub ai_slowdown: f32,
    pub ai_frozen: bool,
    /// Pending revert per kind, indexed by `BonusKind::index`
    #[serde(skip)]
    timers: [Option<TimerId>; 6],
}

impl Default for ActiveEffects {
    fn default() -> Self {
        Self {
            player_paddle_size: 1.0,
            ai_paddle_size: 1.0,
            player_puck_speed: 1.0,
            ai_puck_speed: 1.0,
            ai_slowdown: 1.0,
            ai_frozen: false,
            timers: [None; 6],
        }
    }
}

impl ActiveEffects {
    /// Puck speed multiplier applied when `side`'s paddle strikes it
    pub fn puck_speed_for(&self, side: Side) -> f32 {
        match side {
            Side::Player => self.player_puck_speed,
            Side::Ai => self.ai_puck_speed,
        }
    }

    pub fn timer(&self, kind: BonusKind) -> Option<TimerId> {
        self.timers[kind.index()]
    }

    pub fn is_active(&self, kind: BonusKind) -> bool {
        match kind {
            BonusKind::EnlargePlayerPaddle => self.player_paddle_size != 1.0,
            BonusKind::ShrinkAiPaddle => self.ai_paddle_size != 1.0,
            BonusKind::SpeedUpPlayerPuck => self.player_puck_speed != 1.0,
            BonusKind::SlowDownAiPuck => self.ai_puck_speed != 1.0,
            BonusKind::SlowDownAi => self.ai_slowdown != 1.0,
            BonusKind::FreezeAi => self.ai_frozen,
        }
    }

    /// HUD labels for every non-neutral effect
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.ai_frozen {
            labels.push("AI Frozen");
        }
        let directional = [
            (self.player_paddle_size, "Paddle Enlarged", "Paddle Shrunk"),
            (self.ai_paddle_size, "AI Paddle Enlarged", "AI Paddle Shrunk"),
            (self.player_puck_speed, "Player Hit Speed Up", "Player Hit Speed Down"),
            (self.ai_puck_speed, "AI Hit Speed Sped Up", "AI Hit Speed Slowed"),
            (self.ai_slowdown, "AI Movement Sped Up", "AI Movement Slowed"),
        ];
        for (value, up, down) in directional {
            if value > 1.0 {
                labels.push(up);
            } else if value < 1.0 {
                labels.push(down);
            }
        }
        labels
    }
}

impl BonusKind {
    /// How long the effect lasts once applied
    pub fn duration_ms(&self, config: &crate::GameConfig) -> f64 {
        match self {
            BonusKind::FreezeAi => config.ai_freeze_duration_ms,
            _ => config.effect_duration_ms,
        }
    }
}

impl GameState {
    /// Apply a collected bonus and (re)arm its revert timer
    pub fn apply_bonus_effect(&mut self, kind: BonusKind) {
        let slot = kind.index();
        if let Some(id) = self.effects.timers[slot].take() {
            self.scheduler.cancel(id);
        }

        // Snap both radii back to their tracked multiplier so re-applying a
        // size bonus replaces rather than compounds
        let config = &self.config;
        let effects = &mut self.effects;
        self.player
            .set_radius(self.player.base_radius * effects.player_paddle_size, config);
        self.ai
            .set_radius(self.ai.base_radius * effects.ai_paddle_size, config);

        match kind {
            BonusKind::EnlargePlayerPaddle => {
                effects.player_paddle_size = 1.5;
                self.player
                    .set_radius(self.player.base_radius * effects.player_paddle_size, config);
            }
            BonusKind::ShrinkAiPaddle => {
                effects.ai_paddle_size = 0.5;
                self.ai
                    .set_radius(self.ai.base_radius * effects.ai_paddle_size, config);
            }
            BonusKind::SpeedUpPlayerPuck => effects.player_puck_speed = 1.5,
            BonusKind::SlowDownAiPuck => effects.ai_puck_speed = 0.7,
            BonusKind::SlowDownAi => effects.ai_slowdown = 0.5,
            BonusKind::FreezeAi => effects.ai_frozen = true,
        }

        let due = self.time_ms + kind.duration_ms(config);
        effects.timers[slot] = Some(
            self.scheduler
                .schedule(due, ScheduledAction::RevertEffect(kind)),
        );
        log::debug!("Applied {:?} until t={:.0}ms", kind, due);
    }

    /// Return one effect to neutral (its timer fired)
    pub(crate) fn revert_effect(&mut self, kind: BonusKind, events: &mut Vec<GameEvent>) {
        self.effects.timers[kind.index()] = None;
        match kind {
            BonusKind::EnlargePlayerPaddle => {
                self.effects.player_paddle_size = 1.0;
                let base = self.player.base_radius;
                self.player.set_radius(base, &self.config);
            }
            BonusKind::ShrinkAiPaddle => {
                self.effects.ai_paddle_size = 1.0;
                let base = self.ai.base_radius;
                self.ai.set_radius(base, &self.config);
            }
            BonusKind::SpeedUpPlayerPuck => self.effects.player_puck_speed = 1.0,
            BonusKind::SlowDownAiPuck => self.effects.ai_puck_speed = 1.0,
            BonusKind::SlowDownAi => self.effects.ai_slowdown = 1.0,
            BonusKind::FreezeAi => self.effects.ai_frozen = false,
        }
        log::debug!("{:?} expired at t={:.0}ms", kind, self.time_ms);
        events.push(GameEvent::EffectExpired { kind });
    }

    /// Cancel every effect timer and restore all neutral values and radii
    pub fn clear_all_effects(&mut self) {
        for id in self.effects.timers.iter_mut().filter_map(Option::take) {
            self.scheduler.cancel(id);
        }
        self.effects = ActiveEffects::default();
        let (player_base, ai_base) = (self.player.base_radius, self.ai.base_radius);
        self.player.set_radius(player_base, &self.config);
        self.ai.set_radius(ai_base, &self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PADDLE_RADIUS;

    fn fire_due(state: &mut GameState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Some(action) = state.scheduler.pop_due(state.time_ms) {
            if let ScheduledAction::RevertEffect(kind) = action {
                state.revert_effect(kind, &mut events);
            }
        }
        events
    }

    #[test]
    fn test_enlarge_twice_is_idempotent() {
        let mut state = GameState::with_seed(1);
        state.apply_bonus_effect(BonusKind::EnlargePlayerPaddle);
        state.time_ms += 1000.0;
        state.apply_bonus_effect(BonusKind::EnlargePlayerPaddle);

        assert_eq!(state.player.radius, PADDLE_RADIUS * 1.5);
        assert_eq!(
            state
                .scheduler
                .count(ScheduledAction::RevertEffect(BonusKind::EnlargePlayerPaddle)),
            1
        );

        // First application's deadline passes: still enlarged
        state.time_ms = 5000.0;
        fire_due(&mut state);
        assert_eq!(state.player.radius, PADDLE_RADIUS * 1.5);

        // Second application's deadline
        state.time_ms = 6000.0;
        let events = fire_due(&mut state);
        assert_eq!(state.player.radius, PADDLE_RADIUS);
        assert_eq!(state.effects.player_paddle_size, 1.0);
        assert_eq!(
            events,
            vec![GameEvent::EffectExpired {
                kind: BonusKind::EnlargePlayerPaddle
            }]
        );
    }

    #[test]
    fn test_shrink_ai_paddle() {
        let mut state = GameState::with_seed(1);
        state.apply_bonus_effect(BonusKind::ShrinkAiPaddle);
        state.apply_bonus_effect(BonusKind::ShrinkAiPaddle);
        assert_eq!(state.ai.radius, PADDLE_RADIUS * 0.5);
        state.time_ms = 5000.0;
        fire_due(&mut state);
        assert_eq!(state.ai.radius, PADDLE_RADIUS);
    }

    #[test]
    fn test_different_kinds_timed_independently() {
        let mut state = GameState::with_seed(1);
        state.apply_bonus_effect(BonusKind::SlowDownAi);
        state.time_ms = 2000.0;
        state.apply_bonus_effect(BonusKind::SpeedUpPlayerPuck);

        assert_eq!(state.effects.ai_slowdown, 0.5);
        assert_eq!(state.effects.player_puck_speed, 1.5);

        state.time_ms = 5000.0;
        fire_due(&mut state);
        assert_eq!(state.effects.ai_slowdown, 1.0);
        assert_eq!(state.effects.player_puck_speed, 1.5);

        state.time_ms = 7000.0;
        fire_due(&mut state);
        assert_eq!(state.effects.player_puck_speed, 1.0);
    }

    #[test]
    fn test_freeze_uses_shorter_duration() {
        let mut state = GameState::with_seed(1);
        state.apply_bonus_effect(BonusKind::FreezeAi);
        assert!(state.effects.ai_frozen);
        state.time_ms = 2999.0;
        fire_due(&mut state);
        assert!(state.effects.ai_frozen);
        state.time_ms = 3000.0;
        fire_due(&mut state);
        assert!(!state.effects.ai_frozen);
    }

    #[test]
    fn test_puck_speed_multipliers_by_side() {
        let mut state = GameState::with_seed(1);
        state.apply_bonus_effect(BonusKind::SlowDownAiPuck);
        assert_eq!(state.effects.puck_speed_for(Side::Ai), 0.7);
        assert_eq!(state.effects.puck_speed_for(Side::Player), 1.0);
    }

    #[test]
    fn test_clear_all_effects_cancels_timers() {
        let mut state = GameState::with_seed(1);
        for kind in BonusKind::ALL {
            state.apply_bonus_effect(kind);
        }
        assert!(BonusKind::ALL.iter().all(|k| state.effects.is_active(*k)));

        state.clear_all_effects();
        assert!(BonusKind::ALL.iter().all(|k| !state.effects.is_active(*k)));
        assert!(BonusKind::ALL.iter().all(|k| state.effects.timer(*k).is_none()));
        assert_eq!(state.player.radius, PADDLE_RADIUS);
        assert_eq!(state.ai.radius, PADDLE_RADIUS);

        // Nothing left to revert
        state.time_ms = 60_000.0;
        assert!(fire_due(&mut state).is_empty());
    }

    #[test]
    fn test_labels() {
        let mut state = GameState::with_seed(1);
        assert!(state.effects.labels().is_empty());
        state.apply_bonus_effect(BonusKind::FreezeAi);
        state.apply_bonus_effect(BonusKind::ShrinkAiPaddle);
        assert_eq!(state.effects.labels(), vec!["AI Frozen", "AI Paddle Shrunk"]);
    }
}
