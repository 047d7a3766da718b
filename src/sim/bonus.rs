//! Bonus pickups: spawning, lifetime, collection markers

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::schedule::ScheduledAction;
use super::state::{Bonus, BonusKind, CollectionEffect, GameEvent, GameState};
use crate::config::GameConfig;

/// Live bonuses (oldest first) and their fading collection markers
#[derive(Debug, Clone, Default, Serialize)]
pub struct BonusManager {
    pub bonuses: Vec<Bonus>,
    pub collection_effects: Vec<CollectionEffect>,
    next_id: u32,
}

impl BonusManager {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn is_full(&self, config: &GameConfig) -> bool {
        self.bonuses.len() >= config.max_bonuses
    }

    /// Spawn a random bonus somewhere in the middle band of the rink.
    /// No-op at capacity.
    pub fn try_spawn(
        &mut self,
        config: &GameConfig,
        now_ms: f64,
        rng: &mut impl Rng,
    ) -> Option<&Bonus> {
        if self.is_full(config) {
            return None;
        }

        let kind = BonusKind::random(rng);
        let margin = config.bonus_radius * 3.0;
        let band = config.rink_width * 0.1;
        let x_min = margin + band;
        let x_max = (config.rink_width - margin - band).max(x_min);
        let y_min = margin;
        let y_max = (config.rink_height - margin).max(y_min);
        let pos = Vec2::new(
            x_min + rng.random::<f32>() * (x_max - x_min),
            y_min + rng.random::<f32>() * (y_max - y_min),
        );

        let id = self.next_id;
        self.next_id += 1;
        self.bonuses.push(Bonus {
            id,
            kind,
            pos,
            radius: config.bonus_radius,
            spawned_ms: now_ms,
        });
        self.bonuses.last()
    }

    /// Remove and return every bonus past its lifetime
    pub fn remove_expired(&mut self, now_ms: f64, lifetime_ms: f64) -> Vec<Bonus> {
        let mut expired = Vec::new();
        self.bonuses.retain(|bonus| {
            if bonus.is_expired(now_ms, lifetime_ms) {
                expired.push(bonus.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn remove(&mut self, index: usize) -> Option<Bonus> {
        (index < self.bonuses.len()).then(|| self.bonuses.remove(index))
    }

    pub fn add_collection_effect(&mut self, bonus: &Bonus) {
        self.collection_effects.push(CollectionEffect::new(bonus));
    }

    /// Grow and fade markers, dropping the invisible ones
    pub fn update_collection_effects(&mut self) {
        self.collection_effects.retain_mut(|effect| effect.update());
    }

    pub fn clear(&mut self) {
        self.bonuses.clear();
        self.collection_effects.clear();
    }
}

impl GameState {
    /// One spawn attempt. The periodic chain reschedules itself: after a
    /// random interval on success, after the retry delay when full.
    pub(crate) fn spawn_bonus(&mut self, chained: bool, events: &mut Vec<GameEvent>) {
        let spawned = self
            .bonuses
            .try_spawn(&self.config, self.time_ms, &mut self.rng)
            .map(|b| (b.kind, b.pos));

        if let Some((kind, pos)) = spawned {
            log::debug!("Spawned {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
            events.push(GameEvent::BonusSpawned { kind, pos });
        }

        if chained {
            let delay = if spawned.is_some() {
                self.rng
                    .random_range(self.config.bonus_spawn_min_ms..self.config.bonus_spawn_max_ms)
            } else {
                self.config.bonus_retry_ms
            };
            self.scheduler
                .schedule(self.time_ms + delay, ScheduledAction::SpawnBonus);
        }
    }

    /// Drop bonuses that outlived their lifetime
    pub(crate) fn expire_bonuses(&mut self, events: &mut Vec<GameEvent>) {
        for bonus in self
            .bonuses
            .remove_expired(self.time_ms, self.config.bonus_lifetime_ms)
        {
            log::debug!("{:?} bonus expired uncollected", bonus.kind);
            events.push(GameEvent::BonusExpired { kind: bonus.kind });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_capacity() {
        let config = GameConfig::new();
        let mut manager = BonusManager::new();
        let mut rng = Pcg32::seed_from_u64(3);

        for _ in 0..3 {
            assert!(manager.try_spawn(&config, 0.0, &mut rng).is_some());
        }
        assert!(manager.try_spawn(&config, 0.0, &mut rng).is_none());
        assert_eq!(manager.bonuses.len(), 3);

        manager.remove(0);
        assert!(manager.try_spawn(&config, 0.0, &mut rng).is_some());
    }

    #[test]
    fn test_spawn_position_within_band() {
        let config = GameConfig::new();
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..100 {
            let mut manager = BonusManager::new();
            let bonus = manager.try_spawn(&config, 0.0, &mut rng).unwrap();
            assert!(bonus.pos.x >= 140.0 && bonus.pos.x <= 660.0);
            assert!(bonus.pos.y >= 60.0 && bonus.pos.y <= 440.0);
            assert_eq!(bonus.radius, config.bonus_radius);
        }
    }

    #[test]
    fn test_expiry_frees_capacity() {
        let config = GameConfig::new();
        let mut manager = BonusManager::new();
        let mut rng = Pcg32::seed_from_u64(5);
        manager.try_spawn(&config, 0.0, &mut rng);
        manager.try_spawn(&config, 0.0, &mut rng);
        manager.try_spawn(&config, 5000.0, &mut rng);

        assert!(manager.remove_expired(10_000.0, config.bonus_lifetime_ms).is_empty());
        let expired = manager.remove_expired(10_001.0, config.bonus_lifetime_ms);
        assert_eq!(expired.len(), 2);
        assert_eq!(manager.bonuses.len(), 1);
        assert!(manager.try_spawn(&config, 10_001.0, &mut rng).is_some());
    }

    #[test]
    fn test_ids_are_unique() {
        let config = GameConfig::new();
        let mut manager = BonusManager::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let a = manager.try_spawn(&config, 0.0, &mut rng).unwrap().id;
        manager.remove(0);
        let b = manager.try_spawn(&config, 0.0, &mut rng).unwrap().id;
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut manager = BonusManager::new();
        assert!(manager.remove(0).is_none());
    }

    #[test]
    fn test_spawn_chain_reschedules() {
        let mut state = GameState::with_seed(21);
        // Construction made the first attempt and armed the next one
        assert_eq!(state.bonuses.bonuses.len(), 1);
        assert_eq!(state.scheduler.count(ScheduledAction::SpawnBonus), 1);
        let next = state.scheduler.next_due_ms().unwrap();
        assert!((4000.0..12_000.0).contains(&next));

        // Full: retry after the fixed delay
        let mut events = Vec::new();
        state.bonuses.try_spawn(&state.config, 0.0, &mut state.rng);
        state.bonuses.try_spawn(&state.config, 0.0, &mut state.rng);
        state.scheduler.clear();
        state.spawn_bonus(true, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.scheduler.next_due_ms(), Some(state.config.bonus_retry_ms));
    }

    #[test]
    fn test_replacement_attempt_does_not_chain() {
        let mut state = GameState::with_seed(21);
        state.scheduler.clear();
        let mut events = Vec::new();
        state.spawn_bonus(false, &mut events);
        assert_eq!(events.len(), 1);
        assert!(state.scheduler.is_empty());
    }
}
