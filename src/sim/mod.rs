//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One physics step per tick, clock advanced by the host
//! - Seeded RNG only
//! - Timers live in the scheduler, never on the host
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod bonus;
pub mod collision;
pub mod effects;
pub mod schedule;
pub mod state;
pub mod tick;

pub use ai::{AiBranch, AiPlan};
pub use bonus::BonusManager;
pub use collision::GoalLine;
pub use effects::ActiveEffects;
pub use schedule::{ScheduledAction, Scheduler, TimerId};
pub use state::{
    Bonus, BonusKind, CollectionEffect, GameEvent, GameState, GoalEnd, GoalFlash, Paddle, Puck,
    Score, Side,
};
pub use tick::{Snapshot, TickInput, tick};
