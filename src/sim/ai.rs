//! Scripted opponent
//!
//! Each tick the AI picks a target point and a speed multiplier from a
//! fixed decision order (first match wins), then steps its paddle toward
//! the target at a bounded speed:
//!
//! 1. Corner escape - puck and paddle wedged in the same right-hand corner
//! 2. Recover - puck slipped behind the paddle on the AI half
//! 3. Defend - puck close to the AI goal and coming in (or already very close)
//! 4. Attack - line up behind the puck, strike when close and aligned
//! 5. Puck on the player half - intercept, drift, or idle at center

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Paddle, Puck};
use crate::config::GameConfig;
use crate::{clamp_circle, clamp_span};

/// Below this remaining distance the paddle holds still
pub const ARRIVE_THRESHOLD: f32 = 2.0;
/// Speed factor inside half a radius of the target
pub const ARRIVE_DAMPING: f32 = 0.6;
/// Half-width of the random vertical aim offset
pub const AIM_JITTER: f32 = 15.0;
/// Added to puck velocity before dividing so crossing times stay finite
const VELOCITY_BIAS: f32 = 0.01;

/// Which rule produced the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiBranch {
    CornerEscape,
    Recover,
    Defend,
    Position,
    Strike,
    Hold,
    Intercept,
    Drift,
    Idle,
}

/// Target point (already clamped to the AI half) and speed multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiPlan {
    pub target: Vec2,
    pub speed_multiplier: f32,
    pub branch: AiBranch,
}

impl AiPlan {
    fn new(target: Vec2, speed_multiplier: f32, branch: AiBranch) -> Self {
        Self {
            target,
            speed_multiplier,
            branch,
        }
    }
}

/// Decide where the AI paddle should head this tick.
///
/// `jitter` is a vertical aim offset (the caller draws it from
/// `[-AIM_JITTER, AIM_JITTER]`); it perturbs the attack line and the drift
/// posture so the AI doesn't replay identical rallies.
pub fn plan(ai: &Paddle, puck: &Puck, config: &GameConfig, jitter: f32) -> AiPlan {
    let raw = choose(ai, puck, config, jitter);
    let (min, max) = config.half_rink(ai.side);
    let target = if raw.target.is_finite() {
        clamp_circle(raw.target, ai.radius, min, max)
    } else {
        log::warn!("AI produced a non-finite target in {:?}; holding", raw.branch);
        ai.pos
    };
    AiPlan { target, ..raw }
}

fn choose(ai: &Paddle, puck: &Puck, config: &GameConfig, jitter: f32) -> AiPlan {
    let (w, h) = (config.rink_width, config.rink_height);
    let r = ai.radius;
    let pr = puck.radius;
    let p = puck.pos;
    let v = puck.vel;
    let distance = p.distance(ai.pos);
    let clamp_y = |y: f32| clamp_span(y, r, h - r);

    let on_ai_side = p.x > w / 2.0;

    // 1. Corner trap
    if on_ai_side {
        let margin = r + pr + 20.0;
        let reach = (r + pr) * 2.5;
        let stuck = distance < r + pr + 15.0 || (v.x.abs() < 0.5 && v.y.abs() < 0.5);
        let puck_in_corner = p.x > w - margin;
        let ai_in_corner = ai.pos.x > w - margin * 1.2;

        if puck_in_corner && p.y < margin {
            if ai_in_corner && ai.pos.y < margin * 1.2 && stuck {
                return AiPlan::new(Vec2::new(w - reach, reach), 2.2, AiBranch::CornerEscape);
            }
        } else if puck_in_corner
            && p.y > h - margin
            && ai_in_corner
            && ai.pos.y > h - margin * 1.2
            && stuck
        {
            return AiPlan::new(Vec2::new(w - reach, h - reach), 2.2, AiBranch::CornerEscape);
        }
    }

    // 2. Puck got past the paddle
    if on_ai_side && p.x > ai.pos.x {
        return AiPlan::new(Vec2::new(w - r - 5.0, clamp_y(p.y)), 2.5, AiBranch::Recover);
    }

    if on_ai_side {
        // 3. Defend the goal
        if p.x > w - 180.0 && (v.x > 0.05 || p.x > w - 100.0) {
            let x = (p.x + pr).max(w - 100.0).min(w - r);
            let time_to_goal = if v.x > 0.1 { (w - p.x) / v.x } else { 1000.0 };
            let intercept_y = p.y + v.y * time_to_goal.min(1.0);
            // Pull toward center height to avoid chasing every wobble
            let y = clamp_y((intercept_y + h / 2.0) / 2.0);
            return AiPlan::new(Vec2::new(x, y), 1.9, AiBranch::Defend);
        }

        // 4. Attack: sit on the far side of the puck from the player's goal
        let goal = Vec2::new(0.0, h / 2.0);
        let goal_angle = (goal.y - p.y).atan2(goal.x - p.x);
        let offset = Vec2::new(goal_angle.cos(), goal_angle.sin()) * r * 1.2;
        let aligned = ai.pos.x > p.x - 10.0;
        let strike_range = r + pr + 35.0;

        if distance < strike_range {
            if aligned {
                let target = p + offset * 1.8;
                return AiPlan::new(target, 2.1, AiBranch::Strike);
            }
            let target = p - offset + Vec2::new(0.0, jitter);
            return AiPlan::new(target, 1.7, AiBranch::Hold);
        }
        let target = p - offset + Vec2::new(0.0, jitter);
        return AiPlan::new(target, 1.2, AiBranch::Position);
    }

    // 5. Puck on the player half
    let staging_x = w * 0.7;
    let moving = v.x.abs() > 0.05 || v.y.abs() > 0.05;

    if v.x > 0.1 {
        let (target, _) = predict_center_crossing(puck, r, config);
        return AiPlan::new(target, 1.7, AiBranch::Intercept);
    }
    if moving {
        return AiPlan::new(
            Vec2::new(staging_x, h / 2.0 + jitter / 3.0),
            1.0,
            AiBranch::Drift,
        );
    }
    AiPlan::new(Vec2::new(staging_x, h / 2.0), 0.8, AiBranch::Idle)
}

/// Where a rightward puck will cross the center line, folding one bounce
/// off the top or bottom wall into the prediction. Returns the intercept
/// point and whether a bounce was modeled.
pub fn predict_center_crossing(puck: &Puck, paddle_radius: f32, config: &GameConfig) -> (Vec2, bool) {
    let (w, h) = (config.rink_width, config.rink_height);
    let pr = puck.radius;
    let p = puck.pos;
    let v = puck.vel;

    let time_to_center = ((w / 2.0 - p.x) / (v.x + VELOCITY_BIAS)).max(0.0);
    // Steep shots bounce several times; don't look that far ahead
    let horizon = 1.5 * h / (v.y.abs() + 1.0);
    let t = time_to_center.min(horizon);

    let mut cross = Vec2::new(w / 2.0 + paddle_radius * 1.5, p.y + v.y * t);

    let exits_top = cross.y < pr && v.y < 0.0;
    let exits_bottom = cross.y > h - pr && v.y > 0.0;
    if exits_top || exits_bottom {
        let gap = if v.y < 0.0 { p.y - pr } else { h - pr - p.y };
        let time_to_wall = gap / (v.y + VELOCITY_BIAS).abs();
        if time_to_wall >= 0.0 && time_to_wall < t {
            let wall_y = if v.y < 0.0 { pr } else { h - pr };
            let remaining = t - time_to_wall;
            let x_at_wall = p.x + v.x * time_to_wall;
            cross.y = wall_y - v.y * remaining;
            cross.x = (x_at_wall + v.x * remaining).max(w / 2.0 + paddle_radius);
            return (cross, true);
        }
    }
    (cross, false)
}

/// Move toward the plan's target, never overshooting
pub fn step_toward(ai: &mut Paddle, plan: &AiPlan, slowdown: f32, config: &GameConfig) {
    let delta = plan.target - ai.pos;
    let distance = delta.length();

    if distance > ARRIVE_THRESHOLD {
        let mut speed = ai.speed * slowdown * plan.speed_multiplier;
        if distance < ai.radius * 0.5 {
            speed *= ARRIVE_DAMPING;
        }
        ai.pos += delta / distance * speed.min(distance);
    }
    ai.constrain(config);
}

impl GameState {
    /// Run the AI for one tick. Returns the plan, or None while frozen.
    pub fn update_ai(&mut self) -> Option<AiPlan> {
        if self.effects.ai_frozen {
            return None;
        }
        let jitter = self.rng.random_range(-AIM_JITTER..AIM_JITTER);
        let plan = plan(&self.ai, &self.puck, &self.config, jitter);
        log::trace!(
            "AI {:?} -> ({:.0}, {:.0}) x{}",
            plan.branch,
            plan.target.x,
            plan.target.y,
            plan.speed_multiplier
        );
        step_toward(&mut self.ai, &plan, self.effects.ai_slowdown, &self.config);
        Some(plan)
    }
}
