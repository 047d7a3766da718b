//! Collision detection and response
//!
//! Each check looks at the puck's current state and may move it or change
//! its velocity. They run in a fixed order every tick (see `tick`), so the
//! order decides how simultaneous contacts resolve.

use glam::Vec2;

use super::state::{Bonus, GoalEnd, Paddle, Puck};
use crate::config::GameConfig;
use crate::consts::EPSILON;
use crate::{clamp_span, normalize_or};

/// Rebound amplification off the long walls and the side walls
pub const WALL_BOUNCE: f32 = 1.05;
/// Stronger rebound off the back wall beside a goal mouth
pub const BACK_WALL_BOUNCE: f32 = 1.1;
/// Gap left between puck and wall after a rebound
pub const WALL_PULLBACK: f32 = 1.0;
/// Horizontal stretch of the impact delta before `atan2`; flattens rebounds
pub const IMPACT_STRETCH: f32 = 1.5;
/// Share of paddle motion transferred to the puck
pub const PADDLE_CARRY_X: f32 = 0.7;
pub const PADDLE_CARRY_Y: f32 = 0.4;

/// Outcome of the goal-line check at one short wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalLine {
    /// Puck not touching this wall
    Clear,
    /// Puck entered the goal mouth
    Goal(GoalEnd),
    /// Puck hit the wall beside the mouth and was sent back
    Rebound,
}

/// Closed span, so the same test gates the side walls and the goal line
fn in_goal_mouth(y: f32, config: &GameConfig) -> bool {
    let (top, bottom) = config.goal_mouth();
    y >= top && y <= bottom
}

/// Top/bottom walls: send the puck back inside with an amplified rebound
pub fn bounce_vertical_walls(puck: &mut Puck, config: &GameConfig) -> bool {
    let r = puck.radius;
    if puck.pos.y - r < 0.0 {
        puck.vel.y = puck.vel.y.abs() * WALL_BOUNCE;
        puck.pos.y = r + WALL_PULLBACK;
        true
    } else if puck.pos.y + r > config.rink_height {
        puck.vel.y = -puck.vel.y.abs() * WALL_BOUNCE;
        puck.pos.y = config.rink_height - r - WALL_PULLBACK;
        true
    } else {
        false
    }
}

/// Short walls outside the goal-mouth span
pub fn bounce_side_walls(puck: &mut Puck, config: &GameConfig) -> bool {
    if in_goal_mouth(puck.pos.y, config) {
        return false;
    }

    let r = puck.radius;
    if puck.pos.x - r < 0.0 {
        puck.vel.x = puck.vel.x.abs() * WALL_BOUNCE;
        puck.pos.x = r + WALL_PULLBACK;
        true
    } else if puck.pos.x + r > config.rink_width {
        puck.vel.x = -puck.vel.x.abs() * WALL_BOUNCE;
        puck.pos.x = config.rink_width - r - WALL_PULLBACK;
        true
    } else {
        false
    }
}

/// Paddle strike. The rebound angle comes from a horizontally stretched
/// center delta, speed from the puck's base speed times `speed_multiplier`,
/// plus a share of the paddle's own motion. The puck is then pushed clear
/// along the unstretched center line.
pub fn resolve_paddle_impact(
    puck: &mut Puck,
    paddle: &Paddle,
    speed_multiplier: f32,
    config: &GameConfig,
) -> bool {
    let delta = puck.pos - paddle.pos;
    let distance = delta.length();
    let reach = puck.radius + paddle.radius;
    // Also rejects NaN distances
    if !(distance < reach) {
        return false;
    }

    // Concentric centers have no direction; push toward the opponent
    let normal = normalize_or(delta, paddle.side.forward());
    let aim = if distance < EPSILON { normal } else { delta };
    let angle = aim.y.atan2(aim.x * IMPACT_STRETCH);

    let speed = puck.speed * speed_multiplier;
    puck.vel = Vec2::new(angle.cos(), angle.sin()) * speed
        + Vec2::new(paddle.vel.x * PADDLE_CARRY_X, paddle.vel.y * PADDLE_CARRY_Y);

    let overlap = reach - distance;
    puck.pos += normal * (overlap + 1.0);
    // A paddle near the long wall can shove the puck through it
    puck.pos.y = clamp_span(puck.pos.y, puck.radius, config.rink_height - puck.radius);
    true
}

/// Goal line at one short wall: score inside the mouth, hard rebound outside
pub fn resolve_goal_line(puck: &mut Puck, end: GoalEnd, config: &GameConfig) -> GoalLine {
    let r = puck.radius;
    let crossed = match end {
        GoalEnd::Left => puck.pos.x - r < 0.0,
        GoalEnd::Right => puck.pos.x + r > config.rink_width,
    };
    if !crossed {
        return GoalLine::Clear;
    }
    if in_goal_mouth(puck.pos.y, config) {
        return GoalLine::Goal(end);
    }

    match end {
        GoalEnd::Left => {
            puck.vel.x = puck.vel.x.abs() * BACK_WALL_BOUNCE;
            puck.pos.x = r + WALL_PULLBACK;
        }
        GoalEnd::Right => {
            puck.vel.x = -puck.vel.x.abs() * BACK_WALL_BOUNCE;
            puck.pos.x = config.rink_width - r - WALL_PULLBACK;
        }
    }
    GoalLine::Rebound
}

/// Indices of every bonus the puck overlaps, newest first
pub fn touching_bonuses(puck: &Puck, bonuses: &[Bonus]) -> Vec<usize> {
    bonuses
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, bonus)| puck.pos.distance(bonus.pos) < puck.radius + bonus.radius)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BonusKind, Side};

    fn setup() -> (GameConfig, Puck) {
        let config = GameConfig::new();
        let puck = Puck::new(&config);
        (config, puck)
    }

    #[test]
    fn test_puck_bounces_off_top_wall() {
        let (config, mut puck) = setup();
        puck.pos = Vec2::new(300.0, 10.0);
        puck.vel = Vec2::new(2.0, -4.0);

        assert!(bounce_vertical_walls(&mut puck, &config));
        assert!((puck.vel.y - 4.2).abs() < 1e-5);
        assert_eq!(puck.vel.x, 2.0);
        assert_eq!(puck.pos.y, 16.0);
    }

    #[test]
    fn test_puck_bounces_off_bottom_wall() {
        let (config, mut puck) = setup();
        puck.pos = Vec2::new(300.0, 495.0);
        puck.vel = Vec2::new(0.0, 3.0);

        assert!(bounce_vertical_walls(&mut puck, &config));
        assert!(puck.vel.y < 0.0);
        assert_eq!(puck.pos.y, 484.0);
    }

    #[test]
    fn test_no_bounce_inside_rink() {
        let (config, mut puck) = setup();
        puck.vel = Vec2::new(3.0, 3.0);
        assert!(!bounce_vertical_walls(&mut puck, &config));
        assert!(!bounce_side_walls(&mut puck, &config));
        assert_eq!(puck.vel, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_side_wall_skips_goal_mouth() {
        let (config, mut puck) = setup();
        puck.pos = Vec2::new(5.0, 250.0);
        puck.vel = Vec2::new(-3.0, 0.0);
        assert!(!bounce_side_walls(&mut puck, &config));

        puck.pos = Vec2::new(5.0, 100.0);
        assert!(bounce_side_walls(&mut puck, &config));
        assert!((puck.vel.x - 3.15).abs() < 1e-5);
        assert_eq!(puck.pos.x, 16.0);
    }

    #[test]
    fn test_side_wall_never_reverses_outgoing_puck() {
        let (config, mut puck) = setup();
        puck.pos = Vec2::new(5.0, 100.0);
        puck.vel = Vec2::new(2.0, 0.0);
        assert!(bounce_side_walls(&mut puck, &config));
        assert!(puck.vel.x > 0.0);
    }

    #[test]
    fn test_goal_inside_mouth() {
        let (config, mut puck) = setup();
        puck.pos = Vec2::new(790.0, 250.0);
        assert_eq!(
            resolve_goal_line(&mut puck, GoalEnd::Right, &config),
            GoalLine::Goal(GoalEnd::Right)
        );
        puck.pos = Vec2::new(10.0, 200.0);
        assert_eq!(
            resolve_goal_line(&mut puck, GoalEnd::Left, &config),
            GoalLine::Goal(GoalEnd::Left)
        );
        assert_eq!(GoalEnd::Left.scorer(), Side::Ai);
    }

    #[test]
    fn test_goal_mouth_edges_score() {
        let (config, mut puck) = setup();
        puck.pos = Vec2::new(10.0, 190.0);
        assert!(!bounce_side_walls(&mut puck, &config));
        assert_eq!(
            resolve_goal_line(&mut puck, GoalEnd::Left, &config),
            GoalLine::Goal(GoalEnd::Left)
        );
        puck.pos = Vec2::new(790.0, 310.0);
        assert_eq!(
            resolve_goal_line(&mut puck, GoalEnd::Right, &config),
            GoalLine::Goal(GoalEnd::Right)
        );
        puck.pos = Vec2::new(790.0, 310.5);
        assert_eq!(
            resolve_goal_line(&mut puck, GoalEnd::Right, &config),
            GoalLine::Rebound
        );
    }

    #[test]
    fn test_back_wall_rebound_outside_mouth() {
        let (config, mut puck) = setup();
        puck.pos = Vec2::new(10.0, 400.0);
        puck.vel = Vec2::new(-4.0, 1.0);
        assert_eq!(
            resolve_goal_line(&mut puck, GoalEnd::Left, &config),
            GoalLine::Rebound
        );
        assert!((puck.vel.x - 4.4).abs() < 1e-5);
        assert_eq!(puck.pos.x, 16.0);
    }

    #[test]
    fn test_goal_line_clear() {
        let (config, mut puck) = setup();
        assert_eq!(
            resolve_goal_line(&mut puck, GoalEnd::Left, &config),
            GoalLine::Clear
        );
        assert_eq!(
            resolve_goal_line(&mut puck, GoalEnd::Right, &config),
            GoalLine::Clear
        );
    }

    #[test]
    fn test_head_on_paddle_impact() {
        let (config, mut puck) = setup();
        let mut paddle = Paddle::new(Side::Player, &config);
        paddle.pos = Vec2::new(100.0, 250.0);
        puck.pos = Vec2::new(140.0, 250.0);
        puck.vel = Vec2::new(-5.0, 0.0);

        assert!(resolve_paddle_impact(&mut puck, &paddle, 1.0, &config));
        assert!((puck.vel.x - 5.0).abs() < 1e-4);
        assert!(puck.vel.y.abs() < 1e-4);
        // Pushed out to 45 + 1
        assert!((puck.pos.x - 146.0).abs() < 1e-4);
    }

    #[test]
    fn test_paddle_impact_uses_multiplier_and_carry() {
        let (config, mut puck) = setup();
        let mut paddle = Paddle::new(Side::Player, &config);
        paddle.pos = Vec2::new(100.0, 250.0);
        paddle.vel = Vec2::new(10.0, 10.0);
        puck.pos = Vec2::new(130.0, 250.0);

        resolve_paddle_impact(&mut puck, &paddle, 1.5, &config);
        assert!((puck.vel.x - (7.5 + 7.0)).abs() < 1e-4);
        assert!((puck.vel.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_impact_angle_is_flattened() {
        let (config, mut puck) = setup();
        let paddle = Paddle::new(Side::Player, &config);
        // 45° contact
        puck.pos = paddle.pos + Vec2::new(20.0, 20.0);
        resolve_paddle_impact(&mut puck, &paddle, 1.0, &config);
        assert!(puck.vel.x > puck.vel.y);
        let expected = (1.0_f32).atan2(1.5);
        assert!((puck.vel.y.atan2(puck.vel.x) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_concentric_impact_stays_finite() {
        let (config, mut puck) = setup();
        let paddle = Paddle::new(Side::Ai, &config);
        puck.pos = paddle.pos;
        assert!(resolve_paddle_impact(&mut puck, &paddle, 1.0, &config));
        assert!(puck.pos.is_finite() && puck.vel.is_finite());
        assert!(puck.vel.x < 0.0, "AI paddle pushes toward the player");
    }

    #[test]
    fn test_impact_keeps_puck_inside_vertically() {
        let (config, mut puck) = setup();
        let mut paddle = Paddle::new(Side::Player, &config);
        paddle.pos = Vec2::new(100.0, 30.0);
        puck.pos = Vec2::new(100.0, 16.0);
        resolve_paddle_impact(&mut puck, &paddle, 1.0, &config);
        assert!(puck.pos.y >= puck.radius);
    }

    #[test]
    fn test_no_impact_when_apart() {
        let (config, mut puck) = setup();
        let paddle = Paddle::new(Side::Player, &config);
        puck.vel = Vec2::new(1.0, 1.0);
        assert!(!resolve_paddle_impact(&mut puck, &paddle, 1.0, &config));
        assert_eq!(puck.vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_touching_bonuses_newest_first() {
        let (_, mut puck) = setup();
        puck.pos = Vec2::new(300.0, 300.0);
        let bonus = |id, x| Bonus {
            id,
            kind: BonusKind::SlowDownAi,
            pos: Vec2::new(x, 300.0),
            radius: 20.0,
            spawned_ms: 0.0,
        };
        let bonuses = vec![bonus(1, 310.0), bonus(2, 500.0), bonus(3, 290.0)];
        assert_eq!(touching_bonuses(&puck, &bonuses), vec![2, 0]);
    }
}
