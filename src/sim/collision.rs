//! Collision detection and resolution
//!
//! [`resolve`] is a pure function: it takes the current entity state and
//! returns the updated ball plus the events the step must fold into the
//! session (snapshot-then-apply; nothing is mutated in place).

use glam::Vec2;

use super::state::{Ball, Brick, ModeConfig, Paddle, PaddleAxis, PipePair, Side};
use crate::consts::*;
use crate::geom::circle_rect_overlap;

/// What happens when the ball's leading edge crosses a playfield edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRule {
    /// Nothing; the ball may leave the field on this edge
    Open,
    /// Reflect the perpendicular velocity component back into the field
    Reflect,
    /// The ball is lost (life decrement, then respawn or game over)
    LoseBall,
    /// Crossing awards a point to the given side
    Score(Side),
    /// Terminal collision; the session ends immediately
    Fatal,
}

/// Per-edge rules plus the field bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRules {
    pub bounds: Vec2,
    pub left: EdgeRule,
    pub right: EdgeRule,
    pub top: EdgeRule,
    pub bottom: EdgeRule,
}

impl FieldRules {
    /// Derive the edge rules a mode's config implies
    pub fn for_mode(config: &ModeConfig) -> Self {
        let bounds = config.bounds;
        if config.target_score.is_some() {
            // Two-paddle rally: side walls score, top/bottom reflect
            Self {
                bounds,
                left: EdgeRule::Score(Side::Right),
                right: EdgeRule::Score(Side::Left),
                top: EdgeRule::Reflect,
                bottom: EdgeRule::Reflect,
            }
        } else if config.pipes.is_some() {
            // Obstacle dodge: only the ground kills; the bird never reaches
            // the side edges and may briefly fly above the top
            Self {
                bounds,
                left: EdgeRule::Open,
                right: EdgeRule::Open,
                top: EdgeRule::Open,
                bottom: EdgeRule::Fatal,
            }
        } else {
            // Brick-breaking: bottom miss costs a life
            Self {
                bounds,
                left: EdgeRule::Reflect,
                right: EdgeRule::Reflect,
                top: EdgeRule::Reflect,
                bottom: EdgeRule::LoseBall,
            }
        }
    }
}

/// Side effects of one resolution, folded into the session by the step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    WallBounce,
    PaddleBounce { index: usize },
    BrickDestroyed { row: usize, col: usize },
    BallLost,
    PointScored { by: Side },
    FatalHit,
}

/// The obstacle family active for a variant
#[derive(Debug, Clone, Copy)]
pub enum ObstacleSet<'a> {
    None,
    Bricks(&'a [Brick]),
    Pipes(&'a [PipePair]),
}

/// Result of resolving one tick's collisions
#[derive(Debug, Clone)]
pub struct Resolution {
    pub ball: Ball,
    pub events: Vec<SimEvent>,
}

/// Detect and resolve wall, paddle, and obstacle collisions for an
/// already-advanced ball position.
///
/// Velocity components are forced away from struck surfaces (not merely
/// negated) so a ball already separating is never double-reflected back in.
pub fn resolve(
    ball: &Ball,
    paddles: &[Paddle],
    obstacles: ObstacleSet,
    rules: &FieldRules,
) -> Resolution {
    let mut ball = *ball;
    let mut events = Vec::new();
    let r = ball.radius;

    // Walls
    if ball.pos.x - r < 0.0 {
        match rules.left {
            EdgeRule::Reflect => {
                ball.vel.x = ball.vel.x.abs();
                events.push(SimEvent::WallBounce);
            }
            other => push_edge_event(other, &mut events),
        }
    }
    if ball.pos.x + r > rules.bounds.x {
        match rules.right {
            EdgeRule::Reflect => {
                ball.vel.x = -ball.vel.x.abs();
                events.push(SimEvent::WallBounce);
            }
            other => push_edge_event(other, &mut events),
        }
    }
    if ball.pos.y - r < 0.0 {
        match rules.top {
            EdgeRule::Reflect => {
                ball.vel.y = ball.vel.y.abs();
                events.push(SimEvent::WallBounce);
            }
            other => push_edge_event(other, &mut events),
        }
    }
    if ball.pos.y + r > rules.bounds.y {
        match rules.bottom {
            EdgeRule::Reflect => {
                ball.vel.y = -ball.vel.y.abs();
                events.push(SimEvent::WallBounce);
            }
            other => push_edge_event(other, &mut events),
        }
    }

    // Paddles: force the normal component away from the face, recompute the
    // tangential component from the impact offset (the "angle control" feel)
    for (index, paddle) in paddles.iter().enumerate() {
        let rect = paddle.rect();
        if !circle_rect_overlap(ball.pos, r, &rect) {
            continue;
        }
        match paddle.axis {
            PaddleAxis::Horizontal => {
                ball.vel.y = if rect.center().y > rules.bounds.y / 2.0 {
                    -ball.vel.y.abs()
                } else {
                    ball.vel.y.abs()
                };
                let offset = (ball.pos.x - rect.center().x) / (rect.size.x / 2.0);
                let mut dx = offset * PADDLE_DEFLECT;
                // A dead-center hit must not park the ball on a vertical track
                if dx.abs() < MIN_TANGENTIAL {
                    dx = if dx < 0.0 { -MIN_TANGENTIAL } else { MIN_TANGENTIAL };
                }
                ball.vel.x = dx;
            }
            PaddleAxis::Vertical => {
                ball.vel.x = if rect.center().x < rules.bounds.x / 2.0 {
                    ball.vel.x.abs()
                } else {
                    -ball.vel.x.abs()
                };
                let offset = (ball.pos.y - rect.center().y) / (rect.size.y / 2.0);
                ball.vel.y = offset * PADDLE_DEFLECT;
            }
        }
        events.push(SimEvent::PaddleBounce { index });
    }

    // Repeated paddle deflections must not accelerate the ball without bound
    if !paddles.is_empty() {
        let speed = ball.vel.length();
        if speed > BALL_MAX_SPEED {
            ball.vel = ball.vel / speed * BALL_MAX_SPEED;
        }
    }

    match obstacles {
        ObstacleSet::None => {}
        ObstacleSet::Bricks(bricks) => {
            // Destroyed bricks are excluded from the test set up front.
            // Every hit flips dy only, whichever face was struck; this
            // matches the shipped behavior and stays until physical
            // accuracy becomes a requirement.
            for brick in bricks.iter().filter(|b| b.alive) {
                if circle_rect_overlap(ball.pos, r, &brick.rect) {
                    ball.vel.y = -ball.vel.y;
                    events.push(SimEvent::BrickDestroyed {
                        row: brick.row,
                        col: brick.col,
                    });
                }
            }
        }
        ObstacleSet::Pipes(pipes) => {
            for pipe in pipes {
                let in_span =
                    ball.pos.x + r > pipe.x && ball.pos.x - r < pipe.x + pipe.width;
                let in_blocked_zone =
                    ball.pos.y - r < pipe.gap_top || ball.pos.y + r > pipe.gap_bottom;
                if in_span && in_blocked_zone {
                    // Terminal, no bounce
                    events.push(SimEvent::FatalHit);
                    break;
                }
            }
        }
    }

    Resolution { ball, events }
}

fn push_edge_event(rule: EdgeRule, events: &mut Vec<SimEvent>) {
    match rule {
        EdgeRule::LoseBall => events.push(SimEvent::BallLost),
        EdgeRule::Score(side) => events.push(SimEvent::PointScored { by: side }),
        EdgeRule::Fatal => events.push(SimEvent::FatalHit),
        EdgeRule::Open | EdgeRule::Reflect => {}
    }
}
