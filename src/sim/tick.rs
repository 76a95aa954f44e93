//! The simulation step and the session state machine
//!
//! One [`Session::tick`] call advances every entity by one time unit,
//! delegates to the collision resolver, and folds the resulting events into
//! score/lives/phase. All entity mutation for a tick happens inside this
//! single call; input only ever arrives through the [`TickInput`] it is
//! handed.

use rand::Rng;

use super::collision::{FieldRules, ObstacleSet, SimEvent, resolve};
use super::state::{PaddleAxis, PaddleControl, Phase, PipePair, Session, Side};
use crate::consts::*;
use crate::input::TickInput;

impl Session {
    /// Advance the session by one step of `dt_ms` elapsed time.
    ///
    /// Displacements are defined per [`NOMINAL_TICK_MS`]; passing a
    /// different `dt_ms` scales them, so ball speed is independent of the
    /// scheduler driving this.
    pub fn tick(&mut self, input: &TickInput, dt_ms: f32) {
        if input.restart && matches!(self.phase, Phase::NotStarted | Phase::Over) {
            self.start();
            return;
        }

        if input.pause {
            match self.phase {
                Phase::Running => {
                    self.phase = Phase::Paused;
                    log::info!("session paused");
                    return;
                }
                Phase::Paused => {
                    // Resume; stepping waits for the next invocation
                    self.phase = Phase::Running;
                    log::info!("session resumed");
                    return;
                }
                _ => {}
            }
        }

        if self.phase != Phase::Running {
            return;
        }

        self.ticks += 1;
        let scale = dt_ms / NOMINAL_TICK_MS;

        // Paddles: pointer target for the human, reactive tracking for the
        // opponent. Both stay clamped inside the field.
        let bounds = self.config.bounds;
        let ball_pos = self.ball.pos;
        for paddle in &mut self.paddles {
            let bound = match paddle.axis {
                PaddleAxis::Horizontal => bounds.x,
                PaddleAxis::Vertical => bounds.y,
            };
            match paddle.control {
                PaddleControl::Pointer => {
                    if let Some(pointer) = input.pointer {
                        paddle.target = pointer.clamp(0.0, bound);
                    }
                    paddle.apply_target(bound);
                }
                PaddleControl::Tracking => {
                    let coord = match paddle.axis {
                        PaddleAxis::Horizontal => ball_pos.x,
                        PaddleAxis::Vertical => ball_pos.y,
                    };
                    paddle.track(coord, TRACK_MAX_STEP * scale, bound);
                }
            }
        }

        // Gravity and jump impulse (obstacle-dodging variant only; both are
        // zero elsewhere)
        if input.jump && self.config.jump_impulse != 0.0 {
            self.ball.vel.y = self.config.jump_impulse;
        }
        self.ball.vel.y += self.config.gravity * scale;

        // Advance the ball
        self.ball.pos += self.ball.vel * scale;

        // Scroll and spawn pipes. Spawning draws from the session RNG, the
        // only source of randomness in the step.
        if let Some(pipe_cfg) = self.config.pipes {
            for pipe in &mut self.pipes {
                pipe.x -= pipe_cfg.speed * scale;
            }
            let needs_spawn = self
                .pipes
                .last()
                .is_none_or(|p| p.x < pipe_cfg.spawn_threshold);
            if needs_spawn {
                let gap_top = pipe_cfg.gap_top_min
                    + self.rng.random_range(0..pipe_cfg.gap_top_range as u32) as f32;
                self.pipes.push(PipePair {
                    x: bounds.x,
                    width: pipe_cfg.width,
                    gap_top,
                    gap_bottom: gap_top + pipe_cfg.gap,
                });
                log::debug!("spawned pipe, gap {}..{}", gap_top, gap_top + pipe_cfg.gap);
            }
        }

        // Resolve collisions against a snapshot of the entities, then fold
        // the events
        let rules = FieldRules::for_mode(&self.config);
        let obstacles = if !self.bricks.is_empty() {
            ObstacleSet::Bricks(&self.bricks)
        } else if !self.pipes.is_empty() {
            ObstacleSet::Pipes(&self.pipes)
        } else {
            ObstacleSet::None
        };
        let resolution = resolve(&self.ball, &self.paddles, obstacles, &rules);
        self.ball = resolution.ball;

        let mut fatal = false;
        let mut ball_lost = false;
        let mut point: Option<Side> = None;
        let brick_cols = self.config.bricks.map(|l| l.cols).unwrap_or(0);
        for event in &resolution.events {
            match *event {
                SimEvent::BrickDestroyed { row, col } => {
                    self.bricks[row * brick_cols + col].alive = false;
                    self.score += BRICK_POINTS;
                }
                SimEvent::FatalHit => fatal = true,
                SimEvent::BallLost => ball_lost = true,
                SimEvent::PointScored { by } => point = Some(by),
                SimEvent::WallBounce | SimEvent::PaddleBounce { .. } => {}
            }
        }

        // Terminal collision outranks everything else this tick, including
        // the pass-counter below
        if fatal {
            self.finish(false);
            return;
        }

        // Brick scoring already applied; now the win condition
        if !self.bricks.is_empty() && self.bricks.iter().all(|b| !b.alive) {
            self.finish(true);
            return;
        }

        if ball_lost {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.finish(false);
                return;
            }
            log::info!("ball lost, {} lives left", self.lives);
            self.respawn_ball(self.config.ball_vel);
        }

        if let Some(side) = point {
            self.side_scores[side.index()] += 1;
            let target = self.config.target_score.unwrap_or(u32::MAX);
            if self.side_scores[side.index()] >= target {
                self.winner = Some(side);
                self.finish(side == Side::Left);
                return;
            }
            // Serve toward the side that just conceded
            let mut vel = self.config.ball_vel.abs();
            if side == Side::Left {
                vel.x = -vel.x;
            }
            self.respawn_ball(vel);
            log::debug!("point for {:?}: {:?}", side, self.side_scores);
        }

        // Prune pipes that left the field on the trailing edge; each pair
        // counts one pass
        if self.config.pipes.is_some() {
            let before = self.pipes.len();
            self.pipes.retain(|p| p.x + p.width > 0.0);
            let cleared = (before - self.pipes.len()) as u32;
            if cleared > 0 {
                self.score += cleared;
                log::debug!("cleared {} pipe(s), score {}", cleared, self.score);
            }
        }
    }

    fn finish(&mut self, won: bool) {
        self.won = won;
        self.phase = Phase::Over;
        log::info!(
            "game over ({}), score {} / sides {:?}",
            if won { "win" } else { "loss" },
            self.score,
            self.side_scores
        );
    }
}
