//! Entity model and session state
//!
//! One [`Session`] owns everything for a single play-through: paddle(s),
//! ball, obstacles, score, lives, and the state-machine tag. Reset discards
//! and reallocates all owned entities.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::geom::{Circle, Rect};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Phase {
    /// Allocated but never started; entities sit at canonical positions
    NotStarted,
    /// Active gameplay
    Running,
    /// Frozen; no entity mutation until resumed
    Paused,
    /// Terminal until an explicit reset
    Over,
}

/// Which free axis a paddle slides along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleAxis {
    /// Slides along x, pinned near the top or bottom edge
    Horizontal,
    /// Slides along y, pinned near the left or right edge
    Vertical,
}

/// Who moves a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleControl {
    /// Pointer position, last write wins
    Pointer,
    /// Reactive controller that tracks the ball at a capped speed
    Tracking,
}

/// A paddle: a rect pinned to one lane, sliding along the other axis
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub axis: PaddleAxis,
    pub control: PaddleControl,
    /// Position of the min corner along the free axis
    pub offset: f32,
    /// Desired paddle center along the free axis (set by input)
    pub target: f32,
    /// Fixed coordinate of the min corner along the pinned axis
    pub lane: f32,
    pub size: Vec2,
}

impl Paddle {
    /// Extent along the free axis
    #[inline]
    pub fn extent(&self) -> f32 {
        match self.axis {
            PaddleAxis::Horizontal => self.size.x,
            PaddleAxis::Vertical => self.size.y,
        }
    }

    /// Collision rect at the current offset
    pub fn rect(&self) -> Rect {
        match self.axis {
            PaddleAxis::Horizontal => Rect::new(Vec2::new(self.offset, self.lane), self.size),
            PaddleAxis::Vertical => Rect::new(Vec2::new(self.lane, self.offset), self.size),
        }
    }

    /// Center coordinate along the free axis
    #[inline]
    pub fn center(&self) -> f32 {
        self.offset + self.extent() / 2.0
    }

    /// Snap to the stored pointer target, clamped inside `[0, bound - extent]`
    pub fn apply_target(&mut self, bound: f32) {
        self.offset = (self.target - self.extent() / 2.0).clamp(0.0, bound - self.extent());
    }

    /// Reactive controller: nudge toward `ball_coord` by at most `max_step`,
    /// with a dead zone so the paddle does not jitter when already aligned
    pub fn track(&mut self, ball_coord: f32, max_step: f32, bound: f32) {
        let center = self.center();
        if center < ball_coord - TRACK_DEAD_ZONE {
            self.offset = (self.offset + max_step).min(bound - self.extent());
        } else if center > ball_coord + TRACK_DEAD_ZONE {
            self.offset = (self.offset - max_step).max(0.0);
        }
        self.target = self.center();
    }
}

/// The ball (or the gravity-bound bird in the obstacle-dodging variant)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// The collision shape at the current position
    pub fn circle(&self) -> Circle {
        Circle {
            center: self.pos,
            radius: self.radius,
        }
    }
}

/// A destructible brick on the fixed grid
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
    pub alive: bool,
}

/// Brick grid layout parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickLayout {
    pub rows: usize,
    pub cols: usize,
    pub size: Vec2,
    pub padding: f32,
    pub offset: Vec2,
}

impl BrickLayout {
    /// Allocate the full grid in row-major order, all alive
    pub fn allocate(&self) -> Vec<Brick> {
        let mut bricks = Vec::with_capacity(self.rows * self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let x = col as f32 * (self.size.x + self.padding) + self.offset.x;
                let y = row as f32 * (self.size.y + self.padding) + self.offset.y;
                bricks.push(Brick {
                    row,
                    col,
                    rect: Rect::new(Vec2::new(x, y), self.size),
                    alive: true,
                });
            }
        }
        bricks
    }
}

/// A vertical pipe pair with a gap, scrolling leftward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipePair {
    /// Leading (left) edge
    pub x: f32,
    pub width: f32,
    /// Bottom of the top segment
    pub gap_top: f32,
    /// Top of the bottom segment
    pub gap_bottom: f32,
}

impl PipePair {
    pub fn top_rect(&self) -> Rect {
        Rect::from_xywh(self.x, 0.0, self.width, self.gap_top)
    }

    pub fn bottom_rect(&self, field_height: f32) -> Rect {
        Rect::from_xywh(self.x, self.gap_bottom, self.width, field_height - self.gap_bottom)
    }
}

/// Pipe spawning/scrolling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeConfig {
    pub width: f32,
    pub gap: f32,
    /// Leftward displacement per nominal tick
    pub speed: f32,
    /// Spawn a new pair once the trailing pair's leading edge passes this x
    pub spawn_threshold: f32,
    /// Top-segment height is uniform in `[gap_top_min, gap_top_min + gap_top_range)`
    pub gap_top_min: f32,
    pub gap_top_range: f32,
}

/// Which side of a two-paddle field
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Paddle arrangement for a variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddleLayout {
    /// One pointer paddle pinned near the bottom edge
    BottomSingle { size: Vec2, inset: f32 },
    /// Pointer paddle on the left, tracking paddle on the right
    SideVersus { size: Vec2, inset: f32 },
    /// No paddles (obstacle-dodging variant)
    None,
}

/// The small configuration struct that replaces three copy-pasted game
/// loops. Each constructor pins down one variant's field shape, entities,
/// and termination rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeConfig {
    /// Playfield width/height
    pub bounds: Vec2,
    pub ball_start: Vec2,
    pub ball_vel: Vec2,
    pub ball_radius: f32,
    pub layout: PaddleLayout,
    /// Lives before game over (bottom-miss variants)
    pub lives: u8,
    /// First side to reach this score wins (two-paddle variant)
    pub target_score: Option<u32>,
    pub bricks: Option<BrickLayout>,
    pub pipes: Option<PipeConfig>,
    /// Downward acceleration per nominal tick (obstacle-dodging variant)
    pub gravity: f32,
    /// Vertical velocity applied on a jump impulse
    pub jump_impulse: f32,
}

impl ModeConfig {
    /// Two-paddle rally: pointer paddle vs tracking paddle, first to 11
    pub fn rally() -> Self {
        let bounds = Vec2::new(800.0, 600.0);
        Self {
            bounds,
            ball_start: bounds / 2.0,
            ball_vel: Vec2::new(4.0, 4.0),
            ball_radius: 10.0,
            layout: PaddleLayout::SideVersus {
                size: Vec2::new(15.0, 100.0),
                inset: 10.0,
            },
            lives: 0,
            target_score: Some(RALLY_TARGET_SCORE),
            bricks: None,
            pipes: None,
            gravity: 0.0,
            jump_impulse: 0.0,
        }
    }

    /// Brick-breaking: bottom paddle, 3 lives, 5x9 destructible grid
    pub fn breakout() -> Self {
        let bounds = Vec2::new(800.0, 600.0);
        Self {
            bounds,
            ball_start: Vec2::new(bounds.x / 2.0, bounds.y - 50.0),
            ball_vel: Vec2::new(4.0, -4.0),
            ball_radius: 10.0,
            layout: PaddleLayout::BottomSingle {
                size: Vec2::new(100.0, 15.0),
                inset: 15.0,
            },
            lives: 3,
            target_score: None,
            bricks: Some(BrickLayout {
                rows: 5,
                cols: 9,
                size: Vec2::new(75.0, 20.0),
                padding: 10.0,
                offset: Vec2::new(30.0, 60.0),
            }),
            pipes: None,
            gravity: 0.0,
            jump_impulse: 0.0,
        }
    }

    /// Side-scrolling obstacle dodge: gravity-bound ball, procedural pipes
    pub fn pipe_dodge() -> Self {
        let bounds = Vec2::new(400.0, 600.0);
        Self {
            bounds,
            ball_start: Vec2::new(80.0, 250.0),
            ball_vel: Vec2::ZERO,
            ball_radius: 15.0,
            layout: PaddleLayout::None,
            lives: 0,
            target_score: None,
            bricks: None,
            pipes: Some(PipeConfig {
                width: 60.0,
                gap: 150.0,
                speed: 2.0,
                spawn_threshold: 200.0,
                gap_top_min: 50.0,
                gap_top_range: 200.0,
            }),
            gravity: 0.6,
            jump_impulse: -10.0,
        }
    }

    /// Build the paddles for this layout at their canonical positions
    pub(crate) fn allocate_paddles(&self) -> Vec<Paddle> {
        match self.layout {
            PaddleLayout::BottomSingle { size, inset } => {
                let offset = self.bounds.x / 2.0 - size.x / 2.0;
                vec![Paddle {
                    axis: PaddleAxis::Horizontal,
                    control: PaddleControl::Pointer,
                    offset,
                    target: self.bounds.x / 2.0,
                    lane: self.bounds.y - inset - size.y,
                    size,
                }]
            }
            PaddleLayout::SideVersus { size, inset } => {
                let offset = self.bounds.y / 2.0 - size.y / 2.0;
                let target = self.bounds.y / 2.0;
                vec![
                    Paddle {
                        axis: PaddleAxis::Vertical,
                        control: PaddleControl::Pointer,
                        offset,
                        target,
                        lane: inset,
                        size,
                    },
                    Paddle {
                        axis: PaddleAxis::Vertical,
                        control: PaddleControl::Tracking,
                        offset,
                        target,
                        lane: self.bounds.x - inset - size.x,
                        size,
                    },
                ]
            }
            PaddleLayout::None => Vec::new(),
        }
    }
}

/// One complete play-through: owns all entities, score, lives, and the
/// state-machine tag
#[derive(Debug, Clone)]
pub struct Session {
    pub config: ModeConfig,
    pub phase: Phase,
    pub paddles: Vec<Paddle>,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub pipes: Vec<PipePair>,
    /// Breakout score or obstacle-dodge passed counter
    pub score: u32,
    /// Rally scores, indexed by [`Side::index`]
    pub side_scores: [u32; 2],
    pub lives: u8,
    /// Set when the session ended in a win
    pub won: bool,
    /// Winning side of a rally session
    pub winner: Option<Side>,
    /// Simulation tick counter
    pub ticks: u64,
    pub(crate) rng: Pcg32,
    seed: u64,
}

impl Session {
    /// Create a session in `NotStarted` with entities at canonical positions
    pub fn new(config: ModeConfig, seed: u64) -> Self {
        let mut session = Self {
            phase: Phase::NotStarted,
            paddles: Vec::new(),
            ball: Ball {
                pos: config.ball_start,
                vel: config.ball_vel,
                radius: config.ball_radius,
            },
            bricks: Vec::new(),
            pipes: Vec::new(),
            score: 0,
            side_scores: [0, 0],
            lives: config.lives,
            won: false,
            winner: None,
            ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            config,
        };
        session.allocate_entities();
        session
    }

    /// Start (or restart): discard and reallocate all owned entities
    pub fn start(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.score = 0;
        self.side_scores = [0, 0];
        self.lives = self.config.lives;
        self.won = false;
        self.winner = None;
        self.ticks = 0;
        self.allocate_entities();
        self.phase = Phase::Running;
        log::info!("session started (seed {})", self.seed);
    }

    fn allocate_entities(&mut self) {
        self.paddles = self.config.allocate_paddles();
        self.ball = Ball {
            pos: self.config.ball_start,
            vel: self.config.ball_vel,
            radius: self.config.ball_radius,
        };
        self.bricks = self
            .config
            .bricks
            .as_ref()
            .map(BrickLayout::allocate)
            .unwrap_or_default();
        self.pipes.clear();
    }

    /// Respawn the ball at its canonical start position and velocity
    pub(crate) fn respawn_ball(&mut self, vel: Vec2) {
        self.ball.pos = self.config.ball_start;
        self.ball.vel = vel;
    }

    /// Bound of the pointer axis (what pointer coordinates are clamped to)
    pub fn pointer_bound(&self) -> f32 {
        match self.layout_axis() {
            PaddleAxis::Horizontal => self.config.bounds.x,
            PaddleAxis::Vertical => self.config.bounds.y,
        }
    }

    fn layout_axis(&self) -> PaddleAxis {
        match self.config.layout {
            PaddleLayout::BottomSingle { .. } => PaddleAxis::Horizontal,
            _ => PaddleAxis::Vertical,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
