//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Displacements are defined per nominal tick and scaled by elapsed time
//! - Seeded RNG only, owned by the session
//! - Stable iteration order (row-major bricks, spawn-order pipes)
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod state;
pub mod tick;

pub use collision::{EdgeRule, FieldRules, ObstacleSet, Resolution, SimEvent, resolve};
pub use grid::{Direction, MoveOutcome, TileGrid};
pub use state::{
    Ball, Brick, BrickLayout, ModeConfig, Paddle, PaddleAxis, PaddleControl, PaddleLayout, Phase,
    PipeConfig, PipePair, Session, Side,
};
