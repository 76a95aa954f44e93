//! Read-only render snapshots
//!
//! The rendering collaborator gets an owned copy of everything it needs
//! after each step; nothing here can reach back into the simulation.

use serde::Serialize;

use crate::geom::{Circle, Rect};
use crate::sim::grid::{Cells, TileGrid};
use crate::sim::{Phase, Session, Side};

#[derive(Debug, Clone, Serialize)]
pub struct BrickView {
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
    pub alive: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipeView {
    pub top: Rect,
    pub bottom: Rect,
}

/// Snapshot of a ball-game session after one step
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub paddles: Vec<Rect>,
    pub ball: Circle,
    pub bricks: Vec<BrickView>,
    pub pipes: Vec<PipeView>,
    pub score: u32,
    pub side_scores: [u32; 2],
    pub lives: u8,
    pub won: bool,
    pub winner: Option<Side>,
}

impl Snapshot {
    pub fn capture(session: &Session) -> Self {
        let field_height = session.config.bounds.y;
        Self {
            phase: session.phase,
            paddles: session.paddles.iter().map(|p| p.rect()).collect(),
            ball: session.ball.circle(),
            bricks: session
                .bricks
                .iter()
                .map(|b| BrickView {
                    row: b.row,
                    col: b.col,
                    rect: b.rect,
                    alive: b.alive,
                })
                .collect(),
            pipes: session
                .pipes
                .iter()
                .map(|p| PipeView {
                    top: p.top_rect(),
                    bottom: p.bottom_rect(field_height),
                })
                .collect(),
            score: session.score,
            side_scores: session.side_scores,
            lives: session.lives,
            won: session.won,
            winner: session.winner,
        }
    }
}

/// Snapshot of the tile-puzzle state
#[derive(Debug, Clone, Serialize)]
pub struct GridSnapshot {
    pub cells: Cells,
    pub score: u32,
    pub won: bool,
    pub stuck: bool,
}

impl GridSnapshot {
    pub fn capture(grid: &TileGrid) -> Self {
        Self {
            cells: *grid.cells(),
            score: grid.score,
            won: grid.won,
            stuck: grid.is_stuck(),
        }
    }
}
