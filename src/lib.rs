//! arcade-sim - the shared simulation core for a handful of small arcade games
//!
//! Core modules:
//! - `geom`: 2D primitives (rects, circles, overlap tests)
//! - `sim`: deterministic simulation (entities, collisions, session state)
//! - `scheduler`: drives repeated simulation steps, fixed-interval or
//!   display-synchronized
//! - `input`: the event boundary the host UI feeds into
//! - `snapshot`: the read-only state the host UI renders from
//!
//! The crate is headless by design: rendering, audio, and persistence live
//! in whatever host embeds a [`sim::Session`].

pub mod geom;
pub mod input;
pub mod scheduler;
pub mod sim;
pub mod snapshot;

pub use input::{InputEvent, KeyCode, TickInput};
pub use scheduler::{FrameScheduler, SchedulePolicy};
pub use sim::{ModeConfig, Phase, Session};
pub use snapshot::{GridSnapshot, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Nominal simulation tick (milliseconds). Per-tick displacements below
    /// are defined at this rate; a variable scheduler scales by elapsed time.
    pub const NOMINAL_TICK_MS: f32 = 16.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Maximum ball speed (per-tick units, caps repeated paddle boosts)
    pub const BALL_MAX_SPEED: f32 = 10.0;
    /// Tangential deflection factor on paddle hits
    pub const PADDLE_DEFLECT: f32 = 5.0;
    /// Floor on the tangential component after a bottom-paddle hit, so a
    /// dead-center hit never parks the ball on a vertical track
    pub const MIN_TANGENTIAL: f32 = 0.5;

    /// Reactive paddle controller: max movement per tick
    pub const TRACK_MAX_STEP: f32 = 5.0;
    /// Reactive paddle controller: dead zone around the ball coordinate
    pub const TRACK_DEAD_ZONE: f32 = 10.0;

    /// First side to reach this score wins the rally variant
    pub const RALLY_TARGET_SCORE: u32 = 11;
    /// Points per destroyed brick
    pub const BRICK_POINTS: u32 = 10;

    /// Tile grid dimensions and win tile
    pub const GRID_SIZE: usize = 4;
    pub const WIN_TILE: u32 = 2048;
    /// Probability that a spawned tile is a 4 rather than a 2
    pub const FOUR_TILE_CHANCE: f64 = 0.1;
}
