//! Frame scheduling
//!
//! The scheduler is the only source of repeated step invocation. Two
//! policies exist: a fixed-interval host timer (one step per firing, fixed
//! displacement) and a display-synchronized callback (whole nominal
//! substeps accumulated from the elapsed delta). Both re-check the session
//! phase at the top of every firing, and cancellation invalidates any
//! already-queued firing synchronously via a generation token.

use crate::consts::{MAX_SUBSTEPS, NOMINAL_TICK_MS};
use crate::input::TickInput;
use crate::sim::{Phase, Session};

/// How step invocations are driven
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulePolicy {
    /// Periodic host timer; each firing is exactly one fixed-displacement step
    FixedInterval { period_ms: f32 },
    /// Per-refresh callback with a variable elapsed delta; displacement is
    /// covered by running whole nominal substeps, capped per firing
    DisplaySynced,
}

/// Proof of the current schedule generation. A firing that presents a stale
/// token is rejected, so a callback queued before `cancel` can never mutate
/// a reallocated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleToken {
    generation: u64,
}

/// Drives repeated simulation steps under one of the two policies
#[derive(Debug)]
pub struct FrameScheduler {
    policy: SchedulePolicy,
    generation: u64,
    active: bool,
    accumulator_ms: f32,
}

impl FrameScheduler {
    pub fn new(policy: SchedulePolicy) -> Self {
        Self {
            policy,
            generation: 0,
            active: false,
            accumulator_ms: 0.0,
        }
    }

    /// Begin a new schedule generation; previously issued tokens go stale
    pub fn start(&mut self) -> ScheduleToken {
        self.generation += 1;
        self.active = true;
        self.accumulator_ms = 0.0;
        ScheduleToken {
            generation: self.generation,
        }
    }

    /// Stop synchronously: no step runs after this returns, even from a
    /// firing that was already queued with an old token
    pub fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.generation += 1;
            log::debug!("scheduler cancelled at generation {}", self.generation);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Timer period a fixed-interval host should fire at
    pub fn period_ms(&self) -> f32 {
        match self.policy {
            SchedulePolicy::FixedInterval { period_ms } => period_ms,
            SchedulePolicy::DisplaySynced => NOMINAL_TICK_MS,
        }
    }

    /// One scheduled invocation. Returns the number of simulation steps
    /// executed (0 when the token is stale, the scheduler is cancelled, or
    /// the session is not `Running`).
    pub fn fire(
        &mut self,
        token: ScheduleToken,
        elapsed_ms: f32,
        session: &mut Session,
        input: &TickInput,
    ) -> u32 {
        if !self.active || token.generation != self.generation {
            return 0;
        }

        // Checked on every firing, not at schedule time: a stale queued
        // invocation must not step a paused or finished session. Control
        // input (pause toggle, restart) still passes through; the session
        // ignores everything else outside Running.
        if session.phase != Phase::Running {
            if input.pause || input.restart {
                session.tick(input, NOMINAL_TICK_MS);
            }
            return 0;
        }

        match self.policy {
            SchedulePolicy::FixedInterval { .. } => {
                session.tick(input, NOMINAL_TICK_MS);
                1
            }
            SchedulePolicy::DisplaySynced => {
                self.accumulator_ms += elapsed_ms;
                let mut steps = 0;
                while self.accumulator_ms >= NOMINAL_TICK_MS && steps < MAX_SUBSTEPS {
                    session.tick(input, NOMINAL_TICK_MS);
                    self.accumulator_ms -= NOMINAL_TICK_MS;
                    steps += 1;
                    if session.phase != Phase::Running {
                        break;
                    }
                }
                if steps == MAX_SUBSTEPS {
                    // Shed backlog instead of spiraling
                    self.accumulator_ms = 0.0;
                }
                steps
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ModeConfig;
    use glam::Vec2;

    fn running_session() -> Session {
        let mut session = Session::new(ModeConfig::rally(), 1);
        session.start();
        session
    }

    #[test]
    fn test_fixed_interval_runs_one_step_per_firing() {
        let mut session = running_session();
        let mut scheduler =
            FrameScheduler::new(SchedulePolicy::FixedInterval { period_ms: 16.0 });
        let token = scheduler.start();

        assert_eq!(
            scheduler.fire(token, 16.0, &mut session, &TickInput::default()),
            1
        );
        assert_eq!(session.ticks, 1);
    }

    #[test]
    fn test_no_step_unless_running() {
        let mut session = Session::new(ModeConfig::rally(), 1);
        let mut scheduler = FrameScheduler::new(SchedulePolicy::DisplaySynced);
        let token = scheduler.start();

        // NotStarted
        assert_eq!(
            scheduler.fire(token, 100.0, &mut session, &TickInput::default()),
            0
        );
        assert_eq!(session.ticks, 0);

        // Paused
        session.start();
        session.phase = Phase::Paused;
        assert_eq!(
            scheduler.fire(token, 100.0, &mut session, &TickInput::default()),
            0
        );
        assert_eq!(session.ticks, 0);

        // Over
        session.phase = Phase::Over;
        assert_eq!(
            scheduler.fire(token, 100.0, &mut session, &TickInput::default()),
            0
        );
        assert_eq!(session.ticks, 0);
    }

    #[test]
    fn test_control_input_passes_while_paused() {
        let mut session = running_session();
        session.phase = Phase::Paused;
        let mut scheduler = FrameScheduler::new(SchedulePolicy::DisplaySynced);
        let token = scheduler.start();

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let steps = scheduler.fire(token, 16.0, &mut session, &pause);
        assert_eq!(steps, 0);
        assert_eq!(session.phase, Phase::Running);
        // Resuming itself stepped nothing
        assert_eq!(session.ticks, 0);
    }

    #[test]
    fn test_stale_token_rejected_after_cancel() {
        let mut session = running_session();
        let mut scheduler = FrameScheduler::new(SchedulePolicy::DisplaySynced);
        let token = scheduler.start();
        assert!(scheduler.is_active());
        scheduler.cancel();
        assert!(!scheduler.is_active());

        // The queued invocation arrives after teardown: it must not step
        assert_eq!(
            scheduler.fire(token, 16.0, &mut session, &TickInput::default()),
            0
        );
        assert_eq!(session.ticks, 0);

        // Restarting issues a fresh token; the stale one stays dead
        let fresh = scheduler.start();
        assert_eq!(
            scheduler.fire(token, 16.0, &mut session, &TickInput::default()),
            0
        );
        assert_eq!(
            scheduler.fire(fresh, 16.0, &mut session, &TickInput::default()),
            1
        );
    }

    #[test]
    fn test_display_synced_accumulates_whole_substeps() {
        let mut session = running_session();
        let mut scheduler = FrameScheduler::new(SchedulePolicy::DisplaySynced);
        let token = scheduler.start();

        assert_eq!(
            scheduler.fire(token, 40.0, &mut session, &TickInput::default()),
            2
        );
        // 8ms carried over; another 8ms completes one more step
        assert_eq!(
            scheduler.fire(token, 8.0, &mut session, &TickInput::default()),
            1
        );
        assert_eq!(session.ticks, 3);
    }

    #[test]
    fn test_substep_cap_sheds_backlog() {
        let mut session = running_session();
        let mut scheduler = FrameScheduler::new(SchedulePolicy::DisplaySynced);
        let token = scheduler.start();

        assert_eq!(
            scheduler.fire(token, 5000.0, &mut session, &TickInput::default()),
            MAX_SUBSTEPS
        );
        // Backlog shed: the next short frame runs at most one step
        let steps = scheduler.fire(token, 16.0, &mut session, &TickInput::default());
        assert!(steps <= 1);
    }

    #[test]
    fn test_substeps_stop_when_session_ends() {
        let mut config = ModeConfig::breakout();
        config.lives = 1;
        let mut session = Session::new(config, 1);
        session.start();
        // Ball about to drop out on the very first substep
        session.ball.pos = Vec2::new(400.0, 592.0);
        session.ball.vel = Vec2::new(0.0, 4.0);

        let mut scheduler = FrameScheduler::new(SchedulePolicy::DisplaySynced);
        let token = scheduler.start();
        let steps = scheduler.fire(token, 80.0, &mut session, &TickInput::default());

        assert_eq!(steps, 1);
        assert_eq!(session.phase, Phase::Over);
    }
}
