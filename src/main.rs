//! Headless demo: runs the brick-breaking variant to completion with a
//! pointer that tracks the ball perfectly, then prints the final snapshot.
//!
//! Run with `RUST_LOG=debug` to watch spawn/score events.

use std::time::{SystemTime, UNIX_EPOCH};

use arcade_sim::consts::NOMINAL_TICK_MS;
use arcade_sim::sim::{ModeConfig, Phase, Session};
use arcade_sim::{FrameScheduler, InputEvent, SchedulePolicy, Snapshot, TickInput};

fn main() {
    env_logger::init();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut session = Session::new(ModeConfig::breakout(), seed);
    session.start();

    let mut scheduler = FrameScheduler::new(SchedulePolicy::FixedInterval {
        period_ms: NOMINAL_TICK_MS,
    });
    let token = scheduler.start();
    let period = scheduler.period_ms();

    // Cap the run so a pathological bounce pattern cannot loop forever
    let max_frames = 200_000;
    for _ in 0..max_frames {
        let mut input = TickInput::default();
        input.absorb(
            InputEvent::PointerMoved(session.ball.pos.x),
            session.phase,
            session.pointer_bound(),
        );
        scheduler.fire(token, period, &mut session, &input);
        if session.phase == Phase::Over {
            break;
        }
    }
    scheduler.cancel();

    let snapshot = Snapshot::capture(&session);
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).expect("snapshot must serialize")
    );
}
