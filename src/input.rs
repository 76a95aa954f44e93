//! The input boundary
//!
//! The host UI forwards pointer and key events here; they accumulate into a
//! [`TickInput`] that the next simulation step consumes. Events never touch
//! entity state directly, which keeps a single mutation path per tick.

use crate::sim::Phase;

/// Discrete key presses the games understand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    PauseToggle,
    Jump,
    Restart,
}

/// One event from the host UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer coordinate along the paddle's free axis; continuous,
    /// last write wins
    PointerMoved(f32),
    Key(KeyCode),
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Desired paddle center, already clamped to the playfield
    pub pointer: Option<f32>,
    pub jump: bool,
    pub pause: bool,
    pub restart: bool,
}

impl TickInput {
    /// Fold one event in, honoring the session phase: gameplay input is
    /// ignored unless `Running`, pause toggles also work from `Paused`, and
    /// restart only applies before the first start or after game over.
    pub fn absorb(&mut self, event: InputEvent, phase: Phase, pointer_bound: f32) {
        match (event, phase) {
            (InputEvent::PointerMoved(p), Phase::Running) => {
                self.pointer = Some(p.clamp(0.0, pointer_bound));
            }
            (InputEvent::Key(KeyCode::Jump), Phase::Running) => self.jump = true,
            (InputEvent::Key(KeyCode::PauseToggle), Phase::Running | Phase::Paused) => {
                self.pause = true;
            }
            (InputEvent::Key(KeyCode::Restart), Phase::NotStarted | Phase::Over) => {
                self.restart = true;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_clamped_and_last_write_wins() {
        let mut input = TickInput::default();
        input.absorb(InputEvent::PointerMoved(-50.0), Phase::Running, 800.0);
        assert_eq!(input.pointer, Some(0.0));
        input.absorb(InputEvent::PointerMoved(950.0), Phase::Running, 800.0);
        assert_eq!(input.pointer, Some(800.0));
        input.absorb(InputEvent::PointerMoved(321.0), Phase::Running, 800.0);
        assert_eq!(input.pointer, Some(321.0));
    }

    #[test]
    fn test_gameplay_input_ignored_unless_running() {
        for phase in [Phase::NotStarted, Phase::Paused, Phase::Over] {
            let mut input = TickInput::default();
            input.absorb(InputEvent::PointerMoved(100.0), phase, 800.0);
            input.absorb(InputEvent::Key(KeyCode::Jump), phase, 800.0);
            assert_eq!(input.pointer, None);
            assert!(!input.jump);
        }
    }

    #[test]
    fn test_restart_only_from_terminal_phases() {
        let mut input = TickInput::default();
        input.absorb(InputEvent::Key(KeyCode::Restart), Phase::Running, 800.0);
        input.absorb(InputEvent::Key(KeyCode::Restart), Phase::Paused, 800.0);
        assert!(!input.restart);

        input.absorb(InputEvent::Key(KeyCode::Restart), Phase::Over, 800.0);
        assert!(input.restart);
    }

    #[test]
    fn test_pause_toggle_from_both_phases() {
        let mut input = TickInput::default();
        input.absorb(InputEvent::Key(KeyCode::PauseToggle), Phase::Paused, 800.0);
        assert!(input.pause);

        let mut input = TickInput::default();
        input.absorb(InputEvent::Key(KeyCode::PauseToggle), Phase::Over, 800.0);
        assert!(!input.pause);
    }
}
