//! Input routing
//!
//! Arrow keys and horizontal swipes pick a lane (starting the run if it
//! isn't going yet). A short tap, Space or Enter starts from idle or game
//! over. Whether a command actually changes anything is decided by
//! [`GameState::apply`](crate::sim::GameState::apply).

use crate::consts::SWIPE_THRESHOLD;
use crate::sim::Command;

/// Buttons on the page around the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Start,
    Stop,
    Restart,
    Mute,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Start, Button::Stop, Button::Restart, Button::Mute];

    /// DOM element ID of the button
    pub fn element_id(self) -> &'static str {
        match self {
            Button::Start => "start-btn",
            Button::Stop => "stop-btn",
            Button::Restart => "restart-btn",
            Button::Mute => "mute-btn",
        }
    }

    /// Simulation command for the button; `Mute` is handled by the audio side
    pub fn command(self) -> Option<Command> {
        match self {
            Button::Start | Button::Restart => Some(Command::Restart),
            Button::Stop => Some(Command::Stop),
            Button::Mute => None,
        }
    }
}

/// Pointer gesture tracker
#[derive(Debug, Default, Clone)]
pub struct InputRouter {
    pointer_start_x: Option<f32>,
    /// Demo autopilot toggle (key `i`)
    pub autopilot: bool,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a `KeyboardEvent.key` value
    pub fn key_down(&mut self, key: &str) -> Option<Command> {
        match key {
            "ArrowLeft" => Some(Command::ShiftLeft),
            "ArrowRight" => Some(Command::ShiftRight),
            " " | "Enter" => Some(Command::Start),
            "i" | "I" => {
                self.autopilot = !self.autopilot;
                log::info!("Autopilot: {}", self.autopilot);
                None
            }
            _ => None,
        }
    }

    /// Pointer pressed on the canvas at client x
    pub fn pointer_down(&mut self, x: f32) {
        self.pointer_start_x = Some(x);
    }

    /// Pointer released anywhere; classifies the gesture as swipe or tap.
    /// Releases without a press on the canvas (button clicks) are ignored.
    pub fn pointer_up(&mut self, x: f32) -> Option<Command> {
        let start = self.pointer_start_x.take()?;
        let dx = x - start;
        Some(if dx.abs() <= SWIPE_THRESHOLD {
            Command::Start
        } else if dx < 0.0 {
            Command::ShiftLeft
        } else {
            Command::ShiftRight
        })
    }

    /// Gesture aborted (pointer left the page, lost capture)
    pub fn pointer_cancel(&mut self) {
        self.pointer_start_x = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;

    #[test]
    fn test_keys() {
        let mut router = InputRouter::new();
        assert_eq!(router.key_down("ArrowLeft"), Some(Command::ShiftLeft));
        assert_eq!(router.key_down("ArrowRight"), Some(Command::ShiftRight));
        assert_eq!(router.key_down(" "), Some(Command::Start));
        assert_eq!(router.key_down("Enter"), Some(Command::Start));
        assert_eq!(router.key_down("a"), None);
    }

    #[test]
    fn test_autopilot_toggle() {
        let mut router = InputRouter::new();
        assert_eq!(router.key_down("i"), None);
        assert!(router.autopilot);
        router.key_down("I");
        assert!(!router.autopilot);
    }

    #[test]
    fn test_swipe_and_tap() {
        let mut router = InputRouter::new();
        router.pointer_down(300.0);
        assert_eq!(router.pointer_up(200.0), Some(Command::ShiftLeft));
        router.pointer_down(300.0);
        assert_eq!(router.pointer_up(341.0), Some(Command::ShiftRight));
        // Exactly at the threshold is still a tap
        router.pointer_down(300.0);
        assert_eq!(router.pointer_up(340.0), Some(Command::Start));
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut router = InputRouter::new();
        assert_eq!(router.pointer_up(10.0), None);
        router.pointer_down(0.0);
        router.pointer_cancel();
        assert_eq!(router.pointer_up(100.0), None);
    }

    #[test]
    fn test_buttons() {
        assert_eq!(Button::Start.command(), Some(Command::Restart));
        assert_eq!(Button::Restart.command(), Some(Command::Restart));
        assert_eq!(Button::Stop.command(), Some(Command::Stop));
        assert_eq!(Button::Mute.command(), None);
        let ids: Vec<_> = Button::ALL.iter().map(|b| b.element_id()).collect();
        assert_eq!(ids, ["start-btn", "stop-btn", "restart-btn", "mute-btn"]);
    }

    #[test]
    fn test_idle_swipe_starts_and_changes_lane() {
        let mut state = GameState::new(1, 1000.0, 800.0);
        let mut router = InputRouter::new();
        router.pointer_down(500.0);
        let command = router.pointer_up(400.0).expect("swipe");
        state.apply(command, 0.0);
        assert!(state.is_running());
        assert_eq!(state.player.target_lane, 0);
    }

    #[test]
    fn test_tap_while_running_keeps_lane_and_score() {
        let mut state = GameState::new(1, 1000.0, 800.0);
        state.apply(Command::ShiftRight, 0.0);
        state.score = 5;
        let mut router = InputRouter::new();
        router.pointer_down(500.0);
        let command = router.pointer_up(505.0).expect("tap");
        state.apply(command, 100.0);
        assert!(state.is_running());
        assert_eq!(state.player.target_lane, 2);
        assert_eq!(state.score, 5);
    }

    #[test]
    fn test_start_key_restarts_after_game_over() {
        let mut state = GameState::new(1, 1000.0, 800.0);
        state.apply(Command::Start, 0.0);
        state.score = 9;
        state.crash();
        let mut router = InputRouter::new();
        let command = router.key_down("Enter").expect("start");
        state.apply(command, 500.0);
        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.player.target_lane, 1);
    }
}
