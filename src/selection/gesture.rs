use crate::selection::event::{is_tracked_modifier, KeyEvent};
use std::time::{Duration, Instant};

/// Gap after the first modifier press beyond which another press of the same
/// modifier fires the gesture.
pub const GESTURE_WINDOW: Duration = Duration::from_millis(350);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// First press seen at the given instant.
    Armed(Instant),
    /// Interrupted by another key, or already fired. Cleared by releasing the
    /// modifier.
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    None,
    Fired,
}

/// Tracks control key timing for the `ctrlKey` trigger mode.
///
/// Key downs arm and fire; releasing the modifier always returns to idle, so
/// a gesture needs the modifier down twice without a release in between.
#[derive(Debug)]
pub struct GestureDetector {
    state: GestureState,
    window: Duration,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureDetector {
    pub fn new() -> Self {
        Self::with_window(GESTURE_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            state: GestureState::Idle,
            window,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }

    pub fn on_key_down(&mut self, event: KeyEvent) -> GestureOutcome {
        if !is_tracked_modifier(event.vk_code) {
            if matches!(self.state, GestureState::Armed(_)) {
                self.state = GestureState::Suppressed;
            }
            return GestureOutcome::None;
        }

        match self.state {
            GestureState::Idle => {
                self.state = GestureState::Armed(event.at);
                GestureOutcome::None
            }
            GestureState::Armed(first) => {
                if event.at.saturating_duration_since(first) > self.window {
                    self.state = GestureState::Suppressed;
                    GestureOutcome::Fired
                } else {
                    GestureOutcome::None
                }
            }
            GestureState::Suppressed => GestureOutcome::None,
        }
    }

    pub fn on_key_up(&mut self, event: KeyEvent) {
        if is_tracked_modifier(event.vk_code) {
            self.state = GestureState::Idle;
        }
    }
}
