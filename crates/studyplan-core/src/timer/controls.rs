//! Capability sets: which control actions are valid in each timer state.
//!
//! A pure mapping from state to valid actions, independent of any rendering
//! framework. The presentation layer shows or hides controls from this.

use serde::{Deserialize, Serialize};

use super::engine::TimerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub start: bool,
    pub pause: bool,
    pub resume: bool,
    pub reset: bool,
    /// Leaving the timer screen is blocked mid-countdown.
    pub exit: bool,
    /// Duration selection is only available before the first start.
    pub select_duration: bool,
}

impl Capabilities {
    pub fn for_state(state: TimerState) -> Self {
        match state {
            TimerState::Ready => Self {
                start: true,
                pause: false,
                resume: false,
                reset: true,
                exit: true,
                select_duration: true,
            },
            TimerState::Running => Self {
                start: false,
                pause: true,
                resume: false,
                reset: true,
                exit: false,
                select_duration: false,
            },
            TimerState::Paused => Self {
                start: false,
                pause: false,
                resume: true,
                reset: true,
                exit: true,
                select_duration: false,
            },
            // Finished waits on the continue-or-stop decision; only reset
            // (stay) or exit (commit and leave) apply.
            TimerState::Finished => Self {
                start: false,
                pause: false,
                resume: false,
                reset: true,
                exit: true,
                select_duration: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_is_always_available() {
        for state in [
            TimerState::Ready,
            TimerState::Running,
            TimerState::Paused,
            TimerState::Finished,
        ] {
            assert!(Capabilities::for_state(state).reset);
        }
    }

    #[test]
    fn running_blocks_exit_and_selection() {
        let caps = Capabilities::for_state(TimerState::Running);
        assert!(caps.pause);
        assert!(!caps.exit);
        assert!(!caps.select_duration);
        assert!(!caps.start);
    }

    #[test]
    fn paused_allows_resume_and_exit() {
        let caps = Capabilities::for_state(TimerState::Paused);
        assert!(caps.resume);
        assert!(caps.exit);
        assert!(!caps.pause);
    }
}
