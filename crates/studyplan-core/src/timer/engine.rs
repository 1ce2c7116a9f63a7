//! Plain countdown timer.
//!
//! The timer is a tick-driven state machine. It does not use internal
//! threads or wall-clock reads - the caller invokes [`CountdownTimer::tick`]
//! once per second while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! Ready -> Running <-> Paused -> Ready
//!             |
//!             v (countdown expiry)
//!          Finished
//! ```
//!
//! `Finished` is transient: it is reached only through expiry, and the
//! caller must either commit the elapsed time and leave, or `reset()` back
//! to `Ready`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::alarm::{AlarmMode, POST_ALARM_DELAY_MS};
use super::controls::Capabilities;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Ready,
    Running,
    Paused,
    Finished,
}

/// Countdown timer for a single study session.
///
/// Duration selection happens outside the engine; `start()` snapshots the
/// chosen total and locks further selection until `reset()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownTimer {
    state: TimerState,
    /// Configured duration, snapshotted by `start()`.
    total_ms: u64,
    /// Remaining time in milliseconds.
    remaining_ms: u64,
    alarm_mode: AlarmMode,
    /// Subject the session will be committed against. `None` means the
    /// session is unassigned and will never be persisted.
    subject_id: Option<i64>,
}

impl CountdownTimer {
    pub fn new(subject_id: Option<i64>) -> Self {
        Self {
            state: TimerState::Ready,
            total_ms: 0,
            remaining_ms: 0,
            alarm_mode: AlarmMode::default(),
            subject_id,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn alarm_mode(&self) -> AlarmMode {
        self.alarm_mode
    }

    pub fn subject_id(&self) -> Option<i64> {
        self.subject_id
    }

    /// Duration selection is locked from `start()` until `reset()`.
    pub fn selection_locked(&self) -> bool {
        self.state != TimerState::Ready
    }

    /// Which control actions are valid in the current state.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_state(self.state)
    }

    /// 0.0 .. 1.0 elapsed fraction of the configured duration.
    pub fn progress(&self) -> f64 {
        if self.total_ms == 0 {
            return 0.0;
        }
        let elapsed = self.total_ms.saturating_sub(self.remaining_ms) as f64;
        (elapsed / self.total_ms as f64).clamp(0.0, 1.0)
    }

    /// Same as [`progress`](Self::progress) on a 0..100 scale.
    pub fn progress_pct(&self) -> f64 {
        (self.progress() * 100.0).clamp(0.0, 100.0)
    }

    /// Elapsed time to merge into the study-record store.
    ///
    /// `total - remaining` when positive, otherwise the full configured
    /// duration. The floor guards against a zero-or-negative artifact when a
    /// session finishes exactly at expiry.
    pub fn elapsed_to_commit(&self) -> u64 {
        let elapsed = self.total_ms.saturating_sub(self.remaining_ms);
        if elapsed > 0 {
            elapsed
        } else {
            self.total_ms
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: None,
            remaining_ms: self.remaining_ms,
            total_ms: self.total_ms,
            progress_pct: self.progress_pct(),
            subject_id: self.subject_id,
            alarm_mode: self.alarm_mode,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the countdown with the selected duration.
    ///
    /// Starting over an active countdown implicitly cancels it and restarts
    /// from the new duration; there is no inner timer object to unwind.
    pub fn start(&mut self, total_ms: u64) -> Option<Event> {
        self.total_ms = total_ms;
        self.remaining_ms = total_ms;
        self.state = TimerState::Running;
        Some(Event::TimerStarted {
            total_ms,
            subject_id: self.subject_id,
            at: Utc::now(),
        })
    }

    /// Suspend the countdown without losing `remaining`.
    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        Some(Event::TimerPaused {
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Restart the countdown from the current `remaining`, not from `total`.
    pub fn resume(&mut self) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.state = TimerState::Running;
        Some(Event::TimerResumed {
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Discard the session state and unlock duration selection.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Ready;
        self.total_ms = 0;
        self.remaining_ms = 0;
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::TimerFinished)` on expiry; the event carries the
    /// alarm directive for the configured mode.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(1000);
        if self.remaining_ms == 0 {
            self.state = TimerState::Finished;
            return Some(Event::TimerFinished {
                alarm: self.alarm_mode.directive(),
                post_alarm_delay_ms: POST_ALARM_DELAY_MS,
                at: Utc::now(),
            });
        }
        None
    }

    /// Rotate the alarm mode: Sound -> Vibrate -> Silent -> Sound.
    pub fn cycle_alarm(&mut self) -> Event {
        self.alarm_mode = self.alarm_mode.cycle();
        Event::AlarmModeChanged {
            mode: self.alarm_mode,
            at: Utc::now(),
        }
    }

    /// Set the alarm mode directly (applied from configuration on session
    /// creation; interactive toggling goes through `cycle_alarm`).
    pub fn set_alarm_mode(&mut self, mode: AlarmMode) {
        self.alarm_mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::alarm::AlarmDirective;

    #[test]
    fn start_pause_resume() {
        let mut timer = CountdownTimer::new(Some(1));
        assert_eq!(timer.state(), TimerState::Ready);

        assert!(timer.start(60_000).is_some());
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.total_ms(), 60_000);
        assert_eq!(timer.remaining_ms(), 60_000);

        timer.tick();
        assert_eq!(timer.remaining_ms(), 59_000);

        assert!(timer.pause().is_some());
        assert_eq!(timer.state(), TimerState::Paused);
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_ms(), 59_000); // Frozen while paused.

        assert!(timer.resume().is_some());
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.remaining_ms(), 59_000); // Resumes from remaining.
        assert_eq!(timer.total_ms(), 60_000); // Total never changes.
    }

    #[test]
    fn restart_replaces_active_countdown() {
        let mut timer = CountdownTimer::new(None);
        timer.start(10_000);
        timer.tick();
        assert!(timer.start(99_000).is_some());
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.total_ms(), 99_000);
        assert_eq!(timer.remaining_ms(), 99_000);
    }

    #[test]
    fn reset_returns_to_ready_from_any_state() {
        let mut timer = CountdownTimer::new(Some(3));
        timer.start(10_000);
        timer.tick();
        timer.reset();
        assert_eq!(timer.state(), TimerState::Ready);
        assert_eq!(timer.remaining_ms(), 0);
        assert!(!timer.selection_locked());

        timer.start(10_000);
        timer.pause();
        timer.reset();
        assert_eq!(timer.state(), TimerState::Ready);
        assert_eq!(timer.remaining_ms(), 0);
    }

    #[test]
    fn countdown_expiry_fires_alarm_directive() {
        let mut timer = CountdownTimer::new(Some(1));
        timer.start(3000);
        assert!(timer.tick().is_none());
        assert!(timer.tick().is_none());
        let event = timer.tick().expect("third tick should finish");
        match event {
            Event::TimerFinished {
                alarm,
                post_alarm_delay_ms,
                ..
            } => {
                assert_eq!(alarm, AlarmDirective::SoundPulse);
                assert_eq!(post_alarm_delay_ms, POST_ALARM_DELAY_MS);
            }
            other => panic!("expected TimerFinished, got {other:?}"),
        }
        assert_eq!(timer.state(), TimerState::Finished);
        assert!(timer.tick().is_none());
    }

    #[test]
    fn elapsed_commit_guard() {
        let mut timer = CountdownTimer::new(Some(1));
        timer.start(600_000);
        // Timer never actually ran: commit the full configured duration.
        assert_eq!(timer.elapsed_to_commit(), 600_000);

        timer.tick();
        assert_eq!(timer.elapsed_to_commit(), 1000);
    }

    #[test]
    fn progress_is_clamped() {
        let mut timer = CountdownTimer::new(None);
        assert_eq!(timer.progress(), 0.0);
        timer.start(4000);
        timer.tick();
        timer.tick();
        assert!((timer.progress() - 0.5).abs() < 1e-9);
        assert!((timer.progress_pct() - 50.0).abs() < 1e-9);
        timer.tick();
        timer.tick();
        assert!((timer.progress() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn alarm_cycles_through_modes() {
        let mut timer = CountdownTimer::new(None);
        timer.cycle_alarm();
        assert_eq!(timer.alarm_mode(), AlarmMode::Vibrate);
        timer.cycle_alarm();
        assert_eq!(timer.alarm_mode(), AlarmMode::Silent);
        timer.cycle_alarm();
        assert_eq!(timer.alarm_mode(), AlarmMode::Sound);
    }

    #[test]
    fn silent_expiry_emits_silence() {
        let mut timer = CountdownTimer::new(None);
        timer.cycle_alarm();
        timer.cycle_alarm(); // Sound -> Vibrate -> Silent
        timer.start(1000);
        match timer.tick() {
            Some(Event::TimerFinished { alarm, .. }) => {
                assert_eq!(alarm, AlarmDirective::Silence);
            }
            other => panic!("expected TimerFinished, got {other:?}"),
        }
    }
}
