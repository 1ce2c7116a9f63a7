//! Pomodoro focus/break cycle timer.
//!
//! Same Ready/Running/Paused/Finished control surface as the plain
//! countdown, with an orthogonal phase: 25 minutes of focus followed by a
//! 5 minute break. When a phase expires the caller is asked to continue or
//! stop; continuing from a break restarts the focus phase from zero.
//!
//! Progress is reported on a combined scale where the focus phase occupies
//! the first 1500 of 1800 display units and the break the remaining 300.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::alarm::{AlarmMode, POST_ALARM_DELAY_MS};
use super::controls::Capabilities;
use super::engine::TimerState;
use crate::events::Event;

/// Fixed focus phase duration: 25 minutes.
pub const FOCUS_MS: u64 = 25 * 60 * 1000;
/// Fixed break phase duration: 5 minutes.
pub const BREAK_MS: u64 = 5 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

/// Pomodoro cycle timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroTimer {
    state: TimerState,
    phase: Phase,
    focus_ms: u64,
    break_ms: u64,
    remaining_ms: u64,
    alarm_mode: AlarmMode,
    subject_id: Option<i64>,
}

impl PomodoroTimer {
    /// Standard 25/5 cycle.
    pub fn new(subject_id: Option<i64>) -> Self {
        Self::with_durations(FOCUS_MS, BREAK_MS, subject_id)
    }

    /// Custom phase durations (configuration override).
    pub fn with_durations(focus_ms: u64, break_ms: u64, subject_id: Option<i64>) -> Self {
        Self {
            state: TimerState::Ready,
            phase: Phase::Focus,
            focus_ms,
            break_ms,
            remaining_ms: focus_ms,
            alarm_mode: AlarmMode::default(),
            subject_id,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Configured duration of the current phase.
    pub fn phase_total_ms(&self) -> u64 {
        match self.phase {
            Phase::Focus => self.focus_ms,
            Phase::Break => self.break_ms,
        }
    }

    pub fn alarm_mode(&self) -> AlarmMode {
        self.alarm_mode
    }

    pub fn subject_id(&self) -> Option<i64> {
        self.subject_id
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_state(self.state)
    }

    /// Position on the combined focus+break scale, in seconds.
    ///
    /// Focus covers `0..focus_secs`, break `focus_secs..focus_secs+break_secs`
    /// (1500 and 1800 with the standard durations).
    pub fn combined_units(&self) -> u64 {
        let phase_elapsed = self.phase_total_ms().saturating_sub(self.remaining_ms) / 1000;
        match self.phase {
            Phase::Focus => phase_elapsed,
            Phase::Break => self.focus_ms / 1000 + phase_elapsed,
        }
    }

    /// Length of the combined scale in seconds (1800 standard).
    pub fn total_units(&self) -> u64 {
        (self.focus_ms + self.break_ms) / 1000
    }

    /// 0.0 .. 1.0 progress across the combined scale.
    pub fn progress(&self) -> f64 {
        let total = self.total_units();
        if total == 0 {
            return 0.0;
        }
        (self.combined_units() as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn progress_pct(&self) -> f64 {
        (self.progress() * 100.0).clamp(0.0, 100.0)
    }

    /// Focus time to merge into the study-record store.
    ///
    /// In the break phase the focus phase has already completed, so the full
    /// focus duration is committed. The positive floor mirrors the plain
    /// engine's expiry guard.
    pub fn elapsed_to_commit(&self) -> u64 {
        let elapsed = match self.phase {
            Phase::Focus => self.focus_ms.saturating_sub(self.remaining_ms),
            Phase::Break => self.focus_ms,
        };
        if elapsed > 0 {
            elapsed
        } else {
            self.focus_ms
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: Some(self.phase),
            remaining_ms: self.remaining_ms,
            total_ms: self.phase_total_ms(),
            progress_pct: self.progress_pct(),
            subject_id: self.subject_id,
            alarm_mode: self.alarm_mode,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh focus phase. Starting over an active cycle implicitly
    /// cancels it.
    pub fn start(&mut self) -> Option<Event> {
        self.phase = Phase::Focus;
        self.remaining_ms = self.focus_ms;
        self.state = TimerState::Running;
        Some(Event::PhaseStarted {
            phase: Phase::Focus,
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

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

    /// Back to a fresh focus phase in `Ready`.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Ready;
        self.phase = Phase::Focus;
        self.remaining_ms = self.focus_ms;
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Advance the current phase by one second.
    ///
    /// Returns `Some(Event::PhaseFinished)` on expiry; the caller then picks
    /// [`continue_cycle`](Self::continue_cycle) or commits and leaves.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(1000);
        if self.remaining_ms == 0 {
            self.state = TimerState::Finished;
            return Some(Event::PhaseFinished {
                phase: self.phase,
                alarm: self.alarm_mode.directive(),
                post_alarm_delay_ms: POST_ALARM_DELAY_MS,
                at: Utc::now(),
            });
        }
        None
    }

    /// Continue into the next phase after a finish.
    ///
    /// Focus rolls into the break; a finished break restarts the focus phase
    /// from zero. Only valid in `Finished`.
    pub fn continue_cycle(&mut self) -> Option<Event> {
        if self.state != TimerState::Finished {
            return None;
        }
        self.phase = match self.phase {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        };
        self.remaining_ms = self.phase_total_ms();
        self.state = TimerState::Running;
        Some(Event::PhaseStarted {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
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

    fn run_to_finish(timer: &mut PomodoroTimer) -> Event {
        loop {
            if let Some(event) = timer.tick() {
                return event;
            }
        }
    }

    #[test]
    fn focus_finish_then_continue_enters_break_at_1500_of_1800() {
        let mut timer = PomodoroTimer::new(Some(1));
        timer.start();
        assert_eq!(timer.phase(), Phase::Focus);
        assert_eq!(timer.remaining_ms(), FOCUS_MS);

        let event = run_to_finish(&mut timer);
        match event {
            Event::PhaseFinished { phase, .. } => assert_eq!(phase, Phase::Focus),
            other => panic!("expected PhaseFinished, got {other:?}"),
        }
        assert_eq!(timer.state(), TimerState::Finished);

        timer.continue_cycle().expect("continue from finished focus");
        assert_eq!(timer.phase(), Phase::Break);
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.remaining_ms(), BREAK_MS);
        // Combined scale reads 1500/1800 before the first break tick.
        assert_eq!(timer.combined_units(), 1500);
        assert_eq!(timer.total_units(), 1800);
        assert!((timer.progress() - 1500.0 / 1800.0).abs() < 1e-9);
    }

    #[test]
    fn break_finish_then_continue_restarts_focus_from_zero() {
        let mut timer = PomodoroTimer::with_durations(3000, 2000, None);
        timer.start();
        run_to_finish(&mut timer);
        timer.continue_cycle();
        run_to_finish(&mut timer);
        assert_eq!(timer.phase(), Phase::Break);
        assert_eq!(timer.state(), TimerState::Finished);

        timer.continue_cycle().expect("continue from finished break");
        assert_eq!(timer.phase(), Phase::Focus);
        assert_eq!(timer.remaining_ms(), 3000);
        assert_eq!(timer.combined_units(), 0);
    }

    #[test]
    fn commit_is_full_focus_after_focus_completes() {
        let mut timer = PomodoroTimer::with_durations(3000, 2000, Some(7));
        timer.start();
        run_to_finish(&mut timer);
        assert_eq!(timer.elapsed_to_commit(), 3000);

        timer.continue_cycle();
        timer.tick();
        // Mid-break, the completed focus time is what gets committed.
        assert_eq!(timer.elapsed_to_commit(), 3000);
    }

    #[test]
    fn commit_guard_on_unticked_session() {
        let mut timer = PomodoroTimer::new(Some(1));
        timer.start();
        assert_eq!(timer.elapsed_to_commit(), FOCUS_MS);
    }

    #[test]
    fn pause_freezes_remaining() {
        let mut timer = PomodoroTimer::new(None);
        timer.start();
        timer.tick();
        timer.pause();
        let frozen = timer.remaining_ms();
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_ms(), frozen);
        timer.resume();
        timer.tick();
        assert_eq!(timer.remaining_ms(), frozen - 1000);
    }

    #[test]
    fn reset_restores_fresh_focus_phase() {
        let mut timer = PomodoroTimer::new(None);
        timer.start();
        timer.tick();
        timer.reset();
        assert_eq!(timer.state(), TimerState::Ready);
        assert_eq!(timer.phase(), Phase::Focus);
        assert_eq!(timer.remaining_ms(), FOCUS_MS);
        assert_eq!(timer.combined_units(), 0);
    }

    #[test]
    fn continue_is_only_valid_when_finished() {
        let mut timer = PomodoroTimer::new(None);
        assert!(timer.continue_cycle().is_none());
        timer.start();
        assert!(timer.continue_cycle().is_none());
    }
}
