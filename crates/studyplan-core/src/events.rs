//! Timer and persistence events.
//!
//! Every state change in a timer produces an [`Event`]. The CLI prints them;
//! a GUI would subscribe to them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{AlarmDirective, AlarmMode, Phase, TimerState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        total_ms: u64,
        subject_id: Option<i64>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero. Carries the directive for the configured
    /// alarm mode and the delay before the continue-or-stop prompt.
    TimerFinished {
        alarm: AlarmDirective,
        post_alarm_delay_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    AlarmModeChanged {
        mode: AlarmMode,
        at: DateTime<Utc>,
    },
    /// A Pomodoro phase began (on start or on continue after a finish).
    PhaseStarted {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// A Pomodoro phase ran to expiry. The caller decides whether to
    /// continue into the next phase or stop and commit.
    PhaseFinished {
        phase: Phase,
        alarm: AlarmDirective,
        post_alarm_delay_ms: u64,
        at: DateTime<Utc>,
    },
    /// Elapsed time was merged into the study-record store.
    StudyRecordCommitted {
        subject_id: i64,
        date: NaiveDate,
        study_time_ms: i64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: Option<Phase>,
        remaining_ms: u64,
        total_ms: u64,
        progress_pct: f64,
        subject_id: Option<i64>,
        alarm_mode: AlarmMode,
        at: DateTime<Utc>,
    },
}
