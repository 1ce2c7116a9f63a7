//! Timer state machines.

pub mod alarm;
pub mod controls;
pub mod engine;
pub mod pomodoro;

pub use alarm::{AlarmDirective, AlarmMode, POST_ALARM_DELAY_MS, VIBRATION_PATTERN_MS};
pub use controls::Capabilities;
pub use engine::{CountdownTimer, TimerState};
pub use pomodoro::{Phase, PomodoroTimer, BREAK_MS, FOCUS_MS};
