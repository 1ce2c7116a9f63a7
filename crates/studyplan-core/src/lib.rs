//! # Studyplan Core Library
//!
//! This library provides the core business logic for Studyplan, a study
//! planner built around exam subjects and daily study records. It implements
//! a CLI-first philosophy where all operations are available via a standalone
//! CLI binary; any GUI is expected to be a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Timer engines**: tick-driven state machines (plain countdown and
//!   Pomodoro focus/break cycle) that require the caller to invoke `tick()`
//!   once per second
//! - **Storage**: SQLite-based subject and study-record storage plus
//!   TOML-based configuration
//! - **Recommendation**: weighted priority scoring over registered subjects
//! - **Calendar**: exam-date annotation as (predicate, directive) decorators
//!
//! ## Key Components
//!
//! - [`CountdownTimer`] / [`PomodoroTimer`]: timer state machines
//! - [`Database`]: subject and study-record persistence
//! - [`Config`]: application configuration management
//! - [`recommend`](recommend::recommend): today's priority-ranked subject list

pub mod calendar;
pub mod error;
pub mod events;
pub mod recommend;
pub mod record;
pub mod storage;
pub mod subject;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use record::{DailyRecord, StudyRecord};
pub use recommend::Recommendation;
pub use storage::{Config, Database, WatchedStore};
pub use subject::{DDay, NewSubject, Subject};
pub use timer::{AlarmDirective, AlarmMode, CountdownTimer, Phase, PomodoroTimer, TimerState};
