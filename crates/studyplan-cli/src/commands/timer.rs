use chrono::{Local, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use studyplan_core::events::Event;
use studyplan_core::storage::{Config, Database};
use studyplan_core::timer::{CountdownTimer, PomodoroTimer, TimerState};

const SESSION_KEY: &str = "timer_session";

/// Active timer session persisted in the kv store between invocations.
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Session {
    Countdown(CountdownTimer),
    Pomodoro(PomodoroTimer),
}

impl Session {
    fn subject_id(&self) -> Option<i64> {
        match self {
            Session::Countdown(t) => t.subject_id(),
            Session::Pomodoro(t) => t.subject_id(),
        }
    }

    fn snapshot(&self) -> Event {
        match self {
            Session::Countdown(t) => t.snapshot(),
            Session::Pomodoro(t) => t.snapshot(),
        }
    }

    fn pause(&mut self) -> Option<Event> {
        match self {
            Session::Countdown(t) => t.pause(),
            Session::Pomodoro(t) => t.pause(),
        }
    }

    fn resume(&mut self) -> Option<Event> {
        match self {
            Session::Countdown(t) => t.resume(),
            Session::Pomodoro(t) => t.resume(),
        }
    }

    fn tick(&mut self) -> Option<Event> {
        match self {
            Session::Countdown(t) => t.tick(),
            Session::Pomodoro(t) => t.tick(),
        }
    }

    fn reset(&mut self) -> Option<Event> {
        match self {
            Session::Countdown(t) => t.reset(),
            Session::Pomodoro(t) => t.reset(),
        }
    }

    fn cycle_alarm(&mut self) -> Event {
        match self {
            Session::Countdown(t) => t.cycle_alarm(),
            Session::Pomodoro(t) => t.cycle_alarm(),
        }
    }

    fn elapsed_to_commit(&self) -> u64 {
        match self {
            Session::Countdown(t) => t.elapsed_to_commit(),
            Session::Pomodoro(t) => t.elapsed_to_commit(),
        }
    }

    /// A session that was rearmed back to `Ready` (or never started) has no
    /// elapsed time worth saving.
    fn has_run(&self) -> bool {
        match self {
            Session::Countdown(t) => t.total_ms() > 0,
            Session::Pomodoro(t) => t.state() != TimerState::Ready,
        }
    }

    /// Keep going after a finish: the Pomodoro rolls into its next phase,
    /// the plain countdown just rearms to `Ready`.
    fn keep_going(&mut self) -> Option<Event> {
        match self {
            Session::Countdown(t) => t.reset(),
            Session::Pomodoro(t) => t.continue_cycle(),
        }
    }
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a plain countdown session
    Start {
        /// Duration in minutes; snapped to the configured step and bound
        #[arg(long)]
        minutes: u32,
        /// Subject to commit the study time against
        #[arg(long)]
        subject: Option<i64>,
    },
    /// Start a Pomodoro focus/break session
    Pomodoro {
        /// Subject to commit the focus time against
        #[arg(long)]
        subject: Option<i64>,
    },
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Advance the session clock by whole seconds
    Tick {
        #[arg(long, default_value_t = 1)]
        seconds: u64,
    },
    /// Print the current session state as JSON
    Status,
    /// Cycle the alarm mode: sound -> vibrate -> silent
    Alarm,
    /// Reset the session without saving anything
    Reset,
    /// Continue after a finish (next Pomodoro phase, or rearm the countdown)
    Continue,
    /// Commit the elapsed time to the study record and close the session
    Finish,
}

fn load_session(db: &Database) -> Result<Option<Session>, Box<dyn std::error::Error>> {
    match db.kv_get(SESSION_KEY)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn require_session(db: &Database) -> Result<Session, Box<dyn std::error::Error>> {
    load_session(db)?.ok_or_else(|| "no active timer session; run 'timer start' first".into())
}

fn save_session(db: &Database, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(session)?;
    db.kv_set(SESSION_KEY, &json)?;
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;

    match action {
        // Starting a session implicitly replaces any previous one.
        TimerAction::Start { minutes, subject } => {
            let snapped = config.timer.snap_minutes(minutes);
            if snapped == 0 {
                return Err(format!("duration {minutes}m snaps to zero; nothing to run").into());
            }
            let mut timer = CountdownTimer::new(subject);
            timer.set_alarm_mode(config.timer.alarm_mode);
            if let Some(event) = timer.start(u64::from(snapped) * 60 * 1000) {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            save_session(&db, &Session::Countdown(timer))?;
        }
        TimerAction::Pomodoro { subject } => {
            let mut timer = PomodoroTimer::with_durations(config.focus_ms(), config.break_ms(), subject);
            timer.set_alarm_mode(config.timer.alarm_mode);
            if let Some(event) = timer.start() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            save_session(&db, &Session::Pomodoro(timer))?;
        }
        TimerAction::Pause => {
            let mut session = require_session(&db)?;
            if let Some(event) = session.pause() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            save_session(&db, &session)?;
        }
        TimerAction::Resume => {
            let mut session = require_session(&db)?;
            if let Some(event) = session.resume() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            save_session(&db, &session)?;
        }
        TimerAction::Tick { seconds } => {
            let mut session = require_session(&db)?;
            for _ in 0..seconds {
                if let Some(event) = session.tick() {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                    break;
                }
            }
            save_session(&db, &session)?;
        }
        TimerAction::Status => {
            let session = require_session(&db)?;
            println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        }
        TimerAction::Alarm => {
            let mut session = require_session(&db)?;
            let event = session.cycle_alarm();
            println!("{}", serde_json::to_string_pretty(&event)?);
            save_session(&db, &session)?;
        }
        TimerAction::Reset => {
            let mut session = require_session(&db)?;
            if let Some(event) = session.reset() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            db.kv_delete(SESSION_KEY)?;
        }
        TimerAction::Continue => {
            let mut session = require_session(&db)?;
            if let Some(event) = session.keep_going() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            save_session(&db, &session)?;
        }
        TimerAction::Finish => {
            let session = require_session(&db)?;
            let subject_id = session.subject_id();
            let date = Local::now().date_naive();
            let elapsed = session.elapsed_to_commit() as i64;
            let written = if session.has_run() {
                db.upsert_study_time(subject_id, date, elapsed)?
            } else {
                false
            };
            if let (true, Some(sid)) = (written, subject_id) {
                let event = Event::StudyRecordCommitted {
                    subject_id: sid,
                    date,
                    study_time_ms: elapsed,
                    at: Utc::now(),
                };
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                let discarded = serde_json::json!({ "type": "session_discarded" });
                println!("{}", serde_json::to_string_pretty(&discarded)?);
            }
            db.kv_delete(SESSION_KEY)?;
        }
    }

    Ok(())
}
