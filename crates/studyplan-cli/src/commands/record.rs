use chrono::NaiveDate;
use clap::Subcommand;
use studyplan_core::record::{daily_totals, total_minutes};
use studyplan_core::storage::Database;

#[derive(Subcommand)]
pub enum RecordAction {
    /// Daily study totals for one subject, newest first
    List {
        /// Subject id
        subject: i64,
    },
    /// All records for one calendar day, across subjects
    Date { date: NaiveDate },
    /// Accumulated study time for one subject
    Stats {
        /// Subject id
        subject: i64,
    },
}

pub fn run(action: RecordAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        RecordAction::List { subject } => {
            let records = db.records_by_subject(subject)?;
            println!("{}", serde_json::to_string_pretty(&daily_totals(&records))?);
        }
        RecordAction::Date { date } => {
            let records = db.records_by_date(date)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        RecordAction::Stats { subject } => {
            let records = db.records_by_subject(subject)?;
            let stats = serde_json::json!({
                "subject_id": subject,
                "total_ms": db.total_study_time_ms(subject)?,
                "total_minutes": total_minutes(&records),
                "days_studied": daily_totals(&records).len(),
            });
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
