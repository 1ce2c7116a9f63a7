use chrono::{Local, NaiveDate};
use clap::Subcommand;
use studyplan_core::record::{daily_totals, total_minutes};
use studyplan_core::storage::Database;
use studyplan_core::subject::NewSubject;

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Register a new exam subject
    Add {
        /// Subject name
        name: String,
        /// Exam date (YYYY-MM-DD)
        #[arg(long)]
        exam_date: NaiveDate,
        /// Difficulty rating, 1.0 to 5.0
        #[arg(long)]
        difficulty: f32,
        /// Importance rating, 1.0 to 5.0
        #[arg(long)]
        importance: f32,
        /// Display color as hex RGB, e.g. "#3F51B5"
        #[arg(long, default_value = "#3F51B5")]
        color: String,
    },
    /// List all subjects ordered by exam date
    List,
    /// Show one subject with its D-day and study history
    Show { id: i64 },
    /// Update fields of an existing subject
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        exam_date: Option<NaiveDate>,
        #[arg(long)]
        difficulty: Option<f32>,
        #[arg(long)]
        importance: Option<f32>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a subject; its study records are kept
    Delete { id: i64 },
}

/// Parse "#RRGGBB" (or "#AARRGGBB") into a packed ARGB value.
fn parse_color(raw: &str) -> Result<u32, Box<dyn std::error::Error>> {
    let hex = raw.trim_start_matches('#');
    if hex.len() != 6 && hex.len() != 8 {
        return Err(format!("invalid color {raw:?}: expected #RRGGBB or #AARRGGBB").into());
    }
    let value = u32::from_str_radix(hex, 16)
        .map_err(|e| format!("invalid color {raw:?}: {e}"))?;
    if hex.len() == 6 {
        // No alpha given: fully opaque.
        Ok(0xFF00_0000 | value)
    } else {
        Ok(value)
    }
}

pub fn run(action: SubjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SubjectAction::Add {
            name,
            exam_date,
            difficulty,
            importance,
            color,
        } => {
            let new = NewSubject {
                name,
                exam_date,
                difficulty,
                importance,
                color: parse_color(&color)?,
            };
            let id = db.insert_subject(&new)?;
            let subject = db.require_subject(id)?;
            println!("{}", serde_json::to_string_pretty(&subject)?);
        }
        SubjectAction::List => {
            let subjects = db.all_subjects()?;
            println!("{}", serde_json::to_string_pretty(&subjects)?);
        }
        SubjectAction::Show { id } => {
            let subject = db.require_subject(id)?;
            let today = Local::now().date_naive();
            let records = db.records_by_subject(id)?;
            let detail = serde_json::json!({
                "subject": subject,
                "d_day": subject.d_day(today).to_string(),
                "daily_records": daily_totals(&records),
                "total_minutes": total_minutes(&records),
            });
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        SubjectAction::Update {
            id,
            name,
            exam_date,
            difficulty,
            importance,
            color,
        } => {
            let mut subject = db.require_subject(id)?;
            if let Some(name) = name {
                subject.name = name;
            }
            if let Some(exam_date) = exam_date {
                subject.exam_date = exam_date;
            }
            if let Some(difficulty) = difficulty {
                subject.difficulty = difficulty;
            }
            if let Some(importance) = importance {
                subject.importance = importance;
            }
            if let Some(color) = color {
                subject.color = parse_color(&color)?;
            }
            db.update_subject(&subject)?;
            println!("{}", serde_json::to_string_pretty(&subject)?);
        }
        SubjectAction::Delete { id } => {
            db.delete_subject(id)?;
            let deleted = serde_json::json!({ "deleted": id });
            println!("{}", serde_json::to_string_pretty(&deleted)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_color;

    #[test]
    fn six_digit_hex_gets_opaque_alpha() {
        assert_eq!(parse_color("#3F51B5").unwrap(), 0xFF3F_51B5);
        assert_eq!(parse_color("3F51B5").unwrap(), 0xFF3F_51B5);
    }

    #[test]
    fn eight_digit_hex_keeps_alpha() {
        assert_eq!(parse_color("#803F51B5").unwrap(), 0x803F_51B5);
    }

    #[test]
    fn bad_input_is_rejected() {
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#GGGGGG").is_err());
    }
}
