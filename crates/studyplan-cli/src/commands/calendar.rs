use chrono::{Local, NaiveDate};
use studyplan_core::calendar::{decorate_day, decorators, exam_markers, subjects_on};
use studyplan_core::storage::Database;

pub fn run(date: Option<NaiveDate>, day: Option<NaiveDate>) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let subjects = db.all_subjects()?;
    let today = date.unwrap_or_else(|| Local::now().date_naive());

    let output = match day {
        // Day-tap view: subjects examined that day plus the directives a
        // renderer would draw on it.
        Some(day) => {
            let decs = decorators(&subjects, today);
            serde_json::json!({
                "day": day,
                "subjects": subjects_on(&subjects, day),
                "directives": decorate_day(&decs, day),
            })
        }
        None => serde_json::json!({
            "today": today,
            "markers": exam_markers(&subjects),
        }),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
