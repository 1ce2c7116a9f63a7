use chrono::{Local, NaiveDate};
use studyplan_core::recommend::recommend;
use studyplan_core::storage::Database;

pub fn run(date: Option<NaiveDate>) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let subjects = db.all_subjects()?;
    let today = date.unwrap_or_else(|| Local::now().date_naive());

    let rows: Vec<serde_json::Value> = recommend(&subjects, today)
        .iter()
        .enumerate()
        .map(|(i, r)| {
            serde_json::json!({
                "rank": i + 1,
                "subject_id": r.subject_id,
                "name": r.name,
                "difficulty": r.difficulty,
                "importance": r.importance,
                "exam_date": r.exam_date,
                "d_day": r.d_day.to_string(),
                "score": r.score,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
