//! Exam subjects and D-day labels.
//!
//! A subject is a tracked exam/topic with a difficulty rating, an importance
//! rating (both on a 1..=5 scale) and a target exam date. Exam dates carry no
//! time component; all comparisons against "today" use whole-day granularity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A registered exam subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub exam_date: NaiveDate,
    /// 1.0 ..= 5.0
    pub difficulty: f32,
    /// 1.0 ..= 5.0
    pub importance: f32,
    /// Packed ARGB display color.
    pub color: u32,
}

impl Subject {
    /// D-day label for this subject relative to `today`.
    pub fn d_day(&self, today: NaiveDate) -> DDay {
        DDay::between(today, self.exam_date)
    }

    /// Range checks shared with [`NewSubject::validate`]. Used on update.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, self.difficulty, self.importance)
    }
}

/// Payload for creating a subject. The id is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubject {
    pub name: String,
    pub exam_date: NaiveDate,
    pub difficulty: f32,
    pub importance: f32,
    pub color: u32,
}

impl NewSubject {
    /// # Errors
    /// Returns an error if the name is empty or a rating falls outside 1..=5.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, self.difficulty, self.importance)
    }
}

fn validate_fields(name: &str, difficulty: f32, importance: f32) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".into(),
            message: "subject name must not be empty".into(),
        });
    }
    if !(1.0..=5.0).contains(&difficulty) {
        return Err(ValidationError::RatingOutOfRange {
            field: "difficulty",
            value: difficulty,
        });
    }
    if !(1.0..=5.0).contains(&importance) {
        return Err(ValidationError::RatingOutOfRange {
            field: "importance",
            value: importance,
        });
    }
    Ok(())
}

/// Signed day-count label relative to today.
///
/// `D-n` for an exam `n` days ahead, `D-Day` on the day itself and `D+n`
/// once it has passed. The label is used by the recommendation list and,
/// without any filtering, by the subject-detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DDay {
    /// Exam is `n > 0` days in the future.
    Until { days: i64 },
    /// Exam is today.
    Today,
    /// Exam was `n > 0` days ago.
    Past { days: i64 },
}

impl DDay {
    /// Classify the whole-day distance from `today` to `exam_date`.
    pub fn between(today: NaiveDate, exam_date: NaiveDate) -> Self {
        let days = (exam_date - today).num_days();
        if days > 0 {
            DDay::Until { days }
        } else if days == 0 {
            DDay::Today
        } else {
            DDay::Past { days: -days }
        }
    }
}

impl std::fmt::Display for DDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DDay::Until { days } => write!(f, "D-{days}"),
            DDay::Today => write!(f, "D-Day"),
            DDay::Past { days } => write!(f, "D+{days}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn dday_labels() {
        let today = date("2024-05-10");
        assert_eq!(DDay::between(today, date("2024-05-13")).to_string(), "D-3");
        assert_eq!(DDay::between(today, date("2024-05-10")).to_string(), "D-Day");
        assert_eq!(DDay::between(today, date("2024-05-08")).to_string(), "D+2");
    }

    #[test]
    fn rejects_empty_name() {
        let s = NewSubject {
            name: "  ".into(),
            exam_date: date("2024-06-01"),
            difficulty: 3.0,
            importance: 3.0,
            color: 0xFF2196F3,
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let mut s = NewSubject {
            name: "Calculus".into(),
            exam_date: date("2024-06-01"),
            difficulty: 5.5,
            importance: 3.0,
            color: 0,
        };
        assert!(s.validate().is_err());
        s.difficulty = 5.0;
        s.importance = 0.5;
        assert!(s.validate().is_err());
        s.importance = 1.0;
        assert!(s.validate().is_ok());
    }
}
