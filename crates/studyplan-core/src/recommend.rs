//! Recommendation engine: which subject to study today.
//!
//! Each retained subject gets a priority from its ratings and a score that
//! divides that priority by the days left until the exam:
//!
//! ```text
//! days_remaining = max(1, days_between(today, exam_date))
//! priority       = difficulty * 0.4 + importance * 0.6
//! score          = priority / days_remaining
//! ```
//!
//! Subjects whose exam date is strictly before today are excluded; an exam
//! happening today is retained with `days_remaining` clamped to 1. Ties keep
//! the store's ordering (exam date ascending).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::subject::{DDay, Subject};

pub const DIFFICULTY_WEIGHT: f64 = 0.4;
pub const IMPORTANCE_WEIGHT: f64 = 0.6;

/// One row of the ranked recommendation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub subject_id: i64,
    pub name: String,
    pub difficulty: f32,
    pub importance: f32,
    pub exam_date: NaiveDate,
    pub days_remaining: i64,
    pub d_day: DDay,
    pub score: f64,
}

/// Weighted priority of a subject, independent of the exam date.
pub fn priority(difficulty: f64, importance: f64) -> f64 {
    difficulty * DIFFICULTY_WEIGHT + importance * IMPORTANCE_WEIGHT
}

/// Priority divided by clamped days remaining.
pub fn score(difficulty: f64, importance: f64, days_remaining: i64) -> f64 {
    priority(difficulty, importance) / days_remaining.max(1) as f64
}

/// Rank `subjects` for study on `today`, highest score first.
///
/// The sort is stable, so equal scores keep their input order.
pub fn recommend(subjects: &[Subject], today: NaiveDate) -> Vec<Recommendation> {
    let mut items: Vec<Recommendation> = subjects
        .iter()
        .filter(|s| s.exam_date >= today)
        .map(|s| {
            let days_remaining = (s.exam_date - today).num_days().max(1);
            Recommendation {
                subject_id: s.id,
                name: s.name.clone(),
                difficulty: s.difficulty,
                importance: s.importance,
                exam_date: s.exam_date,
                days_remaining,
                d_day: s.d_day(today),
                score: score(s.difficulty as f64, s.importance as f64, days_remaining),
            }
        })
        .collect();
    items.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn subject(id: i64, name: &str, exam_date: NaiveDate, difficulty: f32, importance: f32) -> Subject {
        Subject {
            id,
            name: name.into(),
            exam_date,
            difficulty,
            importance,
            color: 0,
        }
    }

    #[test]
    fn urgent_easy_subject_outranks_distant_hard_one() {
        let today = date("2024-05-10");
        let a = subject(1, "A", today + chrono::Duration::days(5), 3.0, 5.0);
        let b = subject(2, "B", today + chrono::Duration::days(1), 5.0, 2.0);
        let ranked = recommend(&[a, b], today);
        assert_eq!(ranked[0].name, "B");
        assert!((ranked[0].score - 3.2).abs() < 1e-9);
        assert!((ranked[1].score - 0.84).abs() < 1e-9);
    }

    #[test]
    fn past_exams_are_excluded_today_is_kept() {
        let today = date("2024-05-10");
        let past = subject(1, "past", date("2024-05-09"), 5.0, 5.0);
        let exam_today = subject(2, "today", today, 2.0, 2.0);
        let ranked = recommend(&[past, exam_today], today);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "today");
        assert_eq!(ranked[0].days_remaining, 1);
        assert_eq!(ranked[0].d_day, DDay::Today);
    }

    #[test]
    fn ties_keep_input_order() {
        let today = date("2024-05-10");
        let x = subject(1, "x", today + chrono::Duration::days(2), 3.0, 3.0);
        let y = subject(2, "y", today + chrono::Duration::days(2), 3.0, 3.0);
        let ranked = recommend(&[x, y], today);
        assert_eq!(ranked[0].name, "x");
        assert_eq!(ranked[1].name, "y");
    }

    proptest! {
        #[test]
        fn score_decreases_as_exam_moves_away(
            d in 1.0f64..=5.0,
            i in 1.0f64..=5.0,
            n in 1i64..365,
        ) {
            prop_assert!(score(d, i, n) > score(d, i, n + 1));
        }

        #[test]
        fn score_increases_with_difficulty(
            d in 1.0f64..4.0,
            delta in 0.1f64..1.0,
            i in 1.0f64..=5.0,
            n in 1i64..365,
        ) {
            prop_assert!(score(d + delta, i, n) > score(d, i, n));
        }

        #[test]
        fn score_increases_with_importance(
            d in 1.0f64..=5.0,
            i in 1.0f64..4.0,
            delta in 0.1f64..1.0,
            n in 1i64..365,
        ) {
            prop_assert!(score(d, i + delta, n) > score(d, i, n));
        }

        #[test]
        fn score_matches_formula(
            d in 1.0f64..=5.0,
            i in 1.0f64..=5.0,
            n in 1i64..365,
        ) {
            let expected = (0.4 * d + 0.6 * i) / n as f64;
            prop_assert!((score(d, i, n) - expected).abs() < 1e-12);
        }
    }
}
