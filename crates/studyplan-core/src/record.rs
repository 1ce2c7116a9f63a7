//! Study records and per-day aggregation.
//!
//! One record holds the accumulated study duration for one subject on one
//! calendar day. The store guarantees at most one row per (subject, date)
//! pair via the upsert-merge write path; aggregation here still groups by
//! date so it stays correct over data written before that invariant held.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accumulated study duration for one subject on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    pub id: i64,
    /// `None` means the session was not linked to a subject. Such sessions
    /// are never persisted; the field exists for in-flight deltas.
    pub subject_id: Option<i64>,
    pub date: NaiveDate,
    pub study_time_ms: i64,
}

/// One row of the subject-detail view: total time studied on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub total_ms: i64,
}

/// Group records by date and sum durations, newest date first.
pub fn daily_totals(records: &[StudyRecord]) -> Vec<DailyRecord> {
    let mut by_date: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for r in records {
        *by_date.entry(r.date).or_insert(0) += r.study_time_ms;
    }
    by_date
        .into_iter()
        .rev()
        .map(|(date, total_ms)| DailyRecord { date, total_ms })
        .collect()
}

/// Accumulated study time across all records, in whole minutes.
pub fn total_minutes(records: &[StudyRecord]) -> i64 {
    records.iter().map(|r| r.study_time_ms).sum::<i64>() / 1000 / 60
}
