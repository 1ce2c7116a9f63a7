//! Reactive query results over the database.
//!
//! Callers register interest in a query shape and receive a fresh, full
//! result set after every mutating write that touches it. Datasets are small
//! (dozens of rows), so there are no partial or delta updates; every push
//! re-runs the query and hands over the complete list.

use chrono::NaiveDate;

use super::database::Database;
use crate::error::{CoreError, DatabaseError};
use crate::record::StudyRecord;
use crate::subject::{NewSubject, Subject};

type SubjectsCallback = Box<dyn Fn(&[Subject]) + Send>;
type RecordsCallback = Box<dyn Fn(&[StudyRecord]) + Send>;

/// A [`Database`] wrapper that pushes query results to subscribers.
///
/// All writes must go through this wrapper for subscribers to stay current;
/// reads can use the inner database directly via [`db`](Self::db).
pub struct WatchedStore {
    db: Database,
    subject_watchers: Vec<SubjectsCallback>,
    record_watchers: Vec<(i64, RecordsCallback)>,
}

impl WatchedStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            subject_watchers: Vec::new(),
            record_watchers: Vec::new(),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Watch "all subjects ordered by exam date ascending".
    ///
    /// The callback fires immediately with the current result set, then
    /// again after every subject write.
    pub fn watch_subjects(
        &mut self,
        callback: impl Fn(&[Subject]) + Send + 'static,
    ) -> Result<(), DatabaseError> {
        let current = self.db.all_subjects()?;
        callback(&current);
        self.subject_watchers.push(Box::new(callback));
        Ok(())
    }

    /// Watch "records for one subject ordered by date descending".
    pub fn watch_subject_records(
        &mut self,
        subject_id: i64,
        callback: impl Fn(&[StudyRecord]) + Send + 'static,
    ) -> Result<(), DatabaseError> {
        let current = self.db.records_by_subject(subject_id)?;
        callback(&current);
        self.record_watchers.push((subject_id, Box::new(callback)));
        Ok(())
    }

    // ── Writes (notify after commit) ─────────────────────────────────

    pub fn insert_subject(&self, subject: &NewSubject) -> Result<i64, CoreError> {
        let id = self.db.insert_subject(subject)?;
        self.notify_subjects()?;
        Ok(id)
    }

    pub fn update_subject(&self, subject: &Subject) -> Result<(), CoreError> {
        self.db.update_subject(subject)?;
        self.notify_subjects()?;
        Ok(())
    }

    pub fn delete_subject(&self, id: i64) -> Result<(), CoreError> {
        self.db.delete_subject(id)?;
        self.notify_subjects()?;
        Ok(())
    }

    /// Upsert-merge a study duration, then refresh record subscribers.
    pub fn commit_study_time(
        &self,
        subject_id: Option<i64>,
        date: NaiveDate,
        delta_ms: i64,
    ) -> Result<bool, CoreError> {
        let written = self.db.upsert_study_time(subject_id, date, delta_ms)?;
        if let (true, Some(sid)) = (written, subject_id) {
            self.notify_records(sid)?;
        }
        Ok(written)
    }

    fn notify_subjects(&self) -> Result<(), DatabaseError> {
        if self.subject_watchers.is_empty() {
            return Ok(());
        }
        let subjects = self.db.all_subjects()?;
        for watcher in &self.subject_watchers {
            watcher(&subjects);
        }
        Ok(())
    }

    fn notify_records(&self, subject_id: i64) -> Result<(), DatabaseError> {
        if !self.record_watchers.iter().any(|(id, _)| *id == subject_id) {
            return Ok(());
        }
        let records = self.db.records_by_subject(subject_id)?;
        for (watched_id, watcher) in &self.record_watchers {
            if *watched_id == subject_id {
                watcher(&records);
            }
        }
        Ok(())
    }
}
