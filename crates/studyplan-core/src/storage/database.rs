//! SQLite-based subject and study-record storage.
//!
//! Two domain tables plus a key-value store used by the CLI to carry timer
//! sessions across invocations. The study-record table has exactly one write
//! path: [`Database::upsert_study_time`], which merges a new duration onto
//! any existing row for the same (subject, date) pair.

use chrono::NaiveDate;
use indoc::indoc;
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::record::StudyRecord;
use crate::subject::{NewSubject, Subject};

fn date_str(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(idx: usize, s: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_subject(row: &rusqlite::Row) -> Result<Subject, rusqlite::Error> {
    let date: String = row.get(2)?;
    Ok(Subject {
        id: row.get(0)?,
        name: row.get(1)?,
        exam_date: parse_date(2, &date)?,
        difficulty: row.get::<_, f64>(3)? as f32,
        importance: row.get::<_, f64>(4)? as f32,
        color: row.get::<_, i64>(5)? as u32,
    })
}

fn row_to_record(row: &rusqlite::Row) -> Result<StudyRecord, rusqlite::Error> {
    let date: String = row.get(2)?;
    Ok(StudyRecord {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        date: parse_date(2, &date)?,
        study_time_ms: row.get(3)?,
    })
}

/// SQLite database for subjects and study records.
///
/// One long-lived instance is constructed at process start and injected into
/// every component that needs it.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/studyplan.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("studyplan.db");
        let conn =
            Connection::open(&path).map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        log::debug!("running database migrations");
        self.conn
            .execute_batch(indoc! {"
                CREATE TABLE IF NOT EXISTS subjects (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    name        TEXT NOT NULL,
                    exam_date   TEXT NOT NULL,
                    difficulty  REAL NOT NULL,
                    importance  REAL NOT NULL,
                    color       INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS study_record (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    subject_id  INTEGER,
                    date        TEXT NOT NULL,
                    study_time  INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_subjects_exam_date
                    ON subjects(exam_date);
                CREATE INDEX IF NOT EXISTS idx_study_record_subject_date
                    ON study_record(subject_id, date);
            "})
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    // ── Subjects ─────────────────────────────────────────────────────

    /// Insert a new subject after validating it. Returns the assigned id.
    pub fn insert_subject(&self, subject: &NewSubject) -> Result<i64, CoreError> {
        subject.validate()?;
        self.conn
            .execute(
                "INSERT INTO subjects (name, exam_date, difficulty, importance, color)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    subject.name,
                    date_str(subject.exam_date),
                    subject.difficulty as f64,
                    subject.importance as f64,
                    subject.color as i64,
                ],
            )
            .map_err(DatabaseError::from)?;
        let id = self.conn.last_insert_rowid();
        log::debug!("inserted subject {id} ({})", subject.name);
        Ok(id)
    }

    /// All subjects ordered by exam date ascending.
    pub fn all_subjects(&self) -> Result<Vec<Subject>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, exam_date, difficulty, importance, color
             FROM subjects ORDER BY exam_date ASC",
        )?;
        let rows = stmt.query_map([], row_to_subject)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn subject_by_id(&self, id: i64) -> Result<Option<Subject>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, exam_date, difficulty, importance, color
             FROM subjects WHERE id = ?1 LIMIT 1",
        )?;
        Ok(stmt.query_row(params![id], row_to_subject).optional()?)
    }

    /// Like [`subject_by_id`](Self::subject_by_id), but a missing row is an
    /// error (the detail path exits on a dangling reference).
    pub fn require_subject(&self, id: i64) -> Result<Subject, DatabaseError> {
        self.subject_by_id(id)?.ok_or(DatabaseError::NotFound {
            entity: "subject",
            id,
        })
    }

    pub fn update_subject(&self, subject: &Subject) -> Result<(), CoreError> {
        subject.validate()?;
        let changed = self
            .conn
            .execute(
                "UPDATE subjects
                 SET name = ?1, exam_date = ?2, difficulty = ?3, importance = ?4, color = ?5
                 WHERE id = ?6",
                params![
                    subject.name,
                    date_str(subject.exam_date),
                    subject.difficulty as f64,
                    subject.importance as f64,
                    subject.color as i64,
                    subject.id,
                ],
            )
            .map_err(DatabaseError::from)?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "subject",
                id: subject.id,
            }
            .into());
        }
        Ok(())
    }

    /// Delete a subject. Study records referencing it are left in place;
    /// they become unreferenced rather than being cascaded away.
    pub fn delete_subject(&self, id: i64) -> Result<(), DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM subjects WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "subject",
                id,
            });
        }
        log::debug!("deleted subject {id}");
        Ok(())
    }

    // ── Study records ────────────────────────────────────────────────

    /// Merge a study duration into the record for (subject, date).
    ///
    /// Inserts a fresh row if none exists, otherwise adds the delta onto the
    /// existing duration. Sessions without a subject are skipped entirely
    /// (returns `Ok(false)`), never stored with a null key.
    pub fn upsert_study_time(
        &self,
        subject_id: Option<i64>,
        date: NaiveDate,
        delta_ms: i64,
    ) -> Result<bool, DatabaseError> {
        let Some(sid) = subject_id else {
            log::debug!("study session has no subject, skipping persistence");
            return Ok(false);
        };
        let day = date_str(date);
        let existing: Option<(i64, i64)> = self
            .conn
            .query_row(
                "SELECT id, study_time FROM study_record
                 WHERE subject_id = ?1 AND date = ?2 LIMIT 1",
                params![sid, day],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match existing {
            Some((id, old_ms)) => {
                self.conn.execute(
                    "UPDATE study_record SET study_time = ?1 WHERE id = ?2",
                    params![old_ms + delta_ms, id],
                )?;
                log::debug!("merged {delta_ms}ms onto record {id} for subject {sid}");
            }
            None => {
                self.conn.execute(
                    "INSERT INTO study_record (subject_id, date, study_time)
                     VALUES (?1, ?2, ?3)",
                    params![sid, day, delta_ms],
                )?;
                log::debug!("created study record for subject {sid} on {day}");
            }
        }
        Ok(true)
    }

    /// All records for one subject, newest date first.
    pub fn records_by_subject(&self, subject_id: i64) -> Result<Vec<StudyRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subject_id, date, study_time
             FROM study_record WHERE subject_id = ?1 ORDER BY date DESC",
        )?;
        let rows = stmt.query_map(params![subject_id], row_to_record)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// All records written on one day.
    pub fn records_by_date(&self, date: NaiveDate) -> Result<Vec<StudyRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subject_id, date, study_time
             FROM study_record WHERE date = ?1",
        )?;
        let rows = stmt.query_map(params![date_str(date)], row_to_record)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Accumulated study time for a subject across all days, in ms.
    pub fn total_study_time_ms(&self, subject_id: i64) -> Result<i64, DatabaseError> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(study_time), 0) FROM study_record WHERE subject_id = ?1",
            params![subject_id],
            |row| row.get(0),
        )?)
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        Ok(stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn new_subject(name: &str, exam: &str) -> NewSubject {
        NewSubject {
            name: name.into(),
            exam_date: date(exam),
            difficulty: 3.0,
            importance: 4.0,
            color: 0xFF3F51B5,
        }
    }

    #[test]
    fn subject_roundtrip() {
        let db = Database::open_memory().unwrap();
        let id = db.insert_subject(&new_subject("Algebra", "2024-06-15")).unwrap();
        let loaded = db.require_subject(id).unwrap();
        assert_eq!(loaded.name, "Algebra");
        assert_eq!(loaded.exam_date, date("2024-06-15"));
        assert!((loaded.difficulty - 3.0).abs() < f32::EPSILON);
        assert_eq!(loaded.color, 0xFF3F51B5);
    }

    #[test]
    fn subjects_ordered_by_exam_date() {
        let db = Database::open_memory().unwrap();
        db.insert_subject(&new_subject("late", "2024-07-01")).unwrap();
        db.insert_subject(&new_subject("early", "2024-06-01")).unwrap();
        let all = db.all_subjects().unwrap();
        assert_eq!(all[0].name, "early");
        assert_eq!(all[1].name, "late");
    }

    #[test]
    fn insert_rejects_invalid_rating() {
        let db = Database::open_memory().unwrap();
        let mut s = new_subject("bad", "2024-06-01");
        s.importance = 9.0;
        assert!(db.insert_subject(&s).is_err());
        assert!(db.all_subjects().unwrap().is_empty());
    }

    #[test]
    fn update_missing_subject_is_not_found() {
        let db = Database::open_memory().unwrap();
        let ghost = Subject {
            id: 42,
            name: "ghost".into(),
            exam_date: date("2024-06-01"),
            difficulty: 2.0,
            importance: 2.0,
            color: 0,
        };
        assert!(matches!(
            db.update_subject(&ghost),
            Err(CoreError::Database(DatabaseError::NotFound { .. }))
        ));
    }

    #[test]
    fn upsert_merges_same_day_records() {
        let db = Database::open_memory().unwrap();
        let day = date("2024-05-01");
        assert!(db.upsert_study_time(Some(5), day, 600_000).unwrap());
        assert!(db.upsert_study_time(Some(5), day, 600_000).unwrap());

        let records = db.records_by_subject(5).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].study_time_ms, 1_200_000);
    }

    #[test]
    fn upsert_without_subject_is_skipped() {
        let db = Database::open_memory().unwrap();
        assert!(!db.upsert_study_time(None, date("2024-05-01"), 600_000).unwrap());
        assert!(db.records_by_date(date("2024-05-01")).unwrap().is_empty());
    }

    #[test]
    fn records_come_back_newest_first() {
        let db = Database::open_memory().unwrap();
        db.upsert_study_time(Some(1), date("2024-05-01"), 1000).unwrap();
        db.upsert_study_time(Some(1), date("2024-05-03"), 2000).unwrap();
        db.upsert_study_time(Some(1), date("2024-05-02"), 3000).unwrap();
        let records = db.records_by_subject(1).unwrap();
        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date("2024-05-03"), date("2024-05-02"), date("2024-05-01")]);
    }

    #[test]
    fn deleting_a_subject_leaves_its_records() {
        let db = Database::open_memory().unwrap();
        let id = db.insert_subject(&new_subject("History", "2024-06-01")).unwrap();
        db.upsert_study_time(Some(id), date("2024-05-01"), 600_000).unwrap();
        db.delete_subject(id).unwrap();

        assert!(db.subject_by_id(id).unwrap().is_none());
        // No cascade: the record survives as an unreferenced orphan.
        assert_eq!(db.records_by_subject(id).unwrap().len(), 1);
    }

    #[test]
    fn total_study_time_sums_across_days() {
        let db = Database::open_memory().unwrap();
        db.upsert_study_time(Some(9), date("2024-05-01"), 600_000).unwrap();
        db.upsert_study_time(Some(9), date("2024-05-02"), 900_000).unwrap();
        assert_eq!(db.total_study_time_ms(9).unwrap(), 1_500_000);
        assert_eq!(db.total_study_time_ms(100).unwrap(), 0);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("session").unwrap().is_none());
        db.kv_set("session", "hello").unwrap();
        assert_eq!(db.kv_get("session").unwrap().unwrap(), "hello");
        db.kv_delete("session").unwrap();
        assert!(db.kv_get("session").unwrap().is_none());
    }
}
