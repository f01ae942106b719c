//! SQLite-backed interval storage.
//!
//! Durations are stored as whole milliseconds, timestamps as RFC 3339 text
//! and category/state as their string forms.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{data_dir, Repository};
use crate::error::{CoreError, DatabaseError, Result};
use crate::timer::{Category, Interval, IntervalState};

const SELECT_COLUMNS: &str =
    "SELECT id, start_time, planned_ms, actual_ms, category, state FROM interval";

/// SQLite database for interval storage.
///
/// The connection sits behind a mutex so one repository can be shared by
/// a runner and its callers.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Open the database at `~/.config/pomotrack/pomotrack.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_default() -> Result<Self> {
        Self::open(data_dir()?.join("pomotrack.db"))
    }

    /// Open or create the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened interval database");
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(2))?;
        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.migrate()?;
        Ok(repo)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn().execute_batch(
            "CREATE TABLE IF NOT EXISTS interval (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                start_time  TEXT NOT NULL,
                planned_ms  INTEGER NOT NULL,
                actual_ms   INTEGER NOT NULL DEFAULT 0,
                category    TEXT NOT NULL,
                state       TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_interval_category ON interval(category);",
        )?;
        Ok(())
    }
}

/// Raw column values, decoded outside the rusqlite row closure so decode
/// failures keep their own error type.
struct IntervalRow {
    id: i64,
    start_time: String,
    planned_ms: i64,
    actual_ms: i64,
    category: String,
    state: String,
}

impl IntervalRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            start_time: row.get(1)?,
            planned_ms: row.get(2)?,
            actual_ms: row.get(3)?,
            category: row.get(4)?,
            state: row.get(5)?,
        })
    }

    fn decode(self) -> Result<Interval> {
        let corrupt = |message: String| DatabaseError::Corrupt {
            id: self.id,
            message,
        };
        let start_time = DateTime::parse_from_rfc3339(&self.start_time)
            .map_err(|e| corrupt(e.to_string()))?
            .with_timezone(&Utc);
        let millis = |v: i64| {
            u64::try_from(v)
                .map(Duration::from_millis)
                .map_err(|_| corrupt(format!("negative duration {v}")))
        };
        Ok(Interval {
            id: self.id,
            start_time,
            planned_duration: millis(self.planned_ms)?,
            actual_duration: millis(self.actual_ms)?,
            category: self
                .category
                .parse::<Category>()
                .map_err(|e| corrupt(e.to_string()))?,
            state: self
                .state
                .parse::<IntervalState>()
                .map_err(|e| corrupt(e.to_string()))?,
        })
    }
}

fn to_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

impl Repository for SqliteRepository {
    fn create(&self, interval: &Interval) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO interval (start_time, planned_ms, actual_ms, category, state)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                interval.start_time.to_rfc3339(),
                to_millis(interval.planned_duration),
                to_millis(interval.actual_duration),
                interval.category.as_str(),
                interval.state.as_str(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, interval: &Interval) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE interval
             SET start_time = ?1, actual_ms = ?2, state = ?3
             WHERE id = ?4",
            params![
                interval.start_time.to_rfc3339(),
                to_millis(interval.actual_duration),
                interval.state.as_str(),
                interval.id,
            ],
        )?;
        if changed == 0 {
            return Err(CoreError::InvalidId(interval.id));
        }
        Ok(())
    }

    fn by_id(&self, id: i64) -> Result<Interval> {
        let row = self
            .conn()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                IntervalRow::read,
            )
            .optional()?;
        row.ok_or(CoreError::InvalidId(id))?.decode()
    }

    fn last(&self) -> Result<Interval> {
        let row = self
            .conn()
            .query_row(
                &format!("{SELECT_COLUMNS} ORDER BY id DESC LIMIT 1"),
                [],
                IntervalRow::read,
            )
            .optional()?;
        row.ok_or(CoreError::NoIntervals)?.decode()
    }

    fn breaks(&self, n: usize) -> Result<Vec<Interval>> {
        let rows = {
            let conn = self.conn();
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS}
                 WHERE category IN ('ShortBreak', 'LongBreak')
                 ORDER BY id DESC LIMIT ?1"
            ))?;
            let limit = i64::try_from(n).unwrap_or(i64::MAX);
            let rows = stmt
                .query_map(params![limit], IntervalRow::read)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };
        rows.into_iter().map(IntervalRow::decode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(category: Category) -> Interval {
        Interval::new(category, Duration::from_secs(90))
    }

    #[test]
    fn create_and_read_back() {
        let repo = SqliteRepository::open_memory().unwrap();
        let mut stored = interval(Category::LongBreak);
        stored.id = repo.create(&stored).unwrap();

        let read = repo.by_id(stored.id).unwrap();
        assert_eq!(read.category, Category::LongBreak);
        assert_eq!(read.planned_duration, Duration::from_secs(90));
        assert_eq!(read.state, IntervalState::NotStarted);
        assert_eq!(read.start_time.timestamp(), stored.start_time.timestamp());
    }

    #[test]
    fn update_keeps_category_and_plan() {
        let repo = SqliteRepository::open_memory().unwrap();
        let mut stored = interval(Category::Pomodoro);
        stored.id = repo.create(&stored).unwrap();

        stored.actual_duration = Duration::from_secs(12);
        stored.state = IntervalState::Running;
        stored.category = Category::ShortBreak;
        repo.update(&stored).unwrap();

        let read = repo.by_id(stored.id).unwrap();
        assert_eq!(read.actual_duration, Duration::from_secs(12));
        assert_eq!(read.state, IntervalState::Running);
        assert_eq!(read.category, Category::Pomodoro);
    }

    #[test]
    fn missing_rows() {
        let repo = SqliteRepository::open_memory().unwrap();
        assert!(matches!(repo.last(), Err(CoreError::NoIntervals)));
        assert!(matches!(repo.by_id(5), Err(CoreError::InvalidId(5))));
        let mut ghost = interval(Category::Pomodoro);
        ghost.id = 5;
        assert!(matches!(repo.update(&ghost), Err(CoreError::InvalidId(5))));
    }

    #[test]
    fn breaks_are_newest_first() {
        let repo = SqliteRepository::open_memory().unwrap();
        for c in [
            Category::ShortBreak,
            Category::Pomodoro,
            Category::LongBreak,
            Category::Pomodoro,
            Category::ShortBreak,
        ] {
            repo.create(&interval(c)).unwrap();
        }
        let breaks = repo.breaks(2).unwrap();
        let ids: Vec<i64> = breaks.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![5, 3]);
        assert_eq!(repo.breaks(10).unwrap().len(), 3);
    }

    #[test]
    fn unknown_state_is_reported_not_panicked() {
        let repo = SqliteRepository::open_memory().unwrap();
        let id = repo.create(&interval(Category::Pomodoro)).unwrap();
        repo.conn()
            .execute("UPDATE interval SET state = 'sleeping' WHERE id = ?1", params![id])
            .unwrap();
        assert!(matches!(
            repo.by_id(id),
            Err(CoreError::Database(DatabaseError::Corrupt { id: row, .. })) if row == id
        ));
    }

    #[test]
    fn unknown_category_is_a_corrupt_row() {
        let repo = SqliteRepository::open_memory().unwrap();
        let id = repo.create(&interval(Category::ShortBreak)).unwrap();
        repo.conn()
            .execute("UPDATE interval SET category = 'Nap' WHERE id = ?1", params![id])
            .unwrap();
        assert!(matches!(
            repo.last(),
            Err(CoreError::Database(DatabaseError::Corrupt { .. }))
        ));
        assert!(matches!(
            repo.breaks(3),
            Ok(ref rows) if rows.is_empty()
        ));
    }
}
