//! SQLite entity store.
//!
//! Consistency policy: habit logs, daily logs, notes and stats are written
//! with `INSERT ... ON CONFLICT DO UPDATE`. Concurrent writers for the same
//! key do not conflict; the last write wins.

use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{
    DailyLog, Habit, HabitLog, HabitStatus, Note, Priority, Stats, Subtask, Task,
};

/// Schema version stored in `PRAGMA user_version`
const SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Failed to encode subtasks: {0}")]
    EncodeError(#[from] serde_json::Error),
    #[error("Record has no id")]
    MissingId,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;

        let db = Database { conn };
        db.initialize_schema()?;

        Ok(db)
    }

    /// Open a private in-memory database (tests, dry runs)
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let db = Database {
            conn: Connection::open_in_memory()?,
        };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version >= SCHEMA_VERSION {
            return Ok(());
        }

        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS habits (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                emoji           TEXT NOT NULL DEFAULT '',
                category        TEXT NOT NULL DEFAULT '',
                target_count    INTEGER,
                status          TEXT,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS habit_logs (
                habit_id        INTEGER NOT NULL,
                date            TEXT NOT NULL,
                current_count   INTEGER NOT NULL DEFAULT 0,
                is_completed    INTEGER NOT NULL DEFAULT 0,
                updated_at      TEXT NOT NULL,
                PRIMARY KEY (habit_id, date)
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                is_completed    INTEGER NOT NULL DEFAULT 0,
                due_date        TEXT,
                priority        TEXT NOT NULL DEFAULT 'None',
                category        TEXT NOT NULL DEFAULT 'None',
                reminder        TEXT NOT NULL DEFAULT 'Not set',
                auto_postpone   INTEGER NOT NULL DEFAULT 0,
                subtasks        TEXT NOT NULL DEFAULT '[]',
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notes (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                date            TEXT NOT NULL UNIQUE,
                content         TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS daily_logs (
                date             TEXT PRIMARY KEY,
                completed_habits INTEGER NOT NULL DEFAULT 0,
                total_habits     INTEGER NOT NULL DEFAULT 0,
                completed_tasks  INTEGER NOT NULL DEFAULT 0,
                total_tasks      INTEGER NOT NULL DEFAULT 0,
                completion_rate  REAL NOT NULL DEFAULT 0,
                updated_at       TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS stats (
                user_key        TEXT PRIMARY KEY,
                streak          INTEGER NOT NULL DEFAULT 0,
                perfect_days    INTEGER NOT NULL DEFAULT 0,
                active_days     INTEGER NOT NULL DEFAULT 0,
                overall_rate    REAL NOT NULL DEFAULT 0,
                last_updated    TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_habit_logs_date ON habit_logs(date);
            CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date);",
        )?;

        self.conn
            .execute_batch(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))?;

        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // ---- habits ----

    fn row_to_habit(row: &rusqlite::Row) -> Result<Habit, rusqlite::Error> {
        let status: Option<String> = row.get(5)?;
        Ok(Habit {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            emoji: row.get(2)?,
            category: row.get(3)?,
            target_count: row.get(4)?,
            status: HabitStatus::from_db(status.as_deref()),
            created_at: row.get(6)?,
        })
    }

    /// Insert a habit and return its ID
    pub fn insert_habit(&self, habit: &Habit) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO habits (title, emoji, category, target_count, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                habit.title,
                habit.emoji,
                habit.category,
                habit.target_count,
                habit.status.as_str(),
                habit.created_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get all habits in creation order
    pub fn get_all_habits(&self) -> Result<Vec<Habit>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, emoji, category, target_count, status, created_at
             FROM habits ORDER BY id ASC",
        )?;
        let habits = stmt
            .query_map([], Self::row_to_habit)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    pub fn get_habit(&self, id: i64) -> Result<Option<Habit>, DatabaseError> {
        let result = self.conn.query_row(
            "SELECT id, title, emoji, category, target_count, status, created_at
             FROM habits WHERE id = ?1",
            rusqlite::params![id],
            Self::row_to_habit,
        );

        match result {
            Ok(habit) => Ok(Some(habit)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// Update the definition fields of an existing habit
    pub fn update_habit(&self, habit: &Habit) -> Result<(), DatabaseError> {
        let id = habit.id.ok_or(DatabaseError::MissingId)?;
        self.conn.execute(
            "UPDATE habits SET title = ?1, emoji = ?2, category = ?3,
             target_count = ?4, status = ?5 WHERE id = ?6",
            rusqlite::params![
                habit.title,
                habit.emoji,
                habit.category,
                habit.target_count,
                habit.status.as_str(),
                id
            ],
        )?;
        Ok(())
    }

    /// Delete a habit together with its logs. Returns false if no habit had that ID.
    pub fn delete_habit(&self, id: i64) -> Result<bool, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM habit_logs WHERE habit_id = ?1",
            rusqlite::params![id],
        )?;
        let deleted = tx.execute("DELETE FROM habits WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    // ---- habit logs ----

    fn row_to_habit_log(row: &rusqlite::Row) -> Result<HabitLog, rusqlite::Error> {
        Ok(HabitLog {
            habit_id: row.get(0)?,
            date: row.get(1)?,
            current_count: row.get(2)?,
            is_completed: row.get::<_, i64>(3)? != 0,
            updated_at: row.get(4)?,
        })
    }

    pub fn get_habit_log(
        &self,
        habit_id: i64,
        date: &str,
    ) -> Result<Option<HabitLog>, DatabaseError> {
        let result = self.conn.query_row(
            "SELECT habit_id, date, current_count, is_completed, updated_at
             FROM habit_logs WHERE habit_id = ?1 AND date = ?2",
            rusqlite::params![habit_id, date],
            Self::row_to_habit_log,
        );

        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// All habit logs written for one date
    pub fn get_habit_logs_for_date(&self, date: &str) -> Result<Vec<HabitLog>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id, date, current_count, is_completed, updated_at
             FROM habit_logs WHERE date = ?1",
        )?;
        let logs = stmt
            .query_map(rusqlite::params![date], Self::row_to_habit_log)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// All logs of one habit, oldest first
    pub fn get_habit_logs_for_habit(&self, habit_id: i64) -> Result<Vec<HabitLog>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id, date, current_count, is_completed, updated_at
             FROM habit_logs WHERE habit_id = ?1 ORDER BY date ASC",
        )?;
        let logs = stmt
            .query_map(rusqlite::params![habit_id], Self::row_to_habit_log)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Insert or overwrite the log keyed by (habit, date)
    pub fn upsert_habit_log(&self, log: &HabitLog) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO habit_logs (habit_id, date, current_count, is_completed, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(habit_id, date) DO UPDATE SET
                current_count = excluded.current_count,
                is_completed = excluded.is_completed,
                updated_at = excluded.updated_at",
            rusqlite::params![
                log.habit_id,
                log.date,
                log.current_count,
                if log.is_completed { 1 } else { 0 },
                log.updated_at
            ],
        )?;
        Ok(())
    }

    // ---- tasks ----

    fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
        let priority: String = row.get(4)?;
        let subtasks: String = row.get(8)?;
        let subtasks: Vec<Subtask> = serde_json::from_str(&subtasks).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Task {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            is_completed: row.get::<_, i64>(2)? != 0,
            due_date: row.get(3)?,
            priority: Priority::from_db(&priority),
            category: row.get(5)?,
            reminder: row.get(6)?,
            auto_postpone: row.get::<_, i64>(7)? != 0,
            subtasks,
            created_at: row.get(9)?,
        })
    }

    /// Insert a task into the database and return its ID
    pub fn insert_task(&self, task: &Task) -> Result<i64, DatabaseError> {
        let subtasks = serde_json::to_string(&task.subtasks)?;
        self.conn.execute(
            "INSERT INTO tasks (title, is_completed, due_date, priority, category, reminder,
                                auto_postpone, subtasks, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                task.title,
                if task.is_completed { 1 } else { 0 },
                task.due_date,
                task.priority.as_str(),
                task.category,
                task.reminder,
                if task.auto_postpone { 1 } else { 0 },
                subtasks,
                task.created_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get all tasks ordered by due date (undated last), then creation
    pub fn get_all_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, is_completed, due_date, priority, category, reminder,
                    auto_postpone, subtasks, created_at
             FROM tasks ORDER BY due_date IS NULL, due_date ASC, id ASC",
        )?;
        let tasks = stmt
            .query_map([], Self::row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>, DatabaseError> {
        let result = self.conn.query_row(
            "SELECT id, title, is_completed, due_date, priority, category, reminder,
                    auto_postpone, subtasks, created_at
             FROM tasks WHERE id = ?1",
            rusqlite::params![id],
            Self::row_to_task,
        );

        match result {
            Ok(task) => Ok(Some(task)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// Update an existing task
    pub fn update_task(&self, task: &Task) -> Result<(), DatabaseError> {
        let id = task.id.ok_or(DatabaseError::MissingId)?;
        let subtasks = serde_json::to_string(&task.subtasks)?;
        self.conn.execute(
            "UPDATE tasks SET title = ?1, is_completed = ?2, due_date = ?3, priority = ?4,
             category = ?5, reminder = ?6, auto_postpone = ?7, subtasks = ?8 WHERE id = ?9",
            rusqlite::params![
                task.title,
                if task.is_completed { 1 } else { 0 },
                task.due_date,
                task.priority.as_str(),
                task.category,
                task.reminder,
                if task.auto_postpone { 1 } else { 0 },
                subtasks,
                id
            ],
        )?;
        Ok(())
    }

    /// Delete a task by ID. Returns false if no task had that ID.
    pub fn delete_task(&self, id: i64) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", rusqlite::params![id])?;
        Ok(deleted > 0)
    }

    /// Move incomplete auto-postpone tasks due before `today` to `today`.
    /// Returns the number of tasks moved.
    pub fn postpone_overdue_tasks(&self, today: &str) -> Result<usize, DatabaseError> {
        let moved = self.conn.execute(
            "UPDATE tasks SET due_date = ?1
             WHERE auto_postpone = 1 AND is_completed = 0
               AND due_date IS NOT NULL AND due_date < ?1",
            rusqlite::params![today],
        )?;
        Ok(moved)
    }

    // ---- notes ----

    fn row_to_note(row: &rusqlite::Row) -> Result<Note, rusqlite::Error> {
        Ok(Note {
            id: Some(row.get(0)?),
            date: row.get(1)?,
            content: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }

    /// Get all notes ordered by date
    pub fn get_all_notes(&self) -> Result<Vec<Note>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, date, content, updated_at FROM notes ORDER BY date ASC")?;
        let notes = stmt
            .query_map([], Self::row_to_note)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    pub fn get_note_by_date(&self, date: &str) -> Result<Option<Note>, DatabaseError> {
        let result = self.conn.query_row(
            "SELECT id, date, content, updated_at FROM notes WHERE date = ?1",
            rusqlite::params![date],
            Self::row_to_note,
        );

        match result {
            Ok(note) => Ok(Some(note)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// Insert or overwrite the note for its date, returning the stored row
    pub fn upsert_note(&self, note: &Note) -> Result<Note, DatabaseError> {
        self.conn.execute(
            "INSERT INTO notes (date, content, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET
                content = excluded.content,
                updated_at = excluded.updated_at",
            rusqlite::params![note.date, note.content, note.updated_at],
        )?;
        self.get_note_by_date(&note.date)?
            .ok_or(DatabaseError::SqliteError(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Delete the note of a date. Returns false if there was none.
    pub fn delete_note_by_date(&self, date: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM notes WHERE date = ?1", rusqlite::params![date])?;
        Ok(deleted > 0)
    }

    // ---- daily logs ----

    fn row_to_daily_log(row: &rusqlite::Row) -> Result<DailyLog, rusqlite::Error> {
        Ok(DailyLog {
            date: row.get(0)?,
            completed_habits: row.get(1)?,
            total_habits: row.get(2)?,
            completed_tasks: row.get(3)?,
            total_tasks: row.get(4)?,
            completion_rate: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    /// Insert or overwrite the rollup for its date
    pub fn upsert_daily_log(&self, log: &DailyLog) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO daily_logs (date, completed_habits, total_habits, completed_tasks,
                                     total_tasks, completion_rate, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(date) DO UPDATE SET
                completed_habits = excluded.completed_habits,
                total_habits = excluded.total_habits,
                completed_tasks = excluded.completed_tasks,
                total_tasks = excluded.total_tasks,
                completion_rate = excluded.completion_rate,
                updated_at = excluded.updated_at",
            rusqlite::params![
                log.date,
                log.completed_habits,
                log.total_habits,
                log.completed_tasks,
                log.total_tasks,
                log.completion_rate,
                log.updated_at
            ],
        )?;
        Ok(())
    }

    pub fn get_daily_log(&self, date: &str) -> Result<Option<DailyLog>, DatabaseError> {
        let result = self.conn.query_row(
            "SELECT date, completed_habits, total_habits, completed_tasks, total_tasks,
                    completion_rate, updated_at
             FROM daily_logs WHERE date = ?1",
            rusqlite::params![date],
            Self::row_to_daily_log,
        );

        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// All rollups ordered by date ascending
    pub fn get_all_daily_logs(&self) -> Result<Vec<DailyLog>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, completed_habits, total_habits, completed_tasks, total_tasks,
                    completion_rate, updated_at
             FROM daily_logs ORDER BY date ASC",
        )?;
        let logs = stmt
            .query_map([], Self::row_to_daily_log)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    // ---- stats ----

    pub fn upsert_stats(&self, stats: &Stats) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO stats (user_key, streak, perfect_days, active_days, overall_rate, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_key) DO UPDATE SET
                streak = excluded.streak,
                perfect_days = excluded.perfect_days,
                active_days = excluded.active_days,
                overall_rate = excluded.overall_rate,
                last_updated = excluded.last_updated",
            rusqlite::params![
                stats.user_key,
                stats.streak,
                stats.perfect_days,
                stats.active_days,
                stats.overall_rate,
                stats.last_updated
            ],
        )?;
        Ok(())
    }

    pub fn get_stats(&self, user_key: &str) -> Result<Option<Stats>, DatabaseError> {
        let result = self.conn.query_row(
            "SELECT user_key, streak, perfect_days, active_days, overall_rate, last_updated
             FROM stats WHERE user_key = ?1",
            rusqlite::params![user_key],
            |row| {
                Ok(Stats {
                    user_key: row.get(0)?,
                    streak: row.get(1)?,
                    perfect_days: row.get(2)?,
                    active_days: row.get(3)?,
                    overall_rate: row.get(4)?,
                    last_updated: row.get(5)?,
                })
            },
        );

        match result {
            Ok(stats) => Ok(Some(stats)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(habit_id: i64, date: &str, count: u32, done: bool) -> HabitLog {
        HabitLog {
            habit_id,
            date: date.to_string(),
            current_count: count,
            is_completed: done,
            updated_at: "2024-01-15T08:00:00Z".to_string(),
        }
    }

    #[test]
    fn habit_round_trip_keeps_boolean_target() {
        let db = Database::open_in_memory().unwrap();
        let mut habit = Habit::new("Meditate".to_string());
        habit.target_count = None;
        let id = db.insert_habit(&habit).unwrap();

        let stored = db.get_habit(id).unwrap().unwrap();
        assert_eq!(stored.target_count, None);
        assert_eq!(stored.status, HabitStatus::Active);
        assert!(db.get_habit(id + 1).unwrap().is_none());
    }

    #[test]
    fn null_status_reads_as_active() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO habits (title, created_at) VALUES ('Legacy', '2023-01-01T00:00:00Z')",
                [],
            )
            .unwrap();
        let habits = db.get_all_habits().unwrap();
        assert_eq!(habits.len(), 1);
        assert!(habits[0].is_active());
        assert_eq!(habits[0].emoji, "");
    }

    #[test]
    fn habit_log_upsert_overwrites() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_habit(&Habit::new("Water".to_string())).unwrap();

        db.upsert_habit_log(&log(id, "2024-01-15", 1, false)).unwrap();
        db.upsert_habit_log(&log(id, "2024-01-15", 3, true)).unwrap();

        let logs = db.get_habit_logs_for_habit(id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].current_count, 3);
        assert!(logs[0].is_completed);
    }

    #[test]
    fn delete_habit_removes_its_logs() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_habit(&Habit::new("Read".to_string())).unwrap();
        db.upsert_habit_log(&log(id, "2024-01-14", 1, true)).unwrap();
        db.upsert_habit_log(&log(id, "2024-01-15", 1, true)).unwrap();

        assert!(db.delete_habit(id).unwrap());
        assert!(db.get_habit_logs_for_habit(id).unwrap().is_empty());
        assert!(!db.delete_habit(id).unwrap());
    }

    #[test]
    fn task_subtasks_survive_storage() {
        let db = Database::open_in_memory().unwrap();
        let mut task = Task::new("Pack".to_string());
        task.priority = Priority::High;
        task.subtasks = vec![
            Subtask { title: "Shirts".to_string(), is_completed: true },
            Subtask { title: "Charger".to_string(), is_completed: false },
        ];
        let id = db.insert_task(&task).unwrap();

        let stored = db.get_task(id).unwrap().unwrap();
        assert_eq!(stored.priority, Priority::High);
        assert_eq!(stored.subtasks, task.subtasks);
        assert_eq!(stored.reminder, "Not set");
    }

    #[test]
    fn postpone_only_moves_flagged_overdue_tasks() {
        let db = Database::open_in_memory().unwrap();

        let mut flagged = Task::new("Flagged".to_string());
        flagged.due_date = Some("2024-01-10".to_string());
        flagged.auto_postpone = true;
        let flagged_id = db.insert_task(&flagged).unwrap();

        let mut done = flagged.clone();
        done.title = "Done".to_string();
        done.is_completed = true;
        let done_id = db.insert_task(&done).unwrap();

        let mut unflagged = Task::new("Unflagged".to_string());
        unflagged.due_date = Some("2024-01-10".to_string());
        let unflagged_id = db.insert_task(&unflagged).unwrap();

        assert_eq!(db.postpone_overdue_tasks("2024-01-15").unwrap(), 1);
        let due = |id| db.get_task(id).unwrap().unwrap().due_date;
        assert_eq!(due(flagged_id).as_deref(), Some("2024-01-15"));
        assert_eq!(due(done_id).as_deref(), Some("2024-01-10"));
        assert_eq!(due(unflagged_id).as_deref(), Some("2024-01-10"));
    }

    #[test]
    fn note_is_unique_per_date() {
        let db = Database::open_in_memory().unwrap();
        let first = db
            .upsert_note(&Note::new("2024-01-15".to_string(), "draft".to_string()))
            .unwrap();
        let second = db
            .upsert_note(&Note::new("2024-01-15".to_string(), "final".to_string()))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(db.get_all_notes().unwrap().len(), 1);
        assert_eq!(db.get_note_by_date("2024-01-15").unwrap().unwrap().content, "final");
        assert!(db.delete_note_by_date("2024-01-15").unwrap());
        assert!(!db.delete_note_by_date("2024-01-15").unwrap());
    }

    #[test]
    fn reopening_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("app.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new(path).unwrap();
            db.insert_habit(&Habit::new("Walk".to_string())).unwrap();
        }
        let db = Database::new(path).unwrap();
        assert_eq!(db.get_all_habits().unwrap().len(), 1);
    }
}
