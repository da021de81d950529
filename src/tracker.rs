//! Create/read/update/delete operations over habits, tasks and notes.
//!
//! Every mutation that can change a day's completion picture rolls that day
//! up afterwards, best effort. The rollup runs only once the primary write
//! has succeeded.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::database::{Database, DatabaseError};
use crate::models::{
    DailyLog, Habit, HabitLog, HabitProgress, HabitStatus, Note, Priority, StatsReport, Subtask,
    Task,
};
use crate::progress::{self, DayProgress, Direction, ProgressSummary};
use crate::rollup;
use crate::utils::{canonical_date, get_current_date_string, now_timestamp};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn default_target() -> Option<i64> {
    Some(1)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabit {
    pub title: String,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Absent defaults to 1; explicit `null` creates a boolean habit
    #[serde(default = "default_target")]
    pub target_count: Option<i64>,
    #[serde(default)]
    pub status: Option<HabitStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabit {
    pub title: Option<String>,
    pub emoji: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub target_count: Option<Option<i64>>,
    pub status: Option<HabitStatus>,
    pub current_count: Option<i64>,
    pub is_completed: Option<bool>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepHabit {
    #[serde(default)]
    pub direction: Direction,
    pub date: Option<String>,
}

/// Which habits a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitFilter {
    #[default]
    Active,
    Stopped,
    All,
}

impl HabitFilter {
    fn matches(&self, habit: &Habit) -> bool {
        match self {
            HabitFilter::Active => habit.is_active(),
            HabitFilter::Stopped => !habit.is_active(),
            HabitFilter::All => true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub reminder: Option<String>,
    #[serde(default)]
    pub auto_postpone: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub reminder: Option<String>,
    pub auto_postpone: Option<bool>,
    pub subtasks: Option<Vec<Subtask>>,
}

/// Task list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskFilter {
    /// Open tasks with a due date
    Upcoming,
    /// Open tasks without a due date
    NoDate,
    Completed,
}

impl TaskFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::Upcoming => !task.is_completed && task.due_date.is_some(),
            TaskFilter::NoDate => !task.is_completed && task.due_date.is_none(),
            TaskFilter::Completed => task.is_completed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNote {
    pub date: String,
    pub content: String,
}

/// Result of saving a note
#[derive(Debug, Clone)]
pub struct SavedNote {
    pub note: Note,
    pub created: bool,
}

fn require_title(title: &str, kind: &str) -> Result<String, TrackerError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TrackerError::Validation(format!("{} title is required", kind)));
    }
    Ok(title.to_string())
}

fn validate_target(target: Option<i64>) -> Result<Option<u32>, TrackerError> {
    match target {
        None => Ok(None),
        Some(value) if value >= 1 => u32::try_from(value)
            .map(Some)
            .map_err(|_| TrackerError::Validation(format!("targetCount {} is too large", value))),
        Some(value) => Err(TrackerError::Validation(format!(
            "targetCount must be at least 1, got {}",
            value
        ))),
    }
}

fn resolve_date(date: Option<&str>) -> Result<String, TrackerError> {
    match date {
        Some(raw) => canonical_date(raw)
            .map_err(|e| TrackerError::Validation(format!("Invalid date '{}': {}", raw, e))),
        None => Ok(get_current_date_string()),
    }
}

/// Front door to the entity store for one (implicit) user
pub struct Tracker {
    db: Database,
    user_key: String,
}

impl Tracker {
    pub fn new(db: Database, user_key: impl Into<String>) -> Self {
        Self {
            db,
            user_key: user_key.into(),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    fn roll_up(&self, date: &str) {
        rollup::recompute_best_effort(&self.db, &self.user_key, date);
    }

    fn load_habit(&self, id: i64) -> Result<Habit, TrackerError> {
        self.db
            .get_habit(id)?
            .ok_or_else(|| TrackerError::NotFound(format!("Habit {} not found", id)))
    }

    fn load_task(&self, id: i64) -> Result<Task, TrackerError> {
        self.db
            .get_task(id)?
            .ok_or_else(|| TrackerError::NotFound(format!("Task {} not found", id)))
    }

    fn day_progress(&self, habit_id: i64, date: &str) -> Result<DayProgress, TrackerError> {
        Ok(self
            .db
            .get_habit_log(habit_id, date)?
            .as_ref()
            .map(DayProgress::from)
            .unwrap_or_default())
    }

    fn write_progress(
        &self,
        habit: Habit,
        date: &str,
        progress: DayProgress,
    ) -> Result<HabitProgress, TrackerError> {
        let habit_id = habit.id.ok_or(DatabaseError::MissingId)?;
        self.db.upsert_habit_log(&HabitLog {
            habit_id,
            date: date.to_string(),
            current_count: progress.current_count,
            is_completed: progress.is_completed,
            updated_at: now_timestamp(),
        })?;
        Ok(HabitProgress {
            habit,
            current_count: progress.current_count,
            is_completed: progress.is_completed,
        })
    }

    // ---- habits ----

    /// Habits merged with their progress on `date` (default today)
    pub fn list_habits(
        &self,
        date: Option<&str>,
        filter: HabitFilter,
    ) -> Result<Vec<HabitProgress>, TrackerError> {
        let date = resolve_date(date)?;
        let habits: Vec<Habit> = self
            .db
            .get_all_habits()?
            .into_iter()
            .filter(|habit| filter.matches(habit))
            .collect();
        let logs = self.db.get_habit_logs_for_date(&date)?;
        Ok(progress::merge(habits, &logs))
    }

    /// Tick-based progress of the active habits on `date`
    pub fn habit_summary(&self, date: Option<&str>) -> Result<ProgressSummary, TrackerError> {
        let merged = self.list_habits(date, HabitFilter::Active)?;
        Ok(progress::summarize(&merged))
    }

    pub fn create_habit(&self, request: CreateHabit) -> Result<Habit, TrackerError> {
        let mut habit = Habit::new(require_title(&request.title, "Habit")?);
        habit.target_count = validate_target(request.target_count)?;
        habit.emoji = request.emoji.unwrap_or_default();
        habit.category = request.category.unwrap_or_default();
        habit.status = request.status.unwrap_or_default();

        let id = self.db.insert_habit(&habit)?;
        habit.id = Some(id);
        tracing::info!(id, title = %habit.title, "habit created");

        self.roll_up(&get_current_date_string());
        Ok(habit)
    }

    /// Edit a habit's definition and/or its progress on `request.date`
    pub fn update_habit(
        &self,
        id: i64,
        request: UpdateHabit,
    ) -> Result<HabitProgress, TrackerError> {
        let mut habit = self.load_habit(id)?;
        let date = resolve_date(request.date.as_deref())?;

        let definition_changed = request.title.is_some()
            || request.emoji.is_some()
            || request.category.is_some()
            || request.target_count.is_some()
            || request.status.is_some();

        if let Some(title) = &request.title {
            habit.title = require_title(title, "Habit")?;
        }
        if let Some(emoji) = request.emoji {
            habit.emoji = emoji;
        }
        if let Some(category) = request.category {
            habit.category = category;
        }
        let previous_target = habit.target_count;
        if let Some(target) = request.target_count {
            habit.target_count = validate_target(target)?;
        }
        if let Some(status) = request.status {
            habit.status = status;
        }
        if definition_changed {
            self.db.update_habit(&habit)?;
        }

        let current = self.day_progress(id, &date)?;
        let result = if request.current_count.is_some() || request.is_completed.is_some() {
            let edited = progress::edit(
                habit.target_count,
                current,
                request.current_count,
                request.is_completed,
            );
            self.write_progress(habit, &date, edited)?
        } else if habit.target_count != previous_target
            && self.db.get_habit_log(id, &date)?.is_some()
        {
            // a new target re-derives the stored day's completion from its count
            let rederived = progress::edit(
                habit.target_count,
                current,
                Some(i64::from(current.current_count)),
                None,
            );
            self.write_progress(habit, &date, rederived)?
        } else {
            HabitProgress {
                habit,
                current_count: current.current_count,
                is_completed: current.is_completed,
            }
        };

        tracing::info!(id, date = %date, "habit updated");
        self.roll_up(&date);
        Ok(result)
    }

    /// Move a habit's progress on a date one step up or down
    pub fn step_habit(&self, id: i64, request: StepHabit) -> Result<HabitProgress, TrackerError> {
        let habit = self.load_habit(id)?;
        let date = resolve_date(request.date.as_deref())?;

        let current = self.day_progress(id, &date)?;
        let next = progress::step(habit.target_count, current, request.direction);
        let result = self.write_progress(habit, &date, next)?;

        tracing::debug!(
            id,
            date = %date,
            direction = ?request.direction,
            count = result.current_count,
            "habit stepped"
        );
        self.roll_up(&date);
        Ok(result)
    }

    pub fn delete_habit(&self, id: i64) -> Result<(), TrackerError> {
        if !self.db.delete_habit(id)? {
            return Err(TrackerError::NotFound(format!("Habit {} not found", id)));
        }
        tracing::info!(id, "habit deleted");
        self.roll_up(&get_current_date_string());
        Ok(())
    }

    // ---- tasks ----

    pub fn list_tasks(&self, filter: Option<TaskFilter>) -> Result<Vec<Task>, TrackerError> {
        let tasks = self.db.get_all_tasks()?;
        Ok(match filter {
            Some(filter) => tasks.into_iter().filter(|t| filter.matches(t)).collect(),
            None => tasks,
        })
    }

    pub fn get_task(&self, id: i64) -> Result<Task, TrackerError> {
        self.load_task(id)
    }

    pub fn create_task(&self, request: CreateTask) -> Result<Task, TrackerError> {
        let mut task = Task::new(require_title(&request.title, "Task")?);
        task.is_completed = request.is_completed;
        task.due_date = match request.due_date.as_deref() {
            Some(raw) => Some(resolve_date(Some(raw))?),
            None => None,
        };
        task.priority = request.priority.unwrap_or_default();
        if let Some(category) = request.category {
            task.category = category;
        }
        if let Some(reminder) = request.reminder {
            task.reminder = reminder;
        }
        task.auto_postpone = request.auto_postpone;
        task.subtasks = request.subtasks;

        let id = self.db.insert_task(&task)?;
        task.id = Some(id);
        tracing::info!(id, title = %task.title, "task created");

        self.roll_up(&get_current_date_string());
        Ok(task)
    }

    pub fn update_task(&self, id: i64, request: UpdateTask) -> Result<Task, TrackerError> {
        let mut task = self.load_task(id)?;

        if let Some(title) = &request.title {
            task.title = require_title(title, "Task")?;
        }
        if let Some(done) = request.is_completed {
            task.is_completed = done;
        }
        if let Some(due) = request.due_date {
            task.due_date = match due.as_deref() {
                Some(raw) => Some(resolve_date(Some(raw))?),
                None => None,
            };
        }
        if let Some(priority) = request.priority {
            task.priority = priority;
        }
        if let Some(category) = request.category {
            task.category = category;
        }
        if let Some(reminder) = request.reminder {
            task.reminder = reminder;
        }
        if let Some(auto_postpone) = request.auto_postpone {
            task.auto_postpone = auto_postpone;
        }
        if let Some(subtasks) = request.subtasks {
            task.subtasks = subtasks;
        }

        self.db.update_task(&task)?;
        tracing::info!(id, "task updated");

        self.roll_up(&get_current_date_string());
        Ok(task)
    }

    pub fn delete_task(&self, id: i64) -> Result<(), TrackerError> {
        if !self.db.delete_task(id)? {
            return Err(TrackerError::NotFound(format!("Task {} not found", id)));
        }
        tracing::info!(id, "task deleted");
        self.roll_up(&get_current_date_string());
        Ok(())
    }

    /// Move overdue auto-postpone tasks to `today`, returning how many moved
    pub fn postpone_overdue(&self, today: Option<&str>) -> Result<usize, TrackerError> {
        let today = resolve_date(today)?;
        let moved = self.db.postpone_overdue_tasks(&today)?;
        if moved > 0 {
            tracing::info!(moved, date = %today, "overdue tasks postponed");
            self.roll_up(&today);
        }
        Ok(moved)
    }

    // ---- notes ----

    pub fn list_notes(&self) -> Result<Vec<Note>, TrackerError> {
        Ok(self.db.get_all_notes()?)
    }

    pub fn get_note(&self, date: &str) -> Result<Note, TrackerError> {
        let date = resolve_date(Some(date))?;
        self.db
            .get_note_by_date(&date)?
            .ok_or_else(|| TrackerError::NotFound(format!("Note for {} not found", date)))
    }

    /// Create the note of a date, or replace its content
    pub fn save_note(&self, request: SaveNote) -> Result<SavedNote, TrackerError> {
        let date = resolve_date(Some(&request.date))?;
        if request.content.trim().is_empty() {
            return Err(TrackerError::Validation("Note content is required".to_string()));
        }

        let created = self.db.get_note_by_date(&date)?.is_none();
        let note = self.db.upsert_note(&Note::new(date, request.content))?;
        tracing::info!(date = %note.date, created, "note saved");
        Ok(SavedNote { note, created })
    }

    pub fn delete_note(&self, date: &str) -> Result<(), TrackerError> {
        let date = resolve_date(Some(date))?;
        if !self.db.delete_note_by_date(&date)? {
            return Err(TrackerError::NotFound(format!("Note for {} not found", date)));
        }
        tracing::info!(date = %date, "note deleted");
        Ok(())
    }

    // ---- stats ----

    pub fn stats(&self) -> Result<StatsReport, TrackerError> {
        Ok(rollup::stats_report(&self.db, &self.user_key)?)
    }

    /// The stored rollup of one date
    pub fn daily_log(&self, date: &str) -> Result<DailyLog, TrackerError> {
        let date = resolve_date(Some(date))?;
        self.db
            .get_daily_log(&date)?
            .ok_or_else(|| TrackerError::NotFound(format!("No daily log for {}", date)))
    }

    /// Run the rollup for a date and propagate its failure
    pub fn recompute(&self, date: Option<&str>) -> Result<DailyLog, TrackerError> {
        let date = resolve_date(date)?;
        let (daily, _) =
            rollup::recompute(&self.db, &self.user_key, &date, &get_current_date_string())?;
        Ok(daily)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> Tracker {
        Tracker::new(Database::open_in_memory().unwrap(), "default_user")
    }

    fn habit_request(title: &str, target: Option<i64>) -> CreateHabit {
        CreateHabit {
            title: title.to_string(),
            emoji: None,
            category: None,
            target_count: target,
            status: None,
        }
    }

    fn up_on(date: &str) -> StepHabit {
        StepHabit {
            direction: Direction::Up,
            date: Some(date.to_string()),
        }
    }

    #[test]
    fn five_steps_toward_target_of_eight() {
        let tracker = tracker();
        let habit = tracker.create_habit(habit_request("Water", Some(8))).unwrap();
        let id = habit.id.unwrap();

        let mut last = None;
        for _ in 0..5 {
            last = Some(tracker.step_habit(id, up_on("2024-01-15")).unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.current_count, 5);
        assert!(!last.is_completed);

        let logs = tracker.db().get_habit_logs_for_habit(id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].date, "2024-01-15");
        assert_eq!(logs[0].current_count, 5);
    }

    #[test]
    fn step_rolls_up_the_stepped_date() {
        let tracker = tracker();
        let id = tracker
            .create_habit(habit_request("Stretch", Some(1)))
            .unwrap()
            .id
            .unwrap();

        tracker.step_habit(id, up_on("2024-01-10")).unwrap();

        let daily = tracker.daily_log("2024-01-10").unwrap();
        assert_eq!(daily.completed_habits, 1);
        assert_eq!(daily.total_habits, 1);
        assert_eq!(daily.completion_rate, 100.0);
    }

    #[test]
    fn boolean_habit_step_down_clears() {
        let tracker = tracker();
        let id = tracker
            .create_habit(habit_request("Meditate", None))
            .unwrap()
            .id
            .unwrap();

        let down = StepHabit {
            direction: Direction::Down,
            date: Some("2024-01-15".to_string()),
        };
        assert!(tracker.step_habit(id, up_on("2024-01-15")).unwrap().is_completed);
        assert!(tracker.step_habit(id, up_on("2024-01-15")).unwrap().is_completed);
        assert!(!tracker.step_habit(id, down).unwrap().is_completed);
    }

    #[test]
    fn missing_habit_is_not_found() {
        let tracker = tracker();
        assert!(matches!(
            tracker.step_habit(42, StepHabit::default()),
            Err(TrackerError::NotFound(_))
        ));
        assert!(matches!(tracker.delete_habit(42), Err(TrackerError::NotFound(_))));
    }

    #[test]
    fn habit_validation() {
        let tracker = tracker();
        assert!(matches!(
            tracker.create_habit(habit_request("   ", Some(1))),
            Err(TrackerError::Validation(_))
        ));
        assert!(matches!(
            tracker.create_habit(habit_request("Push-ups", Some(0))),
            Err(TrackerError::Validation(_))
        ));
        assert!(tracker.get_task(1).is_err());
    }

    #[test]
    fn update_carries_definition_and_progress() {
        let tracker = tracker();
        let id = tracker
            .create_habit(habit_request("Read", Some(2)))
            .unwrap()
            .id
            .unwrap();

        let updated = tracker
            .update_habit(
                id,
                UpdateHabit {
                    title: Some("Read a chapter".to_string()),
                    target_count: Some(Some(3)),
                    current_count: Some(3),
                    date: Some("2024-01-15".to_string()),
                    ..UpdateHabit::default()
                },
            )
            .unwrap();

        assert_eq!(updated.habit.title, "Read a chapter");
        assert_eq!(updated.habit.target_count, Some(3));
        assert_eq!(updated.current_count, 3);
        assert!(updated.is_completed);

        let listed = tracker.list_habits(Some("2024-01-15"), HabitFilter::Active).unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].is_completed);
        let other_day = tracker.list_habits(Some("2024-01-16"), HabitFilter::Active).unwrap();
        assert_eq!(other_day[0].current_count, 0);
    }

    #[test]
    fn target_change_rederives_stored_progress() {
        let tracker = tracker();
        let id = tracker
            .create_habit(habit_request("Pages", Some(3)))
            .unwrap()
            .id
            .unwrap();
        for _ in 0..3 {
            tracker.step_habit(id, up_on("2024-01-15")).unwrap();
        }

        let raised = tracker
            .update_habit(
                id,
                UpdateHabit {
                    target_count: Some(Some(5)),
                    date: Some("2024-01-15".to_string()),
                    ..UpdateHabit::default()
                },
            )
            .unwrap();
        assert_eq!(raised.current_count, 3);
        assert!(!raised.is_completed);

        let log = tracker.db().get_habit_log(id, "2024-01-15").unwrap().unwrap();
        assert_eq!(log.current_count, 3);
        assert!(!log.is_completed);
        let daily = tracker.daily_log("2024-01-15").unwrap();
        assert_eq!(daily.completed_habits, 0);
        assert_eq!(daily.completion_rate, 0.0);

        // lowering the target below the count completes the day again
        let lowered = tracker
            .update_habit(
                id,
                UpdateHabit {
                    target_count: Some(Some(2)),
                    date: Some("2024-01-15".to_string()),
                    ..UpdateHabit::default()
                },
            )
            .unwrap();
        assert_eq!(lowered.current_count, 2);
        assert!(lowered.is_completed);
    }

    #[test]
    fn boolean_habit_turned_counter_keeps_the_invariant() {
        let tracker = tracker();
        let id = tracker
            .create_habit(habit_request("Journal", None))
            .unwrap()
            .id
            .unwrap();
        tracker.step_habit(id, up_on("2024-01-15")).unwrap();

        let updated = tracker
            .update_habit(
                id,
                UpdateHabit {
                    target_count: Some(Some(4)),
                    date: Some("2024-01-15".to_string()),
                    ..UpdateHabit::default()
                },
            )
            .unwrap();
        assert_eq!(updated.habit.target_count, Some(4));
        assert_eq!(updated.is_completed, updated.current_count >= 4);
        assert!(!updated.is_completed);

        // no stored day means nothing to re-derive
        assert!(tracker.db().get_habit_log(id, "2024-01-16").unwrap().is_none());
    }

    #[test]
    fn stopped_habits_leave_the_active_list() {
        let tracker = tracker();
        let id = tracker
            .create_habit(habit_request("Late snacks", Some(1)))
            .unwrap()
            .id
            .unwrap();
        tracker
            .update_habit(
                id,
                UpdateHabit {
                    status: Some(HabitStatus::Stopped),
                    ..UpdateHabit::default()
                },
            )
            .unwrap();

        assert!(tracker.list_habits(None, HabitFilter::Active).unwrap().is_empty());
        assert_eq!(tracker.list_habits(None, HabitFilter::Stopped).unwrap().len(), 1);
        assert_eq!(tracker.list_habits(None, HabitFilter::All).unwrap().len(), 1);
    }

    #[test]
    fn task_due_dates_are_canonical() {
        let tracker = tracker();
        let task = tracker
            .create_task(CreateTask {
                title: "Dentist".to_string(),
                is_completed: false,
                due_date: Some("2024-01-15T09:30:00Z".to_string()),
                priority: Some(Priority::Medium),
                category: None,
                reminder: None,
                auto_postpone: false,
                subtasks: Vec::new(),
            })
            .unwrap();
        assert_eq!(task.due_date.as_deref(), Some("2024-01-15"));
        assert_eq!(task.category, "None");

        let id = task.id.unwrap();
        let cleared = tracker
            .update_task(
                id,
                UpdateTask {
                    due_date: Some(None),
                    ..UpdateTask::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.due_date, None);

        let untouched = tracker
            .update_task(
                id,
                UpdateTask {
                    is_completed: Some(true),
                    ..UpdateTask::default()
                },
            )
            .unwrap();
        assert_eq!(untouched.due_date, None);
        assert!(untouched.is_completed);
    }

    #[test]
    fn task_filters() {
        let tracker = tracker();
        let new_task = |title: &str, due: Option<&str>, done: bool| CreateTask {
            title: title.to_string(),
            is_completed: done,
            due_date: due.map(str::to_string),
            priority: None,
            category: None,
            reminder: None,
            auto_postpone: false,
            subtasks: Vec::new(),
        };
        tracker.create_task(new_task("dated", Some("2024-02-01"), false)).unwrap();
        tracker.create_task(new_task("floating", None, false)).unwrap();
        tracker.create_task(new_task("finished", None, true)).unwrap();

        let titles = |filter| {
            tracker
                .list_tasks(filter)
                .unwrap()
                .into_iter()
                .map(|t| t.title)
                .collect::<Vec<_>>()
        };
        assert_eq!(titles(Some(TaskFilter::Upcoming)), vec!["dated"]);
        assert_eq!(titles(Some(TaskFilter::NoDate)), vec!["floating"]);
        assert_eq!(titles(Some(TaskFilter::Completed)), vec!["finished"]);
        assert_eq!(titles(None).len(), 3);
    }

    #[test]
    fn notes_are_saved_per_date() {
        let tracker = tracker();
        let first = tracker
            .save_note(SaveNote {
                date: "2024-01-15".to_string(),
                content: "Slept well".to_string(),
            })
            .unwrap();
        assert!(first.created);

        let second = tracker
            .save_note(SaveNote {
                date: "2024-01-15".to_string(),
                content: "Slept well, ran 5k".to_string(),
            })
            .unwrap();
        assert!(!second.created);
        assert_eq!(tracker.get_note("2024-01-15").unwrap().content, "Slept well, ran 5k");

        tracker.delete_note("2024-01-15").unwrap();
        assert!(matches!(
            tracker.get_note("2024-01-15"),
            Err(TrackerError::NotFound(_))
        ));
        assert!(matches!(
            tracker.save_note(SaveNote {
                date: "2024-01-15".to_string(),
                content: " ".to_string(),
            }),
            Err(TrackerError::Validation(_))
        ));
    }

    #[test]
    fn stats_before_any_rollup_are_zero() {
        let tracker = tracker();
        let report = tracker.stats().unwrap();
        assert_eq!(report.streak, 0);
        assert_eq!(report.perfect_days, 0);
        assert!(report.activity_data.is_empty());
    }

    #[test]
    fn rollup_failure_does_not_fail_the_write() {
        let tracker = tracker();
        tracker
            .db()
            .conn()
            .execute_batch("DROP TABLE daily_logs")
            .unwrap();

        let habit = tracker.create_habit(habit_request("Walk", Some(1))).unwrap();
        assert!(habit.id.is_some());
        assert!(matches!(tracker.recompute(None), Err(TrackerError::Database(_))));
    }
}
