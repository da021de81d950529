//! Daily rollup and aggregate statistics.
//!
//! Daily logs and stats are derived data: every call recomputes them from the
//! current habits, habit logs and tasks, and from the complete daily log
//! history. Nothing here mutates habits, habit logs or tasks.

use std::collections::{BTreeMap, HashMap};

use crate::database::{Database, DatabaseError};
use crate::models::{DailyLog, Habit, HabitLog, Stats, StatsReport, Task};
use crate::utils::{get_current_date_string, now_timestamp};

/// Completion counts for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayCounts {
    pub completed_habits: u32,
    pub total_habits: u32,
    pub completed_tasks: u32,
    pub total_tasks: u32,
}

impl DayCounts {
    /// Percentage of completed items, exactly 0 when there is nothing to do
    pub fn completion_rate(&self) -> f64 {
        let total = self.total_habits + self.total_tasks;
        if total == 0 {
            return 0.0;
        }
        let completed = self.completed_habits + self.completed_tasks;
        f64::from(completed) / f64::from(total) * 100.0
    }
}

/// Count a day's habits and tasks.
///
/// Only active habits count; one without a log for `date` is incomplete.
/// Tasks count when due on `date` or when they have no due date at all.
pub fn count_day(habits: &[Habit], logs: &[HabitLog], tasks: &[Task], date: &str) -> DayCounts {
    let completed_by_habit: HashMap<i64, bool> = logs
        .iter()
        .filter(|log| log.date == date)
        .map(|log| (log.habit_id, log.is_completed))
        .collect();

    let mut counts = DayCounts::default();

    for habit in habits.iter().filter(|h| h.is_active()) {
        counts.total_habits += 1;
        let done = habit
            .id
            .and_then(|id| completed_by_habit.get(&id).copied())
            .unwrap_or(false);
        if done {
            counts.completed_habits += 1;
        }
    }

    for task in tasks.iter().filter(|t| t.applies_to(date)) {
        counts.total_tasks += 1;
        if task.is_completed {
            counts.completed_tasks += 1;
        }
    }

    counts
}

/// Count of consecutive days with progress, walking back from the newest log.
///
/// `logs` must be ordered by date ascending. A zero-rate log ends the streak
/// unless it is today's, which is still in progress and is skipped.
pub fn compute_streak(logs: &[DailyLog], today: &str) -> u32 {
    let mut streak = 0;
    for log in logs.iter().rev() {
        if log.completion_rate > 0.0 {
            streak += 1;
        } else if log.date == today {
            continue;
        } else {
            break;
        }
    }
    streak
}

/// Aggregate figures derived from the full daily log history
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregates {
    pub streak: u32,
    pub perfect_days: u32,
    pub active_days: u32,
    pub overall_rate: f64,
}

pub fn aggregate(logs: &[DailyLog], today: &str) -> Aggregates {
    let perfect_days = logs.iter().filter(|l| l.completion_rate >= 100.0).count() as u32;
    let active_days = logs.iter().filter(|l| l.completion_rate > 0.0).count() as u32;
    let overall_rate = if logs.is_empty() {
        0.0
    } else {
        logs.iter().map(|l| l.completion_rate).sum::<f64>() / logs.len() as f64
    };

    Aggregates {
        streak: compute_streak(logs, today),
        perfect_days,
        active_days,
        overall_rate,
    }
}

/// Recompute and store the daily log of `date`
pub fn recompute_daily_log(db: &Database, date: &str) -> Result<DailyLog, DatabaseError> {
    let habits = db.get_all_habits()?;
    let logs = db.get_habit_logs_for_date(date)?;
    let tasks = db.get_all_tasks()?;

    let counts = count_day(&habits, &logs, &tasks, date);
    let daily = DailyLog {
        date: date.to_string(),
        completed_habits: counts.completed_habits,
        total_habits: counts.total_habits,
        completed_tasks: counts.completed_tasks,
        total_tasks: counts.total_tasks,
        completion_rate: counts.completion_rate(),
        updated_at: now_timestamp(),
    };
    db.upsert_daily_log(&daily)?;

    tracing::debug!(
        date,
        rate = daily.completion_rate,
        habits = daily.total_habits,
        tasks = daily.total_tasks,
        "daily log recomputed"
    );
    Ok(daily)
}

/// Recompute and store the stats of `user_key` from every daily log
pub fn recompute_aggregate_stats(
    db: &Database,
    user_key: &str,
    today: &str,
) -> Result<Stats, DatabaseError> {
    let logs = db.get_all_daily_logs()?;
    let aggregates = aggregate(&logs, today);

    let stats = Stats {
        user_key: user_key.to_string(),
        streak: aggregates.streak,
        perfect_days: aggregates.perfect_days,
        active_days: aggregates.active_days,
        overall_rate: aggregates.overall_rate,
        last_updated: now_timestamp(),
    };
    db.upsert_stats(&stats)?;

    tracing::debug!(user_key, streak = stats.streak, days = logs.len(), "stats recomputed");
    Ok(stats)
}

/// Roll up `date`, then the aggregate stats
pub fn recompute(
    db: &Database,
    user_key: &str,
    date: &str,
    today: &str,
) -> Result<(DailyLog, Stats), DatabaseError> {
    let daily = recompute_daily_log(db, date)?;
    let stats = recompute_aggregate_stats(db, user_key, today)?;
    Ok((daily, stats))
}

/// Roll up `date` after a mutation. Failures are logged and dropped so they
/// never fail the mutation that triggered them; the derived data stays stale
/// until the next successful rollup.
pub fn recompute_best_effort(db: &Database, user_key: &str, date: &str) {
    let today = get_current_date_string();
    if let Err(e) = recompute(db, user_key, date, &today) {
        tracing::warn!(date, error = %e, "rollup failed, stats may be stale");
    }
}

/// Current stats plus per-day completion rates. Missing stats read as zero.
pub fn stats_report(db: &Database, user_key: &str) -> Result<StatsReport, DatabaseError> {
    let activity_data: BTreeMap<String, f64> = db
        .get_all_daily_logs()?
        .into_iter()
        .map(|log| (log.date, log.completion_rate))
        .collect();

    let report = match db.get_stats(user_key)? {
        Some(stats) => StatsReport {
            streak: stats.streak,
            perfect_days: stats.perfect_days,
            active_days: stats.active_days,
            overall_rate: stats.overall_rate,
            activity_data,
        },
        None => StatsReport {
            streak: 0,
            perfect_days: 0,
            active_days: 0,
            overall_rate: 0.0,
            activity_data,
        },
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HabitStatus;

    const USER: &str = "default_user";

    fn daily(date: &str, rate: f64) -> DailyLog {
        DailyLog {
            date: date.to_string(),
            completed_habits: 0,
            total_habits: 0,
            completed_tasks: 0,
            total_tasks: 0,
            completion_rate: rate,
            updated_at: String::new(),
        }
    }

    fn habit_log(habit_id: i64, date: &str, done: bool) -> HabitLog {
        HabitLog {
            habit_id,
            date: date.to_string(),
            current_count: u32::from(done),
            is_completed: done,
            updated_at: String::new(),
        }
    }

    #[test]
    fn zero_rate_yesterday_breaks_streak() {
        let logs = vec![
            daily("2024-01-12", 100.0),
            daily("2024-01-13", 100.0),
            daily("2024-01-14", 0.0),
            daily("2024-01-15", 80.0),
        ];
        assert_eq!(compute_streak(&logs, "2024-01-15"), 1);
    }

    #[test]
    fn zero_rate_today_is_skipped() {
        let logs = vec![
            daily("2024-01-13", 50.0),
            daily("2024-01-14", 100.0),
            daily("2024-01-15", 0.0),
        ];
        assert_eq!(compute_streak(&logs, "2024-01-15"), 2);
        assert_eq!(compute_streak(&logs, "2024-01-16"), 0);
    }

    #[test]
    fn aggregates_over_history() {
        let logs = vec![daily("2024-01-14", 100.0), daily("2024-01-15", 50.0)];
        let aggregates = aggregate(&logs, "2024-01-15");
        assert_eq!(aggregates.perfect_days, 1);
        assert_eq!(aggregates.active_days, 2);
        assert_eq!(aggregates.overall_rate, 75.0);
        assert_eq!(aggregates.streak, 2);

        assert_eq!(aggregate(&[], "2024-01-15"), Aggregates::default());
    }

    #[test]
    fn empty_day_rate_is_zero() {
        let counts = count_day(&[], &[], &[], "2024-01-15");
        assert_eq!(counts, DayCounts::default());
        assert_eq!(counts.completion_rate(), 0.0);
    }

    #[test]
    fn counts_active_habits_and_applicable_tasks() {
        let mut active = Habit::new("Run".to_string());
        active.id = Some(1);
        let mut unlogged = Habit::new("Stretch".to_string());
        unlogged.id = Some(2);
        let mut stopped = Habit::new("Smoke less".to_string());
        stopped.id = Some(3);
        stopped.status = HabitStatus::Stopped;

        let mut due_today = Task::new("Call".to_string());
        due_today.due_date = Some("2024-01-15".to_string());
        due_today.is_completed = true;
        let mut due_later = Task::new("Pay rent".to_string());
        due_later.due_date = Some("2024-02-01".to_string());
        let floating = Task::new("Someday".to_string());

        let logs = vec![
            habit_log(1, "2024-01-15", true),
            habit_log(3, "2024-01-15", true),
            habit_log(2, "2024-01-14", true),
        ];
        let counts = count_day(
            &[active, unlogged, stopped],
            &logs,
            &[due_today, due_later, floating],
            "2024-01-15",
        );

        assert_eq!(
            counts,
            DayCounts {
                completed_habits: 1,
                total_habits: 2,
                completed_tasks: 1,
                total_tasks: 2,
            }
        );
        assert_eq!(counts.completion_rate(), 50.0);
    }

    #[test]
    fn recompute_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_habit(&Habit::new("Journal".to_string())).unwrap();
        db.upsert_habit_log(&habit_log(id, "2024-01-15", true)).unwrap();
        db.insert_task(&Task::new("Floating".to_string())).unwrap();

        let (first_log, first_stats) = recompute(&db, USER, "2024-01-15", "2024-01-15").unwrap();
        let (second_log, second_stats) = recompute(&db, USER, "2024-01-15", "2024-01-15").unwrap();

        assert_eq!(first_log.completion_rate, 50.0);
        assert_eq!(
            (first_log.completed_habits, first_log.total_habits, first_log.total_tasks),
            (second_log.completed_habits, second_log.total_habits, second_log.total_tasks)
        );
        assert_eq!(first_log.completion_rate, second_log.completion_rate);
        assert_eq!(first_stats.streak, second_stats.streak);
        assert_eq!(first_stats.overall_rate, second_stats.overall_rate);
        assert_eq!(db.get_all_daily_logs().unwrap().len(), 1);
    }

    #[test]
    fn removing_last_habit_drops_rate_to_zero() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_habit(&Habit::new("Floss".to_string())).unwrap();
        db.upsert_habit_log(&habit_log(id, "2024-01-15", true)).unwrap();

        let (before, _) = recompute(&db, USER, "2024-01-15", "2024-01-15").unwrap();
        assert_eq!(before.completion_rate, 100.0);

        db.delete_habit(id).unwrap();
        let (after, stats) = recompute(&db, USER, "2024-01-15", "2024-01-15").unwrap();
        assert_eq!(after.total_habits, 0);
        assert_eq!(after.total_tasks, 0);
        assert_eq!(after.completion_rate, 0.0);
        assert_eq!(stats.perfect_days, 0);
    }

    #[test]
    fn stats_report_defaults_to_zero() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_daily_log(&daily("2024-01-15", 40.0)).unwrap();

        let report = stats_report(&db, USER).unwrap();
        assert_eq!(report.streak, 0);
        assert_eq!(report.overall_rate, 0.0);
        assert_eq!(report.activity_data.get("2024-01-15"), Some(&40.0));
    }

    #[test]
    fn stats_are_scoped_by_user_key() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_daily_log(&daily("2024-01-15", 100.0)).unwrap();
        recompute_aggregate_stats(&db, "someone", "2024-01-15").unwrap();

        assert_eq!(stats_report(&db, "someone").unwrap().perfect_days, 1);
        assert_eq!(stats_report(&db, USER).unwrap().perfect_days, 0);
    }
}
