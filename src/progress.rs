//! Habit progress rules: merging habits with their per-day logs and
//! applying directional steps or direct edits to a day's progress.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Habit, HabitLog, HabitProgress};

/// Direction of a progress step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
}

/// Progress values for one habit on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayProgress {
    pub current_count: u32,
    pub is_completed: bool,
}

impl From<&HabitLog> for DayProgress {
    fn from(log: &HabitLog) -> Self {
        Self {
            current_count: log.current_count,
            is_completed: log.is_completed,
        }
    }
}

/// Apply one step to a day's progress.
///
/// Counter habits move by one within `[0, target]` and are complete once the
/// target is reached. Boolean habits are set (not toggled) by direction so a
/// replayed step cannot flip the result.
pub fn step(target: Option<u32>, current: DayProgress, direction: Direction) -> DayProgress {
    match target {
        Some(target) => {
            let count = match direction {
                Direction::Up => current.current_count.saturating_add(1).min(target),
                Direction::Down => current.current_count.saturating_sub(1).min(target),
            };
            DayProgress {
                current_count: count,
                is_completed: count >= target,
            }
        }
        None => DayProgress {
            current_count: current.current_count,
            is_completed: direction == Direction::Up,
        },
    }
}

/// Apply a direct edit of `currentCount` and/or `isCompleted`.
///
/// For counter habits the completion flag always follows the count: a count
/// edit is clamped and the flag derived, a flag-only edit moves the count to
/// the target (`true`) or just below it (`false`).
pub fn edit(
    target: Option<u32>,
    current: DayProgress,
    count: Option<i64>,
    completed: Option<bool>,
) -> DayProgress {
    let floor = |value: i64| u32::try_from(value.max(0)).unwrap_or(u32::MAX);

    match target {
        Some(target) => {
            let count = match (count, completed) {
                (Some(count), _) => floor(count).min(target),
                (None, Some(true)) => target,
                (None, Some(false)) => current.current_count.min(target.saturating_sub(1)),
                (None, None) => current.current_count,
            };
            DayProgress {
                current_count: count,
                is_completed: count >= target,
            }
        }
        None => DayProgress {
            current_count: count.map(floor).unwrap_or(current.current_count),
            is_completed: completed.unwrap_or(current.is_completed),
        },
    }
}

/// Merge habits with the logs of one date. Habits without a log have
/// made no progress that day.
pub fn merge(habits: Vec<Habit>, logs: &[HabitLog]) -> Vec<HabitProgress> {
    let by_habit: HashMap<i64, &HabitLog> = logs.iter().map(|log| (log.habit_id, log)).collect();

    habits
        .into_iter()
        .map(|habit| {
            let progress = habit
                .id
                .and_then(|id| by_habit.get(&id))
                .map(|log| DayProgress::from(*log))
                .unwrap_or_default();
            HabitProgress {
                habit,
                current_count: progress.current_count,
                is_completed: progress.is_completed,
            }
        })
        .collect()
}

/// Tick totals across a day's active habits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub current_ticks: u64,
    pub total_possible_ticks: u64,
    pub progress_percent: u32,
}

/// Summarise progress: a counter habit contributes its count out of its
/// target, a boolean habit one tick out of one. Ticks are summed in `u64`
/// so any number of `u32` targets fits.
pub fn summarize(habits: &[HabitProgress]) -> ProgressSummary {
    let mut current_ticks = 0u64;
    let mut total_possible_ticks = 0u64;

    for entry in habits.iter().filter(|entry| entry.habit.is_active()) {
        match entry.habit.target_count {
            Some(target) => {
                total_possible_ticks = total_possible_ticks.saturating_add(u64::from(target));
                current_ticks =
                    current_ticks.saturating_add(u64::from(entry.current_count.min(target)));
            }
            None => {
                total_possible_ticks = total_possible_ticks.saturating_add(1);
                current_ticks = current_ticks.saturating_add(u64::from(entry.is_completed));
            }
        }
    }

    let progress_percent = if total_possible_ticks > 0 {
        (current_ticks as f64 * 100.0 / total_possible_ticks as f64).round() as u32
    } else {
        0
    };

    ProgressSummary {
        current_ticks,
        total_possible_ticks,
        progress_percent,
    }
}
