use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::now_timestamp;

/// Lifecycle status of a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitStatus {
    #[default]
    Active,
    Stopped,
}

impl HabitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitStatus::Active => "active",
            HabitStatus::Stopped => "stopped",
        }
    }

    /// Read a stored status. Rows written before statuses existed have no
    /// value and count as active; any other unknown value does not.
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            None | Some("") | Some("active") => HabitStatus::Active,
            Some(_) => HabitStatus::Stopped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Option<i64>,
    pub title: String,
    pub emoji: String,
    pub category: String,
    /// `None` marks a pure boolean (done / not done) habit
    pub target_count: Option<u32>,
    pub status: HabitStatus,
    pub created_at: String,
}

impl Habit {
    pub fn new(title: String) -> Self {
        Self {
            id: None,
            title,
            emoji: String::new(),
            category: String::new(),
            target_count: Some(1),
            status: HabitStatus::Active,
            created_at: now_timestamp(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == HabitStatus::Active
    }
}

/// Per-day progress snapshot of one habit, unique per (habit, date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub habit_id: i64,
    pub date: String, // YYYY-MM-DD
    pub current_count: u32,
    pub is_completed: bool,
    pub updated_at: String,
}

/// A habit merged with its progress for one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitProgress {
    #[serde(flatten)]
    pub habit: Habit,
    pub current_count: u32,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::None => "None",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "Low" => Priority::Low,
            "Medium" => Priority::Medium,
            "High" => Priority::High,
            _ => Priority::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Option<i64>,
    pub title: String,
    pub is_completed: bool,
    pub due_date: Option<String>, // YYYY-MM-DD
    pub priority: Priority,
    pub category: String,
    pub reminder: String,
    pub auto_postpone: bool,
    pub subtasks: Vec<Subtask>,
    pub created_at: String,
}

impl Task {
    pub fn new(title: String) -> Self {
        Self {
            id: None,
            title,
            is_completed: false,
            due_date: None,
            priority: Priority::None,
            category: "None".to_string(),
            reminder: "Not set".to_string(),
            auto_postpone: false,
            subtasks: Vec::new(),
            created_at: now_timestamp(),
        }
    }

    /// Whether the task is counted on `date`. Tasks without a due date
    /// float and count on every day.
    pub fn applies_to(&self, date: &str) -> bool {
        match &self.due_date {
            Some(due) => due == date,
            None => true,
        }
    }
}

/// Free-text note, one per date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Option<i64>,
    pub date: String, // YYYY-MM-DD
    pub content: String,
    pub updated_at: String,
}

impl Note {
    pub fn new(date: String, content: String) -> Self {
        Self {
            id: None,
            date,
            content,
            updated_at: now_timestamp(),
        }
    }
}

/// Per-day completion rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub date: String, // YYYY-MM-DD
    pub completed_habits: u32,
    pub total_habits: u32,
    pub completed_tasks: u32,
    pub total_tasks: u32,
    pub completion_rate: f64,
    pub updated_at: String,
}

/// Aggregate statistics over the whole daily log history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub user_key: String,
    pub streak: u32,
    pub perfect_days: u32,
    pub active_days: u32,
    pub overall_rate: f64,
    pub last_updated: String,
}

/// Response of the stats query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub streak: u32,
    pub perfect_days: u32,
    pub active_days: u32,
    pub overall_rate: f64,
    pub activity_data: BTreeMap<String, f64>,
}
