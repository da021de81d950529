use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::tracker::{CreateHabit, CreateTask, SaveNote, Tracker, TrackerError};

#[derive(Parser)]
#[command(name = "zenflow")]
#[command(about = "Zenflow - habit and task tracker with daily notes and streaks")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default if no subcommand)
    Serve {
        /// Listen address, overrides the config file
        #[arg(long)]
        bind: Option<String>,
    },
    /// Quickly add a new habit
    AddHabit {
        /// Habit title
        title: String,
        /// Completions needed per day
        #[arg(long, default_value_t = 1, conflicts_with = "check")]
        target: i64,
        /// Plain done / not done habit without a counter
        #[arg(long)]
        check: bool,
        #[arg(long)]
        emoji: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Quickly add a new task
    AddTask {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Move the task to today while it is overdue
        #[arg(long)]
        auto_postpone: bool,
    },
    /// Write the note of a day (default today)
    Note {
        /// Note content
        content: String,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Print streak and completion statistics
    Stats,
    /// Recompute the daily log of a date (default today) and the stats
    Recompute {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Handle the add-habit command
pub fn handle_add_habit(
    title: String,
    target: i64,
    check: bool,
    emoji: Option<String>,
    category: Option<String>,
    tracker: &Tracker,
) -> Result<(), CliError> {
    let habit = tracker.create_habit(CreateHabit {
        title,
        emoji,
        category,
        target_count: if check { None } else { Some(target) },
        status: None,
    })?;
    println!("Habit created successfully (ID: {})", habit.id.unwrap_or_default());
    Ok(())
}

/// Handle the add-task command
pub fn handle_add_task(
    title: String,
    due: Option<String>,
    auto_postpone: bool,
    tracker: &Tracker,
) -> Result<(), CliError> {
    let task = tracker.create_task(CreateTask {
        title,
        is_completed: false,
        due_date: due,
        priority: None,
        category: None,
        reminder: None,
        auto_postpone,
        subtasks: Vec::new(),
    })?;
    println!("Task created successfully (ID: {})", task.id.unwrap_or_default());
    Ok(())
}

/// Handle the note command
pub fn handle_note(
    content: String,
    date: Option<String>,
    tracker: &Tracker,
) -> Result<(), CliError> {
    let date = date.unwrap_or_else(crate::utils::get_current_date_string);
    let saved = tracker.save_note(SaveNote { date, content })?;
    if saved.created {
        println!("Note for {} created", saved.note.date);
    } else {
        println!("Note for {} updated", saved.note.date);
    }
    Ok(())
}

/// Handle the stats command
pub fn handle_stats(tracker: &Tracker) -> Result<(), CliError> {
    let report = tracker.stats()?;
    println!("Stats for {}", tracker.user_key());
    println!("Streak:        {} day(s)", report.streak);
    println!("Perfect days:  {}", report.perfect_days);
    println!("Active days:   {}", report.active_days);
    println!("Overall rate:  {:.1}%", report.overall_rate);

    for (date, rate) in report.activity_data.iter().rev().take(7) {
        println!("  {}  {:>5.1}%", date, rate);
    }
    Ok(())
}

/// Handle the recompute command
pub fn handle_recompute(date: Option<String>, tracker: &Tracker) -> Result<(), CliError> {
    let daily = tracker.recompute(date.as_deref())?;
    println!(
        "{}: {}/{} habits, {}/{} tasks, {:.1}% complete",
        daily.date,
        daily.completed_habits,
        daily.total_habits,
        daily.completed_tasks,
        daily.total_tasks,
        daily.completion_rate
    );
    Ok(())
}
