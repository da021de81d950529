pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod progress;
pub mod rollup;
pub mod server;
pub mod tracker;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use models::{DailyLog, Habit, HabitLog, HabitProgress, Note, Stats, StatsReport, Task};
pub use tracker::Tracker;
pub use utils::Profile;
