pub mod habits;
pub mod notes;
pub mod stats;
pub mod tasks;
