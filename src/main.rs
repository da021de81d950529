use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use zenflow::{
    Config, Database, Profile, Tracker,
    cli::{self, Cli, Commands},
    server::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps config and database apart from the real ones
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match &cli.config {
        Some(path) => Config::load_from_path(&zenflow::utils::expand_path(path), profile)?,
        None => Config::load_with_profile(profile)?,
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let db_path: PathBuf = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;
    tracing::debug!(path = %db_path.display(), "database opened");

    let tracker = Tracker::new(db, config.user_key.clone());

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.bind_address.clone());
            server::serve(AppState::new(tracker), &addr).await?;
        }
        Commands::AddHabit {
            title,
            target,
            check,
            emoji,
            category,
        } => {
            cli::handle_add_habit(title, target, check, emoji, category, &tracker)?;
        }
        Commands::AddTask {
            title,
            due,
            auto_postpone,
        } => {
            cli::handle_add_task(title, due, auto_postpone, &tracker)?;
        }
        Commands::Note { content, date } => {
            cli::handle_note(content, date, &tracker)?;
        }
        Commands::Stats => {
            cli::handle_stats(&tracker)?;
        }
        Commands::Recompute { date } => {
            cli::handle_recompute(date, &tracker)?;
        }
    }

    Ok(())
}
