use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "zenflow-dev",
            Profile::Prod => "zenflow",
        }
    }
}

/// Get the configuration directory path for zenflow
/// If profile is Dev, uses "zenflow-dev" instead of "zenflow"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "zenflow", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for zenflow
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "zenflow", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Canonicalize a caller-supplied date to `YYYY-MM-DD`.
///
/// Accepts a plain calendar date or a full RFC 3339 timestamp, in which case
/// the calendar date in the timestamp's own offset is kept.
pub fn canonical_date(input: &str) -> Result<String, chrono::ParseError> {
    let input = input.trim();
    match parse_date(input) {
        Ok(date) => Ok(date.format("%Y-%m-%d").to_string()),
        Err(date_err) => chrono::DateTime::parse_from_rfc3339(input)
            .map(|ts| ts.date_naive().format("%Y-%m-%d").to_string())
            .map_err(|_| date_err),
    }
}

/// Get the current local date as an ISO 8601 string (YYYY-MM-DD)
pub fn get_current_date_string() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Server-side write timestamp (RFC 3339, UTC)
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
