use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};

use crate::models::{DailyLog, StatsReport};
use crate::server::{ApiError, AppState};

/// GET /api/stats
/// Streak, perfect/active day counts, overall rate and per-day activity
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<ResponseJson<StatsReport>, ApiError> {
    let report = state
        .with_tracker(move |t| t.stats())
        .await?;
    Ok(ResponseJson(report))
}

/// GET /api/stats/daily/{date}
pub async fn get_daily_log(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<ResponseJson<DailyLog>, ApiError> {
    let log = state
        .with_tracker(move |t| t.daily_log(&date))
        .await?;
    Ok(ResponseJson(log))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/stats/daily/{date}", get(get_daily_log))
}
