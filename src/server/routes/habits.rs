use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::models::{Habit, HabitProgress};
use crate::progress::ProgressSummary;
use crate::server::{ApiError, AppState};
use crate::tracker::{CreateHabit, HabitFilter, StepHabit, UpdateHabit};

#[derive(Debug, Deserialize)]
pub struct HabitsQuery {
    pub date: Option<String>,
    pub status: Option<HabitFilter>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// GET /api/habits?date=YYYY-MM-DD&status=active|stopped|all
/// Habits merged with their progress on the date (default today)
pub async fn list_habits(
    State(state): State<AppState>,
    query: Result<Query<HabitsQuery>, QueryRejection>,
) -> Result<ResponseJson<Vec<HabitProgress>>, ApiError> {
    let Query(query) = query?;
    let habits = state
        .with_tracker(move |t| {
            t.list_habits(query.date.as_deref(), query.status.unwrap_or_default())
        })
        .await?;
    Ok(ResponseJson(habits))
}

/// GET /api/habits/summary?date=YYYY-MM-DD
pub async fn habit_summary(
    State(state): State<AppState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<ResponseJson<ProgressSummary>, ApiError> {
    let Query(query) = query?;
    let summary = state
        .with_tracker(move |t| t.habit_summary(query.date.as_deref()))
        .await?;
    Ok(ResponseJson(summary))
}

/// POST /api/habits
pub async fn create_habit(
    State(state): State<AppState>,
    payload: Result<Json<CreateHabit>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<Habit>), ApiError> {
    let Json(payload) = payload?;
    let habit = state
        .with_tracker(move |t| t.create_habit(payload))
        .await?;
    Ok((StatusCode::CREATED, ResponseJson(habit)))
}

/// PUT /api/habits/{id}
/// Definition edits and/or progress edits for `date` (default today)
pub async fn update_habit(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateHabit>, JsonRejection>,
) -> Result<ResponseJson<HabitProgress>, ApiError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let habit = state
        .with_tracker(move |t| t.update_habit(id, payload))
        .await?;
    Ok(ResponseJson(habit))
}

/// POST /api/habits/{id}/step
/// Body `{ "direction": "up" | "down", "date": "YYYY-MM-DD" }`, both optional
pub async fn step_habit(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<ResponseJson<HabitProgress>, ApiError> {
    let Path(id) = path?;
    let request: StepHabit = if body.iter().all(u8::is_ascii_whitespace) {
        StepHabit::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };
    let habit = state
        .with_tracker(move |t| t.step_habit(id, request))
        .await?;
    Ok(ResponseJson(habit))
}

/// DELETE /api/habits/{id}
pub async fn delete_habit(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ResponseJson<Value>, ApiError> {
    let Path(id) = path?;
    state
        .with_tracker(move |t| t.delete_habit(id))
        .await?;
    Ok(ResponseJson(json!({ "message": "Habit deleted" })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/habits", get(list_habits).post(create_habit))
        .route("/habits/summary", get(habit_summary))
        .route("/habits/{id}", put(update_habit).delete(delete_habit))
        .route("/habits/{id}/step", post(step_habit))
}
