use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::models::Task;
use crate::server::{ApiError, AppState};
use crate::tracker::{CreateTask, TaskFilter, UpdateTask};

#[derive(Debug, Deserialize)]
pub struct TasksQuery {
    pub filter: Option<TaskFilter>,
}

#[derive(Debug, Deserialize)]
pub struct PostponeQuery {
    pub date: Option<String>,
}

/// GET /api/tasks?filter=upcoming|no-date|completed
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<TasksQuery>, QueryRejection>,
) -> Result<ResponseJson<Vec<Task>>, ApiError> {
    let Query(query) = query?;
    let tasks = state
        .with_tracker(move |t| t.list_tasks(query.filter))
        .await?;
    Ok(ResponseJson(tasks))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ResponseJson<Task>, ApiError> {
    let Path(id) = path?;
    let task = state
        .with_tracker(move |t| t.get_task(id))
        .await?;
    Ok(ResponseJson(task))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<Task>), ApiError> {
    let Json(payload) = payload?;
    let task = state
        .with_tracker(move |t| t.create_task(payload))
        .await?;
    Ok((StatusCode::CREATED, ResponseJson(task)))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> Result<ResponseJson<Task>, ApiError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let task = state
        .with_tracker(move |t| t.update_task(id, payload))
        .await?;
    Ok(ResponseJson(task))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ResponseJson<Value>, ApiError> {
    let Path(id) = path?;
    state
        .with_tracker(move |t| t.delete_task(id))
        .await?;
    Ok(ResponseJson(json!({ "message": "Task deleted" })))
}

/// POST /api/tasks/postpone?date=YYYY-MM-DD
/// Move overdue auto-postpone tasks to the date (default today)
pub async fn postpone_tasks(
    State(state): State<AppState>,
    query: Result<Query<PostponeQuery>, QueryRejection>,
) -> Result<ResponseJson<Value>, ApiError> {
    let Query(query) = query?;
    let moved = state
        .with_tracker(move |t| t.postpone_overdue(query.date.as_deref()))
        .await?;
    Ok(ResponseJson(json!({ "postponed": moved })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/postpone", post(postpone_tasks))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}
