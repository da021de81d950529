use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use serde_json::{Value, json};

use crate::models::Note;
use crate::server::{ApiError, AppState};
use crate::tracker::SaveNote;

/// GET /api/notes
pub async fn list_notes(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<Note>>, ApiError> {
    let notes = state
        .with_tracker(move |t| t.list_notes())
        .await?;
    Ok(ResponseJson(notes))
}

/// GET /api/notes/{date}
pub async fn get_note(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<ResponseJson<Note>, ApiError> {
    let note = state
        .with_tracker(move |t| t.get_note(&date))
        .await?;
    Ok(ResponseJson(note))
}

/// POST /api/notes
/// Creates the note of `date` (201) or replaces its content (200)
pub async fn save_note(
    State(state): State<AppState>,
    payload: Result<Json<SaveNote>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<Note>), ApiError> {
    let Json(payload) = payload?;
    let saved = state
        .with_tracker(move |t| t.save_note(payload))
        .await?;
    let status = if saved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, ResponseJson(saved.note)))
}

/// DELETE /api/notes/{date}
pub async fn delete_note(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<ResponseJson<Value>, ApiError> {
    state
        .with_tracker(move |t| t.delete_note(&date))
        .await?;
    Ok(ResponseJson(json!({ "message": "Note deleted" })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes).post(save_note))
        .route("/notes/{date}", get(get_note).delete(delete_note))
}
