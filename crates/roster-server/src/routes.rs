use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use roster_core::error::NOT_FOUND_MESSAGE;
use roster_core::time::now_utc;
use roster_core::{MessageDto, StudentId, StudentInput, StudentRecord};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

pub const HEALTH_MESSAGE: &str = "API is running...";
pub const DELETED_MESSAGE: &str = "Student deleted";

pub async fn health() -> &'static str {
    HEALTH_MESSAGE
}

pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentRecord>>, ApiError> {
    let records = state.with_store(|store| store.students().list()).await?;
    Ok(Json(records))
}

pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<StudentRecord>), ApiError> {
    let Json(input) = payload?;
    let now = now_utc();
    let record = state
        .with_store(move |store| store.students().create(now, &input))
        .await?;
    info!(id = %record.id, "student created");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<Json<StudentRecord>, ApiError> {
    let id = parse_id(&raw_id)?;
    let Json(input) = payload?;
    let now = now_utc();
    let record = state
        .with_store(move |store| store.students().update(now, id, &input))
        .await?;
    info!(id = %record.id, "student updated");
    Ok(Json(record))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageDto>, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .with_store(move |store| store.students().delete(id))
        .await?;
    info!(%id, "student deleted");
    Ok(Json(MessageDto::new(DELETED_MESSAGE)))
}

// An id that cannot exist is reported the same way as one that does not.
fn parse_id(raw: &str) -> Result<StudentId, ApiError> {
    raw.parse::<StudentId>()
        .map_err(|_| ApiError::NotFound(NOT_FOUND_MESSAGE))
}
