use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use zenban_core::{Column, ColumnDraft, ColumnId, ColumnPatch, NewColumn};

use super::{ApiError, SharedState, json_body, path_param};

const INVALID_COLUMN: &str = "Invalid column data";

#[derive(Deserialize)]
pub struct MoveColumnBody {
    position: i64,
}

pub async fn list_columns(State(state): State<SharedState>) -> Result<Json<Vec<Column>>, ApiError> {
    Ok(Json(state.read(|board| board.columns())?))
}

pub async fn create_column(
    State(state): State<SharedState>,
    payload: Result<Json<ColumnDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Column>), ApiError> {
    let draft = json_body(payload, INVALID_COLUMN)?;
    let new = NewColumn::try_from(draft).map_err(|e| ApiError::bad_request(INVALID_COLUMN, e))?;
    let column = state.write(|board| board.create_column(new))?;
    Ok((StatusCode::CREATED, Json(column)))
}

pub async fn update_column(
    State(state): State<SharedState>,
    id: Result<Path<ColumnId>, PathRejection>,
    payload: Result<Json<ColumnDraft>, JsonRejection>,
) -> Result<Json<Column>, ApiError> {
    let id = path_param(id)?;
    let draft = json_body(payload, INVALID_COLUMN)?;
    let patch = ColumnPatch::try_from(draft).map_err(|e| ApiError::bad_request(INVALID_COLUMN, e))?;
    Ok(Json(state.write(|board| board.update_column(id, &patch))?))
}

pub async fn delete_column(
    State(state): State<SharedState>,
    id: Result<Path<ColumnId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_param(id)?;
    state.write(|board| board.delete_column(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/columns/{id}/move -- shift a column to a new slot.
pub async fn move_column(
    State(state): State<SharedState>,
    id: Result<Path<ColumnId>, PathRejection>,
    payload: Result<Json<MoveColumnBody>, JsonRejection>,
) -> Result<Json<Column>, ApiError> {
    let id = path_param(id)?;
    let body = json_body(payload, "Invalid position")?;
    Ok(Json(state.write(|board| board.move_column(id, body.position))?))
}
