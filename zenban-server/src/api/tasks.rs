use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use zenban_core::{ColumnId, NewTask, Task, TaskDraft, TaskId, TaskPatch};

use super::{ApiError, SharedState, json_body, path_param};

const INVALID_TASK: &str = "Invalid task data";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskBody {
    column_id: ColumnId,
    position: i64,
}

pub async fn list_tasks(State(state): State<SharedState>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.read(|board| board.tasks())?))
}

pub async fn list_tasks_in_column(
    State(state): State<SharedState>,
    column_id: Result<Path<ColumnId>, PathRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let column_id = path_param(column_id)?;
    Ok(Json(state.read(|board| board.tasks_in(column_id))?))
}

pub async fn create_task(
    State(state): State<SharedState>,
    payload: Result<Json<TaskDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let draft = json_body(payload, INVALID_TASK)?;
    let new = NewTask::try_from(draft).map_err(|e| ApiError::bad_request(INVALID_TASK, e))?;
    let task = state.write(|board| board.create_task(new))?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<SharedState>,
    id: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<TaskDraft>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = path_param(id)?;
    let draft = json_body(payload, INVALID_TASK)?;
    let patch = TaskPatch::try_from(draft).map_err(|e| ApiError::bad_request(INVALID_TASK, e))?;
    Ok(Json(state.write(|board| board.update_task(id, &patch))?))
}

pub async fn delete_task(
    State(state): State<SharedState>,
    id: Result<Path<TaskId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_param(id)?;
    state.write(|board| board.delete_task(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/tasks/{id}/move -- move a task within or across columns.
pub async fn move_task(
    State(state): State<SharedState>,
    id: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<MoveTaskBody>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = path_param(id)?;
    let body = json_body(payload, "Invalid columnId or position")?;
    Ok(Json(state.write(|board| {
        board.move_task(id, body.column_id, body.position)
    })?))
}
