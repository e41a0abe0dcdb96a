use super::error::{parse_id, ApiError, ApiResult, DataResponse, JsonBody, MessageResponse};
use super::AppState;
use crate::db::sub_tasks::SubTasks;
use crate::libs::messages::Message;
use crate::libs::task::{NewSubTask, SubTask};
use crate::libs::validate::validate_name;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn list_sub_tasks(State(state): State<AppState>, Path(task_id): Path<String>) -> ApiResult<Json<DataResponse<Vec<SubTask>>>> {
    let task_id = parse_id(&task_id, Message::InvalidTaskId)?;
    let db = state.db.lock();
    let sub_tasks = SubTasks::new(&db.conn).list_for_task(task_id)?;
    Ok(Json(DataResponse { data: sub_tasks }))
}

pub async fn create_sub_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    JsonBody(body): JsonBody<NewSubTask>,
) -> ApiResult<impl IntoResponse> {
    let task_id = parse_id(&task_id, Message::InvalidTaskId)?;
    let invalid = validate_name(&body.name);
    if !invalid.is_empty() {
        return Err(ApiError::Validation(invalid));
    }

    let db = state.db.lock();
    match SubTasks::new(&db.conn).insert(task_id, &body.name)? {
        Some(_) => Ok((StatusCode::CREATED, MessageResponse::new(Message::SubTaskCreated))),
        None => Err(ApiError::not_found(Message::TaskNotFound(task_id))),
    }
}

pub async fn update_sub_task(State(state): State<AppState>, Path(id): Path<String>, JsonBody(body): JsonBody<NewSubTask>) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, Message::InvalidSubTaskId)?;
    let invalid = validate_name(&body.name);
    if !invalid.is_empty() {
        return Err(ApiError::Validation(invalid));
    }

    let db = state.db.lock();
    if !SubTasks::new(&db.conn).rename(id, &body.name)? {
        return Err(ApiError::not_found(Message::SubTaskNotFound(id)));
    }
    Ok(MessageResponse::new(Message::SubTaskUpdated))
}

pub async fn delete_sub_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, Message::InvalidSubTaskId)?;
    let db = state.db.lock();
    if !SubTasks::new(&db.conn).delete(id)? {
        return Err(ApiError::not_found(Message::SubTaskNotFound(id)));
    }
    Ok(MessageResponse::new(Message::SubTaskDeleted(id)))
}

pub async fn toggle_sub_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, Message::InvalidSubTaskId)?;
    let now = state.config.now();
    let db = state.db.lock();
    if !SubTasks::new(&db.conn).toggle_completed(id, now)? {
        return Err(ApiError::not_found(Message::SubTaskNotFound(id)));
    }
    Ok(MessageResponse::new(Message::SubTaskToggled(id)))
}
