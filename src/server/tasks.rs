use super::error::{parse_id, ApiError, ApiResult, DataResponse, JsonBody, MessageResponse};
use super::AppState;
use crate::db::lists::Lists;
use crate::db::tasks::Tasks;
use crate::libs::messages::Message;
use crate::libs::task::{DueDate, MoveToList, NewTask, Recurrence, Task, TaskMetadata, TaskName, TaskQuery, TaskQueryParams};
use crate::libs::validate::{is_valid_due_date, is_valid_recurrence_interval, validate_name};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

fn task_id(raw: &str) -> ApiResult<i64> {
    parse_id(raw, Message::InvalidTaskId)
}

fn found(updated: bool, id: i64) -> ApiResult<()> {
    if updated {
        Ok(())
    } else {
        Err(ApiError::not_found(Message::TaskNotFound(id)))
    }
}

pub async fn list_tasks(State(state): State<AppState>, Query(params): Query<TaskQueryParams>) -> ApiResult<Json<DataResponse<Vec<Task>>>> {
    let query = TaskQuery::from(params);
    let today = state.config.today();
    let db = state.db.lock();
    let tasks = Tasks::new(&db.conn).fetch(&query, today)?;
    Ok(Json(DataResponse { data: tasks }))
}

pub async fn create_task(State(state): State<AppState>, JsonBody(task): JsonBody<NewTask>) -> ApiResult<impl IntoResponse> {
    let invalid = validate_name(&task.name);
    if !invalid.is_empty() {
        return Err(ApiError::Validation(invalid));
    }
    if !is_valid_due_date(&task.due_date) {
        return Err(ApiError::bad_request(Message::InvalidDueDate));
    }

    let db = state.db.lock();
    if let Some(list_id) = task.list_id {
        if Lists::new(&db.conn).get(list_id)?.is_none() {
            return Err(ApiError::not_found(Message::ListNotFound(list_id)));
        }
    }
    Tasks::new(&db.conn).insert(&task)?;

    Ok((StatusCode::CREATED, MessageResponse::new(Message::TaskCreated)))
}

pub async fn get_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<DataResponse<Task>>> {
    let id = task_id(&id)?;
    let db = state.db.lock();
    match Tasks::new(&db.conn).get(id)? {
        Some(task) => Ok(Json(DataResponse { data: task })),
        None => Err(ApiError::not_found(Message::TaskNotFound(id))),
    }
}

pub async fn update_task(State(state): State<AppState>, Path(id): Path<String>, JsonBody(body): JsonBody<TaskName>) -> ApiResult<impl IntoResponse> {
    let id = task_id(&id)?;
    let invalid = validate_name(&body.name);
    if !invalid.is_empty() {
        return Err(ApiError::Validation(invalid));
    }

    let db = state.db.lock();
    if !Tasks::new(&db.conn).update_name(id, &body.name)? {
        return Err(ApiError::not_found(Message::TaskUpdateMissing(id)));
    }
    Ok(MessageResponse::new(Message::TaskUpdated))
}

pub async fn update_task_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<TaskMetadata>,
) -> ApiResult<impl IntoResponse> {
    let id = task_id(&id)?;
    let db = state.db.lock();
    if !Tasks::new(&db.conn).update_metadata(id, &body.metadata)? {
        return Err(ApiError::not_found(Message::TaskUpdateMissing(id)));
    }
    Ok(MessageResponse::new(Message::TaskMetadataUpdated))
}

pub async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<impl IntoResponse> {
    let id = task_id(&id)?;
    let db = state.db.lock();
    if !Tasks::new(&db.conn).delete(id)? {
        return Err(ApiError::bad_request(Message::TaskAlreadyDeleted(id)));
    }
    Ok(MessageResponse::new(Message::TaskDeleted(id)))
}

pub async fn set_due_date(State(state): State<AppState>, Path(id): Path<String>, JsonBody(body): JsonBody<DueDate>) -> ApiResult<impl IntoResponse> {
    let id = task_id(&id)?;
    if !is_valid_due_date(&body.due_date) {
        return Err(ApiError::bad_request(Message::InvalidDueDate));
    }

    let db = state.db.lock();
    found(Tasks::new(&db.conn).set_due_date(id, &body.due_date)?, id)?;
    Ok(MessageResponse::new(Message::TaskDueDateUpdated))
}

pub async fn toggle_completed(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<impl IntoResponse> {
    let id = task_id(&id)?;
    let now = state.config.now();
    let db = state.db.lock();
    match Tasks::new(&db.conn).toggle_completed(id, now)? {
        Some(_) => Ok(MessageResponse::new(Message::TaskToggled(id))),
        None => Err(ApiError::not_found(Message::TaskNotFound(id))),
    }
}

pub async fn toggle_important(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<impl IntoResponse> {
    let id = task_id(&id)?;
    let db = state.db.lock();
    found(Tasks::new(&db.conn).toggle_important(id)?, id)?;
    Ok(MessageResponse::new(Message::TaskImportantToggled))
}

pub async fn toggle_my_day(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<impl IntoResponse> {
    let id = task_id(&id)?;
    let now = state.config.now();
    let db = state.db.lock();
    found(Tasks::new(&db.conn).toggle_my_day(id, now)?, id)?;
    Ok(MessageResponse::new(Message::TaskMyDayToggled))
}

pub async fn set_recurrence(State(state): State<AppState>, Path(id): Path<String>, JsonBody(body): JsonBody<Recurrence>) -> ApiResult<impl IntoResponse> {
    let id = task_id(&id)?;

    // Without a pattern the interval is meaningless, so both are cleared.
    let (pattern, interval) = match body.recurrence_pattern {
        Some(pattern) => {
            let interval = body.recurrence_interval.unwrap_or(1);
            if !is_valid_recurrence_interval(interval) {
                return Err(ApiError::bad_request(Message::InvalidRecurrenceInterval));
            }
            (Some(pattern), Some(interval))
        }
        None => (None, None),
    };

    let db = state.db.lock();
    found(Tasks::new(&db.conn).set_recurrence(id, pattern, interval)?, id)?;
    Ok(MessageResponse::new(Message::TaskRecurrenceUpdated))
}

pub async fn move_to_list(State(state): State<AppState>, Path(id): Path<String>, JsonBody(body): JsonBody<MoveToList>) -> ApiResult<impl IntoResponse> {
    let id = task_id(&id)?;
    let db = state.db.lock();
    if let Some(list_id) = body.list_id {
        if Lists::new(&db.conn).get(list_id)?.is_none() {
            return Err(ApiError::not_found(Message::ListNotFound(list_id)));
        }
    }
    found(Tasks::new(&db.conn).move_to_list(id, body.list_id)?, id)?;
    Ok(MessageResponse::new(Message::TaskMoved))
}
