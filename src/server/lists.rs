use super::error::{parse_id, ApiError, ApiResult, DataResponse, JsonBody, MessageResponse};
use super::AppState;
use crate::db::lists::Lists;
use crate::libs::messages::Message;
use crate::libs::task::{NewList, TaskList};
use crate::libs::validate::validate_name;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn list_lists(State(state): State<AppState>) -> ApiResult<Json<DataResponse<Vec<TaskList>>>> {
    let db = state.db.lock();
    let lists = Lists::new(&db.conn).list()?;
    Ok(Json(DataResponse { data: lists }))
}

pub async fn create_list(State(state): State<AppState>, JsonBody(body): JsonBody<NewList>) -> ApiResult<impl IntoResponse> {
    let invalid = validate_name(&body.name);
    if !invalid.is_empty() {
        return Err(ApiError::Validation(invalid));
    }

    let db = state.db.lock();
    Lists::new(&db.conn).insert(&body.name)?;
    Ok((StatusCode::CREATED, MessageResponse::new(Message::ListCreated)))
}

pub async fn get_list(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<DataResponse<TaskList>>> {
    let id = parse_id(&id, Message::InvalidListId)?;
    let db = state.db.lock();
    match Lists::new(&db.conn).get(id)? {
        Some(list) => Ok(Json(DataResponse { data: list })),
        None => Err(ApiError::not_found(Message::ListNotFound(id))),
    }
}

pub async fn update_list(State(state): State<AppState>, Path(id): Path<String>, JsonBody(body): JsonBody<NewList>) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, Message::InvalidListId)?;
    let invalid = validate_name(&body.name);
    if !invalid.is_empty() {
        return Err(ApiError::Validation(invalid));
    }

    let db = state.db.lock();
    if !Lists::new(&db.conn).rename(id, &body.name)? {
        return Err(ApiError::not_found(Message::ListNotFound(id)));
    }
    Ok(MessageResponse::new(Message::ListUpdated))
}

/// Deletes the list together with its tasks.
pub async fn delete_list(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, Message::InvalidListId)?;
    let db = state.db.lock();
    if !Lists::new(&db.conn).delete(id)? {
        return Err(ApiError::not_found(Message::ListNotFound(id)));
    }
    Ok(MessageResponse::new(Message::ListDeleted(id)))
}
