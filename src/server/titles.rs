use super::error::{ApiError, ApiResult, DataResponse};
use super::AppState;
use crate::db::url_titles::{UrlTitle, UrlTitles};
use crate::libs::messages::Message;
use crate::libs::title::TitleError;
use axum::extract::{Query, State};
use axum::http::header::CACHE_CONTROL;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct FetchTitleParams {
    pub url: Option<String>,
}

/// Looks up the page title, caching both hits and failures. Failed URLs are
/// stored as invalid so the title sync job can retry them.
pub async fn fetch_title(State(state): State<AppState>, Query(params): Query<FetchTitleParams>) -> ApiResult<impl IntoResponse> {
    let url = params.url.map(|u| u.trim().to_string()).unwrap_or_default();
    if url.is_empty() {
        return Err(ApiError::bad_request(Message::UrlNotProvided));
    }

    let result = state.titles.fetch(&url).await;

    {
        let db = state.db.lock();
        let cache = UrlTitles::new(&db.conn);
        match &result {
            Ok(title) => cache.save_or_update(title, &url, true)?,
            // A known good title survives a transient failure.
            Err(_) if cache.get(&url)?.is_some_and(|cached| cached.is_valid) => {}
            Err(_) => cache.save_or_update("", &url, false)?,
        }
    }

    match result {
        Ok(title) => Ok(([(CACHE_CONTROL, "max-age=10, must-revalidate")], Json(DataResponse { data: title }))),
        Err(TitleError::Unprocessable(_)) => Err(ApiError::Unprocessable(Message::TitleFetchFailed.to_string())),
        Err(e) => Err(ApiError::BadRequest(e.to_string())),
    }
}

pub async fn list_url_titles(State(state): State<AppState>) -> ApiResult<Json<DataResponse<Vec<UrlTitle>>>> {
    let db = state.db.lock();
    let titles = UrlTitles::new(&db.conn).all()?;
    Ok(Json(DataResponse { data: titles }))
}
