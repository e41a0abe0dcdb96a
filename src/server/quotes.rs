use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::libs::messages::Message;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::Duration;

/// Delay between two streamed quotes.
pub const STREAM_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Default, Deserialize)]
pub struct QuotesParams {
    pub size: Option<String>,
    pub random: Option<String>,
    pub stream: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuotesResponse {
    pub quotes: Vec<String>,
    /// Size of the whole book, not of `quotes`.
    pub size: usize,
}

fn parse_size(raw: Option<&str>) -> ApiResult<usize> {
    match raw {
        None | Some("") => Ok(0),
        Some(raw) => {
            let size = raw.trim().parse::<i64>().map_err(|_| ApiError::bad_request(Message::InvalidSizeParameter))?;
            Ok(usize::try_from(size.max(0)).unwrap_or(usize::MAX))
        }
    }
}

pub async fn get_quotes(State(state): State<AppState>, Query(params): Query<QuotesParams>) -> ApiResult<Response> {
    let size = parse_size(params.size.as_deref())?;
    let random = params.random.as_deref() == Some("true");
    let quotes = state.quotes.select(size, random);

    if params.stream.as_deref() == Some("true") {
        let events = stream::iter(quotes.into_iter().enumerate()).then(|(idx, quote)| async move {
            if idx > 0 {
                tokio::time::sleep(STREAM_INTERVAL).await;
            }
            Ok::<_, Infallible>(format!("{}\n\n", quote))
        });

        let response = Response::builder()
            .header(CONTENT_TYPE, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .body(Body::from_stream(events))
            .map_err(anyhow::Error::from)?;
        return Ok(response);
    }

    Ok(Json(QuotesResponse {
        quotes,
        size: state.quotes.len(),
    })
    .into_response())
}
