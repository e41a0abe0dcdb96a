use super::error::ApiError;
use super::AppState;
use crate::db::request_logs::RequestLogs;
use crate::libs::messages::Message;
use crate::msg_warning;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use std::time::Instant;
use subtle::ConstantTimeEq;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rate-limit key used when the peer address is not known.
pub const UNKNOWN_CLIENT: &str = "unknown";

pub async fn require_api_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let provided = req.headers().get(API_KEY_HEADER).map(|v| v.as_bytes()).unwrap_or_default();
    let expected = state.api_key.as_bytes();

    if bool::from(provided.ct_eq(expected)) {
        next.run(req).await
    } else {
        ApiError::Unauthorized(Message::InvalidApiKey.to_string()).into_response()
    }
}

fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let key = client_key(&req);
    if state.limiter.check_key(&key).is_err() {
        return ApiError::TooManyRequests(Message::TooManyRequests.to_string()).into_response();
    }
    next.run(req).await
}

/// Appends one `request_logs` row per API request, rejected ones included.
pub async fn record_request(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let latency_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
    let db = state.db.lock();
    if let Err(e) = RequestLogs::new(&db.conn).insert(&method, &path, response.status().as_u16(), latency_ms) {
        msg_warning!(format!("{:#}", e));
    }

    response
}
