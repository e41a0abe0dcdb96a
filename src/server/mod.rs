//! HTTP API.
//!
//! Public routes (`/`, `/health`, `/healthz`, hello-world and quotes) need no
//! credentials. Everything else under `/api/v1` requires the `x-api-key`
//! header. All `/api/` requests pass through the rate limiter and are recorded
//! in `request_logs`.

pub mod error;
pub mod health;
pub mod lists;
pub mod middleware;
pub mod quotes;
pub mod sub_tasks;
pub mod tasks;
pub mod titles;

use crate::db::db::SharedDb;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::quotes::QuoteBook;
use crate::libs::title::TitleFetcher;
use crate::{msg_bail_anyhow, msg_info};
use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub db: SharedDb,
    pub config: Arc<Config>,
    pub api_key: Arc<str>,
    pub quotes: Arc<QuoteBook>,
    pub titles: Arc<TitleFetcher>,
    pub limiter: Arc<DefaultKeyedRateLimiter<String>>,
}

impl AppState {
    /// Fails when no API key is configured; the server never runs open.
    pub fn new(db: SharedDb, config: Arc<Config>, quotes: Arc<QuoteBook>, titles: Arc<TitleFetcher>) -> Result<Self> {
        let api_key: Arc<str> = match config.api_key() {
            Some(key) if !key.is_empty() => Arc::from(key),
            _ => msg_bail_anyhow!(Message::ApiKeyMissing),
        };

        let per_minute = NonZeroU32::new(config.rate_limit.per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.rate_limit.burst).unwrap_or(NonZeroU32::MIN);
        let limiter = RateLimiter::keyed(Quota::per_minute(per_minute).allow_burst(burst));

        Ok(AppState {
            db,
            config,
            api_key,
            quotes,
            titles,
            limiter: Arc::new(limiter),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/v1/tasks", get(tasks::list_tasks))
        .route("/api/v1/task/create", post(tasks::create_task))
        .route("/api/v1/task/{id}", get(tasks::get_task).post(tasks::update_task).delete(tasks::delete_task))
        .route("/api/v1/task/{id}/metadata", post(tasks::update_task_metadata))
        .route("/api/v1/task/{id}/add/due-date", post(tasks::set_due_date))
        .route("/api/v1/task/{id}/completed/toggle", post(tasks::toggle_completed))
        .route("/api/v1/task/{id}/important/toggle", post(tasks::toggle_important))
        .route("/api/v1/task/{id}/add-to-my-day/toggle", post(tasks::toggle_my_day))
        .route("/api/v1/task/{id}/recurrence", post(tasks::set_recurrence))
        .route("/api/v1/task/{id}/list", post(tasks::move_to_list))
        .route("/api/v1/task/{id}/sub-tasks", get(sub_tasks::list_sub_tasks))
        .route("/api/v1/task/{id}/sub-task/create", post(sub_tasks::create_sub_task))
        .route("/api/v1/sub-task/{id}", post(sub_tasks::update_sub_task).delete(sub_tasks::delete_sub_task))
        .route("/api/v1/sub-task/{id}/completed/toggle", post(sub_tasks::toggle_sub_task))
        .route("/api/v1/lists", get(lists::list_lists))
        .route("/api/v1/list/create", post(lists::create_list))
        .route("/api/v1/list/{id}", get(lists::get_list).post(lists::update_list).delete(lists::delete_list))
        .route("/api/v1/fetch-title", get(titles::fetch_title))
        .route("/api/v1/url-titles", get(titles::list_url_titles))
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), middleware::require_api_key));

    let api = Router::new()
        .route("/api/v1/hello-world", get(health::hello_world))
        .route("/api/v1/quotes", get(quotes::get_quotes))
        .merge(protected)
        .layer(axum::middleware::from_fn_with_state(state.clone(), middleware::rate_limit))
        .layer(axum::middleware::from_fn_with_state(state.clone(), middleware::record_request));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/healthz", get(health::healthz))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        msg_info!(Message::ShutdownSignalReceived);
    }
}

/// Binds the configured address and serves until Ctrl+C.
pub async fn serve(state: AppState) -> Result<()> {
    let address = state.config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    msg_info!(Message::ServerStarting(address));

    let app = router(state);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    msg_info!(Message::ServerStopped);
    Ok(())
}
