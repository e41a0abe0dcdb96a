use super::AppState;
use crate::libs::messages::Message;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use rand::seq::IndexedRandom;

const ROOT_MESSAGES: &[&str] = &[
    "Nothing to see here. Just a wild goose chase. 🦢",
    "You have reached the end of the internet. Congratulations!",
    "404: Fun not found. Try again later!",
    "Welcome to the void. It is pretty empty here, huh?",
    "Under construction: please wear your hard hat at all times. 🚧",
    "You are lost, aren't you? Let's find our way back together.",
    "You are not supposed to see this page.",
];

const ROOT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en" style="height: 100%; background-color: white; font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Todo Server</title>
  </head>
  <body style="height: 100%; margin: 0;">
    <div style="height: 100%; display: flex; align-items: center; justify-content: center;">
      <h1 style="padding: 0; margin: 0; text-align: center;">{message}</h1>
    </div>
  </body>
</html>
"#;

pub async fn root() -> Html<String> {
    let message = ROOT_MESSAGES.choose(&mut rand::rng()).copied().unwrap_or_default();
    Html(ROOT_PAGE.replace("{message}", message))
}

pub async fn health() -> &'static str {
    "OK"
}

/// Liveness plus a database round trip.
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    let db = state.db.lock();
    match db.ping() {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "NOT OK"),
    }
}

pub async fn hello_world() -> String {
    Message::HelloWorld.to_string()
}
