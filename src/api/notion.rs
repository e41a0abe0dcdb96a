//! Notion database client for pulling extra quotes.
//!
//! Each page in the configured database contributes the plain text of its
//! `Name` title property. Results are paged with Notion's cursor API.

use crate::libs::config::NotionConfig;
use anyhow::{bail, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const NOTION_API_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
/// Upper bound on page requests per fetch.
const MAX_REQUESTS: usize = 6;

#[derive(Debug, Default, Serialize)]
struct QueryPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    results: Vec<Page>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    properties: Properties,
}

/// Pages without a `Name` title contribute nothing.
#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(rename = "Name", default)]
    name: TitleProperty,
}

#[derive(Debug, Default, Deserialize)]
struct TitleProperty {
    #[serde(default)]
    title: Vec<RichText>,
}

#[derive(Debug, Deserialize)]
struct RichText {
    plain_text: String,
}

impl QueryResponse {
    pub(crate) fn quotes(&self) -> impl Iterator<Item = String> + '_ {
        self.results
            .iter()
            .flat_map(|page| page.properties.name.title.iter())
            .map(|text| text.plain_text.clone())
    }
}

#[derive(Debug)]
pub struct Notion {
    client: Client,
    config: NotionConfig,
    api_url: String,
}

impl Notion {
    pub fn new(config: &NotionConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
            api_url: NOTION_API_URL.to_string(),
        }
    }

    /// Points the client at another API host.
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub async fn fetch_quotes(&self) -> Result<Vec<String>> {
        let url = format!("{}/databases/{}/query", self.api_url, self.config.database_id);
        let mut payload = QueryPayload::default();
        let mut quotes = Vec::new();

        for _ in 0..MAX_REQUESTS {
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.config.secret_token)
                .header("Notion-Version", NOTION_VERSION)
                .json(&payload)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                bail!("Notion responded with {}: {}", status, body);
            }

            let page: QueryResponse = response.json().await?;
            quotes.extend(page.quotes());

            match (page.has_more, page.next_cursor) {
                (true, Some(cursor)) => payload.start_cursor = Some(cursor),
                _ => break,
            }
        }

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_title_fragment() {
        let body = r#"{
            "results": [
                {"properties": {"Name": {"title": [{"plain_text": "First"}]}}},
                {"properties": {"Name": {"title": [{"plain_text": "Second"}, {"plain_text": "Third"}]}}},
                {"properties": {"Name": {"title": []}}}
            ],
            "next_cursor": "abc",
            "has_more": true
        }"#;
        let response: QueryResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.quotes().collect::<Vec<_>>(), vec!["First", "Second", "Third"]);
        assert!(response.has_more);
        assert_eq!(response.next_cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn pages_without_name_are_skipped() {
        let body = r#"{
            "results": [
                {"properties": {"Name": {"title": [{"plain_text": "Keep"}]}}},
                {"properties": {"Title": {"title": [{"plain_text": "Ignored"}]}}},
                {}
            ]
        }"#;
        let response: QueryResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.quotes().collect::<Vec<_>>(), vec!["Keep"]);
        assert!(!response.has_more);
    }

    #[tokio::test]
    async fn fetch_quotes_follows_cursor() {
        use axum::http::HeaderMap;
        use axum::routing::post;
        use axum::{Json, Router};
        use serde_json::{json, Value};

        let app = Router::new().route(
            "/databases/{id}/query",
            post(|headers: HeaderMap, Json(payload): Json<Value>| async move {
                if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer secret") {
                    return Json(json!({"results": []}));
                }
                match payload.get("start_cursor").and_then(Value::as_str) {
                    None => Json(json!({
                        "results": [{"properties": {"Name": {"title": [{"plain_text": "One"}]}}}],
                        "next_cursor": "page-2",
                        "has_more": true
                    })),
                    Some(_) => Json(json!({
                        "results": [
                            {"properties": {"Name": {"title": [{"plain_text": "Two"}]}}},
                            {"properties": {}}
                        ],
                        "next_cursor": null,
                        "has_more": false
                    })),
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = NotionConfig {
            secret_token: "secret".into(),
            database_id: "quotes-db".into(),
        };
        let notion = Notion::new(&config).with_api_url(&format!("http://{}/", addr));

        assert_eq!(notion.fetch_quotes().await.unwrap(), vec!["One", "Two"]);
    }

    #[test]
    fn first_page_has_no_cursor() {
        assert_eq!(serde_json::to_string(&QueryPayload::default()).unwrap(), "{}");
        let next = QueryPayload {
            start_cursor: Some("abc".into()),
        };
        assert_eq!(serde_json::to_string(&next).unwrap(), r#"{"start_cursor":"abc"}"#);
    }
}
