//! Page title lookup for links stored in tasks.
//!
//! A headless browser is tried first because many sites only set their title
//! from client-side scripts. When it is unavailable or yields nothing, the page
//! is fetched over plain HTTP and its `<title>` element is parsed.

use crate::db::db::SharedDb;
use crate::db::url_titles::UrlTitles;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_info, msg_success, msg_warning};
use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Something that can render a page and report `document.title`.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn page_title(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Error)]
pub enum TitleError {
    /// The page answered with a non-200 status.
    #[error("{}", Message::TitleFetchFailed)]
    Unprocessable(StatusCode),
    #[error("{}", Message::TitleNotFound)]
    NotFound,
    #[error("{}", Message::TitleRequestFailed(.0.clone()))]
    Request(String),
}

pub struct TitleFetcher {
    browser: Option<Arc<dyn Browser>>,
    client: Client,
}

impl TitleFetcher {
    pub fn new(browser: Option<Arc<dyn Browser>>) -> Self {
        TitleFetcher {
            browser,
            client: Client::new(),
        }
    }

    /// HTTP-only fetcher.
    pub fn without_browser() -> Self {
        Self::new(None)
    }

    pub async fn fetch(&self, url: &str) -> Result<String, TitleError> {
        if let Some(browser) = &self.browser {
            match browser.page_title(url).await {
                Ok(title) if !title.trim().is_empty() => return Ok(title.trim().to_string()),
                Ok(_) => msg_debug!(Message::UrlTitleEmpty(url.to_string())),
                Err(e) => msg_warning!(Message::BrowserTitleFailed(e.to_string())),
            }
        }

        self.fetch_over_http(url).await
    }

    pub async fn fetch_over_http(&self, url: &str) -> Result<String, TitleError> {
        let response = self
            .client
            .get(url)
            .headers(browser_headers())
            .send()
            .await
            .map_err(|e| TitleError::Request(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(TitleError::Unprocessable(response.status()));
        }

        let body = response.text().await.map_err(|e| TitleError::Request(e.to_string()))?;
        extract_title(&body).ok_or(TitleError::NotFound)
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DESKTOP_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert("DNT", HeaderValue::from_static("1"));
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers
}

fn title_regex() -> Option<&'static Regex> {
    static TITLE: OnceLock<Option<Regex>> = OnceLock::new();
    TITLE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").ok()).as_ref()
}

fn entity_regex() -> Option<&'static Regex> {
    static ENTITY: OnceLock<Option<Regex>> = OnceLock::new();
    ENTITY.get_or_init(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").ok()).as_ref()
}

/// Text of the first `<title>` element with whitespace collapsed and HTML
/// entities decoded. `None` when there is no non-empty title.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = title_regex()?.captures(html)?.get(1)?.as_str();
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let title = decode_entities(&collapsed);

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn decode_entities(text: &str) -> String {
    let Some(entities) = entity_regex() else {
        return text.to_string();
    };
    entities
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ if entity.starts_with('#') => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
                _ => None,
            };
            decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Re-fetches cached titles that are empty or were marked invalid and saves
/// the ones that changed. Returns how many rows were updated.
pub async fn sync_url_titles(db: &SharedDb, fetcher: &TitleFetcher) -> Result<usize> {
    msg_info!(Message::SyncingUrlTitles);

    let cached = {
        let db = db.lock();
        UrlTitles::new(&db.conn).all()?
    };

    if cached.is_empty() {
        msg_info!(Message::NoUrlTitles);
        return Ok(0);
    }

    let mut updated = 0;
    for entry in cached.iter().filter(|entry| !entry.is_valid || entry.title.is_empty()) {
        msg_debug!(Message::UrlTitleSyncing(entry.url.clone()));

        let title = match fetcher.fetch(&entry.url).await {
            Ok(title) => title,
            Err(e) => {
                msg_warning!(Message::UrlTitleSyncFailed(entry.url.clone(), e.to_string()));
                continue;
            }
        };

        if title == entry.title {
            msg_debug!(Message::UrlTitleUnchanged(title));
            continue;
        }

        msg_info!(Message::UrlTitleSaved(title.clone(), entry.url.clone()));
        {
            let db = db.lock();
            UrlTitles::new(&db.conn).save_or_update(&title, &entry.url, true)?;
        }
        updated += 1;
    }

    msg_success!(Message::UrlTitlesSyncCompleted(updated));
    Ok(updated)
}

#[cfg(feature = "browser")]
pub mod chrome {
    use super::Browser;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use headless_chrome::LaunchOptions;
    use std::path::PathBuf;
    use std::time::Duration;

    /// Headless Chrome launched per lookup from an explicit binary path.
    pub struct HeadlessChrome {
        chrome_path: PathBuf,
        settle: Duration,
    }

    impl HeadlessChrome {
        pub fn new(chrome_path: PathBuf, settle: Duration) -> Self {
            HeadlessChrome { chrome_path, settle }
        }

        fn title_blocking(chrome_path: PathBuf, settle: Duration, url: String) -> Result<String> {
            let options = LaunchOptions::default_builder()
                .path(Some(chrome_path))
                .build()
                .map_err(|e| anyhow!(e.to_string()))?;
            let browser = headless_chrome::Browser::new(options)?;
            let tab = browser.new_tab()?;
            tab.navigate_to(&url)?;
            tab.wait_for_element("body")?;
            // Give client-side scripts time to set the final title.
            std::thread::sleep(settle);
            Ok(tab.get_title()?)
        }
    }

    #[async_trait]
    impl Browser for HeadlessChrome {
        async fn page_title(&self, url: &str) -> Result<String> {
            let chrome_path = self.chrome_path.clone();
            let settle = self.settle;
            let url = url.to_string();
            tokio::task::spawn_blocking(move || Self::title_blocking(chrome_path, settle, url)).await?
        }
    }
}

/// Browser configured for this build and config, if any.
pub fn configured_browser(config: &crate::libs::config::Config) -> Option<Arc<dyn Browser>> {
    #[cfg(feature = "browser")]
    {
        if let Some(path) = &config.browser.chrome_path {
            let settle = std::time::Duration::from_millis(config.browser.settle_millis);
            return Some(Arc::new(chrome::HeadlessChrome::new(path.clone(), settle)));
        }
    }
    #[cfg(not(feature = "browser"))]
    let _ = config;

    msg_debug!(Message::BrowserUnavailable);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_decodes_title() {
        let html = "<html><head><TITLE data-x=\"1\">\n  Rust &amp; Friends &#8212; Blog&#x21;\n</TITLE></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Rust & Friends \u{2014} Blog!"));
    }

    #[test]
    fn missing_or_empty_title_is_none() {
        assert_eq!(extract_title("<html><body>hi</body></html>"), None);
        assert_eq!(extract_title("<title>   </title>"), None);
    }

    #[test]
    fn unknown_entities_are_kept() {
        assert_eq!(decode_entities("a &bogus; b"), "a &bogus; b");
    }
}
