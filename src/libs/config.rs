//! Configuration management for todo-server.
//!
//! Configuration is resolved in three layers:
//!
//! 1. Built-in defaults (`Config::default()`)
//! 2. An optional JSON file: `$TODO_CONFIG`, or `config.json` in the platform
//!    data directory
//! 3. Environment variables (a `.env` file in the working directory is loaded
//!    first), using the names the deployment has always used:
//!    `API_KEY`, `DATABASE_PATH`, `BIND_ADDRESS`, `PORT`, `FROM_EMAIL`,
//!    `EMAIL_PASSWORD`, `TO_EMAIL`, `SMTP_HOST`, `SMTP_PORT`, `CHROME_PATH`,
//!    `NOTION_SECRET_TOKEN`, `NOTION_DATABASE`, `RATE_LIMIT_PER_MINUTE`,
//!    `RATE_LIMIT_BURST`, `TZ_OFFSET_MINUTES`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todo_server::libs::config::Config;
//!
//! let config = Config::read()?;
//! let db_path = config.database_path()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "todo-server.db";

/// India Standard Time, the zone the daily jobs were always scheduled in.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

const MASK: &str = "********";

/// HTTP listener settings and the API key guarding `/api/v1` task routes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct DatabaseConfig {
    /// SQLite file. Falls back to `todo-server.db` in the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// SMTP sender credentials and the digest recipient.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EmailConfig {
    pub from_email: String,
    pub password: String,
    pub to_email: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BrowserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,
    /// Time given to client-side scripts before `document.title` is read.
    pub settle_millis: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NotionConfig {
    pub secret_token: String,
    pub database_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    pub per_minute: u32,
    pub burst: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub utc_offset_minutes: i32,
    pub sync_url_titles: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailConfig>,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notion: Option<NotionConfig>,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            api_key: None,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        EmailConfig {
            from_email: String::new(),
            password: String::new(),
            to_email: String::new(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        BrowserConfig {
            chrome_path: None,
            settle_millis: 2000,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig { per_minute: 120, burst: 30 }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            enabled: true,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            sync_url_titles: false,
        }
    }
}

impl EmailConfig {
    /// All three of sender, password and recipient are needed to send mail.
    pub fn is_complete(&self) -> bool {
        !self.from_email.is_empty() && !self.password.is_empty() && !self.to_email.is_empty()
    }
}

impl Config {
    /// Loads `.env`, the JSON config file (if any) and the environment.
    pub fn read() -> Result<Config> {
        let _ = dotenv::dotenv();

        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let config_str = fs::read_to_string(&path)?;
            serde_json::from_str(&config_str).map_err(|e| msg_error_anyhow!(Message::ConfigParseError(e.to_string())))?
        } else {
            Config::default()
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Location of the JSON config file.
    pub fn config_path() -> Result<PathBuf> {
        match std::env::var("TODO_CONFIG") {
            Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => DataStorage::new().get_path(CONFIG_FILE_NAME),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Overlays environment values on top of the current configuration.
    ///
    /// `lookup` returns the value of a variable, which keeps this testable
    /// without touching the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = get("API_KEY") {
            self.server.api_key = Some(key);
        }
        if let Some(addr) = get("BIND_ADDRESS") {
            self.server.bind_address = addr;
        }
        if let Some(port) = get("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(path) = get("DATABASE_PATH") {
            self.database.path = Some(PathBuf::from(path));
        }

        let from = get("FROM_EMAIL");
        let password = get("EMAIL_PASSWORD");
        let to = get("TO_EMAIL");
        let host = get("SMTP_HOST");
        let port = get("SMTP_PORT");
        if from.is_some() || password.is_some() || to.is_some() || host.is_some() || port.is_some() {
            let mut email = self.email.clone().unwrap_or_default();
            if let Some(from) = from {
                email.from_email = from;
            }
            if let Some(password) = password {
                email.password = password;
            }
            if let Some(to) = to {
                email.to_email = to;
            }
            if let Some(host) = host {
                email.smtp_host = host;
            }
            if let Some(port) = port {
                email.smtp_port = parse_env("SMTP_PORT", &port)?;
            }
            self.email = Some(email);
        }

        if let Some(path) = get("CHROME_PATH") {
            self.browser.chrome_path = Some(PathBuf::from(path));
        }

        match (get("NOTION_SECRET_TOKEN"), get("NOTION_DATABASE")) {
            (Some(secret_token), Some(database_id)) => {
                self.notion = Some(NotionConfig { secret_token, database_id });
            }
            (Some(secret_token), None) => {
                if let Some(notion) = self.notion.as_mut() {
                    notion.secret_token = secret_token;
                }
            }
            (None, Some(database_id)) => {
                if let Some(notion) = self.notion.as_mut() {
                    notion.database_id = database_id;
                }
            }
            (None, None) => {}
        }

        if let Some(per_minute) = get("RATE_LIMIT_PER_MINUTE") {
            self.rate_limit.per_minute = parse_env("RATE_LIMIT_PER_MINUTE", &per_minute)?;
        }
        if let Some(burst) = get("RATE_LIMIT_BURST") {
            self.rate_limit.burst = parse_env("RATE_LIMIT_BURST", &burst)?;
        }
        if let Some(offset) = get("TZ_OFFSET_MINUTES") {
            self.schedule.utc_offset_minutes = parse_env("TZ_OFFSET_MINUTES", &offset)?;
        }

        Ok(())
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => DataStorage::new().get_path(DB_FILE_NAME),
        }
    }

    /// Email settings, only when they are complete enough to send.
    pub fn email(&self) -> Option<&EmailConfig> {
        self.email.as_ref().filter(|email| email.is_complete())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.server.api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }

    /// Zone used for "today", completion timestamps and the job schedule.
    pub fn offset(&self) -> FixedOffset {
        // Out-of-range offsets (beyond a day) fall back to UTC.
        FixedOffset::east_opt(self.schedule.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset()).naive_local()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Copy safe to print: passwords and tokens replaced.
    pub fn masked(&self) -> Config {
        let mut config = self.clone();
        if config.server.api_key.is_some() {
            config.server.api_key = Some(MASK.to_string());
        }
        if let Some(email) = config.email.as_mut() {
            email.password = MASK.to_string();
        }
        if let Some(notion) = config.notion.as_mut() {
            notion.secret_token = MASK.to_string();
        }
        config
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| msg_error_anyhow!(Message::ConfigInvalidEnv(name.to_string(), value.to_string())))
}
