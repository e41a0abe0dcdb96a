//! Display implementation for todo-server messages.
//!
//! Keeps every piece of user-facing text in one match so HTTP responses, job
//! logs and CLI output stay consistent. Several strings are part of the HTTP
//! contract (clients match on them), so change them with care.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let text = match self {
            // === SERVER MESSAGES ===
            Message::ServerStarting(addr) => format!("Server listening on {}", addr),
            Message::ServerStopped => "Server stopped".to_string(),
            Message::ShutdownSignalReceived => "Shutdown signal received, draining connections".to_string(),
            Message::ApiKeyMissing => "API_KEY value is not set. Refusing to start without an API key".to_string(),
            Message::DatabaseOpened(path) => format!("Connected to the database at {}", path),
            Message::HelloWorld => "Hello World!".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
            Message::ConfigFileExists(path) => format!("Configuration file already exists: {}", path),
            Message::ConfigParseError(error) => format!("Failed to parse configuration: {}", error),
            Message::ConfigInvalidEnv(name, value) => format!("Invalid value '{}' for {}", value, name),

            // === TASK MESSAGES ===
            Message::TaskCreated => "Task created successfully".to_string(),
            Message::TaskUpdated => "Updated Task successfully.".to_string(),
            Message::TaskMetadataUpdated => "Updated Task metadata successfully.".to_string(),
            Message::TaskDeleted(id) => format!("Deleted task with ID {{{}}} successfully.", id),
            Message::TaskToggled(id) => format!("Toggled task with ID {{{}}} successfully.", id),
            Message::TaskImportantToggled => "Toggled Task's important".to_string(),
            Message::TaskMyDayToggled => "Toggled Task's Add to my day".to_string(),
            Message::TaskDueDateUpdated => "Due date updated successfully".to_string(),
            Message::TaskRecurrenceUpdated => "Recurrence updated successfully".to_string(),
            Message::TaskMoved => "Task moved successfully".to_string(),
            Message::TaskNotFound(id) => format!("Task with ID '{}' not found", id),
            Message::TaskAlreadyDeleted(id) => {
                format!("Task either already deleted or task with ID {{{}}} does not exist.", id)
            }
            Message::TaskUpdateMissing(id) => {
                format!("Updating task with ID {{{}}} failed. Task may not be available.", id)
            }
            Message::RecurringTaskCreated(from, next) => {
                format!("Task {} completed, created recurring task {}", from, next)
            }
            Message::InvalidTaskId => "Invalid task ID".to_string(),
            Message::InvalidDueDate => "Invalid Due Date".to_string(),
            Message::InvalidRecurrenceInterval => "Recurrence interval must be at least 1".to_string(),

            // === SUB-TASK MESSAGES ===
            Message::SubTaskCreated => "Sub-task created successfully".to_string(),
            Message::SubTaskUpdated => "Updated sub-task successfully.".to_string(),
            Message::SubTaskDeleted(id) => format!("Deleted sub-task with ID {{{}}} successfully.", id),
            Message::SubTaskToggled(id) => format!("Toggled sub-task with ID {{{}}} successfully.", id),
            Message::SubTaskNotFound(id) => format!("Sub-task with ID '{}' not found", id),
            Message::InvalidSubTaskId => "Invalid sub-task ID".to_string(),

            // === LIST MESSAGES ===
            Message::ListCreated => "List created successfully".to_string(),
            Message::ListUpdated => "Updated list successfully.".to_string(),
            Message::ListDeleted(id) => format!("Deleted list with ID {{{}}} successfully.", id),
            Message::ListNotFound(id) => format!("List with ID '{}' not found", id),
            Message::InvalidListId => "Invalid list ID".to_string(),

            // === REQUEST MESSAGES ===
            Message::InvalidRequestBody => "Invalid request body".to_string(),
            Message::InvalidFields => "One or more fields are invalid".to_string(),
            Message::InvalidApiKey => "Invalid API key".to_string(),
            Message::TooManyRequests => "Too many requests".to_string(),
            Message::InvalidSizeParameter => "Invalid size parameter".to_string(),
            Message::InternalError => "Oops!! Something bad happened.".to_string(),

            // === VALIDATION MESSAGES ===
            Message::FieldRequired(field) => format!("The {} field is required.", field),
            Message::FieldTooShort(field, min) => {
                format!("The {} field must be at least {} characters long.", field, min)
            }
            Message::FieldTooLong(field, max) => {
                format!("The {} field must be less than {} characters long.", field, max)
            }

            // === TITLE MESSAGES ===
            Message::UrlNotProvided => "URL is not provided".to_string(),
            Message::TitleFetchFailed => "Unable to fetch title of the link".to_string(),
            Message::TitleNotFound => "Title not found in the page".to_string(),
            Message::TitleRequestFailed(error) => format!("Fetching the page failed: {}", error),
            Message::BrowserTitleFailed(error) => format!("Fetching Title using headless browser failed: {}", error),
            Message::BrowserUnavailable => "Headless browser is not configured, using plain HTTP".to_string(),
            Message::SyncingUrlTitles => "Syncing URL Titles...".to_string(),
            Message::NoUrlTitles => "No urls found".to_string(),
            Message::UrlTitleSyncing(url) => format!("Syncing {}", url),
            Message::UrlTitleUnchanged(title) => format!("`{}` is unchanged", title),
            Message::UrlTitleEmpty(url) => format!("{} URL title not available. Got empty", url),
            Message::UrlTitleSaved(title, url) => format!("Saving new title: `{}` for URL: {}", title, url),
            Message::UrlTitleSyncFailed(url, error) => format!("Failed to fetch title for {}: {}", url, error),
            Message::UrlTitlesSyncCompleted(count) => format!("Syncing completed. {} title(s) updated", count),

            // === QUOTE MESSAGES ===
            Message::QuotesLoadedFromNotion(count) => format!("Loaded {} quotes from Notion", count),
            Message::NotionFetchFailed(error) => format!("Fetching quotes from Notion failed: {}", error),
            Message::NotionNotConfigured => "Notion is not configured (NOTION_SECRET_TOKEN, NOTION_DATABASE)".to_string(),

            // === EMAIL MESSAGES ===
            Message::EmailSent(subject) => format!("Email sent: {}", subject),
            Message::EmailSendFailed(subject, error) => format!("Sending email '{}' failed: {}", subject, error),
            Message::EmailNotConfigured => "Email is not configured (FROM_EMAIL, EMAIL_PASSWORD, TO_EMAIL)".to_string(),

            // === BACKUP MESSAGES ===
            Message::BackupSent => "Backup successful".to_string(),
            Message::BackupWritten(path) => format!("Backup written to {}", path),

            // === SCHEDULER MESSAGES ===
            Message::SchedulerStarted(offset) => format!("Cron jobs have been set up successfully (UTC{})", offset),
            Message::JobStarted(name) => format!("Running job: {}", name),
            Message::JobFailed(name, error) => format!("Job '{}' failed: {}", name, error),
            Message::JobSkipped(name) => format!("Skipping job '{}': email is not configured", name),
            Message::RequestLogsTruncated(count) => format!("Deleted {} request log rows", count),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseVersion(version) => format!("Current database version: {}", version),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database schema needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
        };

        write!(f, "{}", text)
    }
}
