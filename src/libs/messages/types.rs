//! Message type definitions for todo-server.
//!
//! Every user-facing string the server produces (HTTP response messages, log
//! lines of the scheduled jobs, CLI output) is a variant of [`Message`]. The
//! text lives in `display.rs`.

#[derive(Debug, Clone)]
pub enum Message {
    // === SERVER MESSAGES ===
    ServerStarting(String), // bind address
    ServerStopped,
    ShutdownSignalReceived,
    ApiKeyMissing,
    DatabaseOpened(String), // path
    HelloWorld,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved(String),      // path
    ConfigFileExists(String), // path
    ConfigParseError(String), // error
    ConfigInvalidEnv(String, String), // variable, value

    // === TASK MESSAGES ===
    TaskCreated,
    TaskUpdated,
    TaskMetadataUpdated,
    TaskDeleted(i64),
    TaskToggled(i64),
    TaskImportantToggled,
    TaskMyDayToggled,
    TaskDueDateUpdated,
    TaskRecurrenceUpdated,
    TaskMoved,
    TaskNotFound(i64),
    TaskAlreadyDeleted(i64),
    TaskUpdateMissing(i64),
    RecurringTaskCreated(i64, i64), // completed task, follow-up task
    InvalidTaskId,
    InvalidDueDate,
    InvalidRecurrenceInterval,

    // === SUB-TASK MESSAGES ===
    SubTaskCreated,
    SubTaskUpdated,
    SubTaskDeleted(i64),
    SubTaskToggled(i64),
    SubTaskNotFound(i64),
    InvalidSubTaskId,

    // === LIST MESSAGES ===
    ListCreated,
    ListUpdated,
    ListDeleted(i64),
    ListNotFound(i64),
    InvalidListId,

    // === REQUEST MESSAGES ===
    InvalidRequestBody,
    InvalidFields,
    InvalidApiKey,
    TooManyRequests,
    InvalidSizeParameter,
    InternalError,

    // === VALIDATION MESSAGES ===
    FieldRequired(String),            // field
    FieldTooShort(String, usize),     // field, min
    FieldTooLong(String, usize),      // field, max

    // === TITLE MESSAGES ===
    UrlNotProvided,
    TitleFetchFailed,
    TitleNotFound,
    TitleRequestFailed(String),       // error
    BrowserTitleFailed(String),       // error
    BrowserUnavailable,
    SyncingUrlTitles,
    NoUrlTitles,
    UrlTitleSyncing(String),          // url
    UrlTitleUnchanged(String),        // title
    UrlTitleEmpty(String),            // url
    UrlTitleSaved(String, String),    // title, url
    UrlTitleSyncFailed(String, String), // url, error
    UrlTitlesSyncCompleted(usize),    // updated count

    // === QUOTE MESSAGES ===
    QuotesLoadedFromNotion(usize),
    NotionFetchFailed(String),
    NotionNotConfigured,

    // === EMAIL MESSAGES ===
    EmailSent(String),                // subject
    EmailSendFailed(String, String),  // subject, error
    EmailNotConfigured,

    // === BACKUP MESSAGES ===
    BackupSent,
    BackupWritten(String),            // path

    // === SCHEDULER MESSAGES ===
    SchedulerStarted(String),         // timezone offset
    JobStarted(String),               // job name
    JobFailed(String, String),        // job name, error
    JobSkipped(String),               // job name
    RequestLogsTruncated(usize),

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationCompleted(u32),       // version
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
}
