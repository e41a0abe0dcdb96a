//! Core library modules for todo-server.
//!
//! - **Infrastructure**: configuration, data storage, messaging
//! - **Tasks**: models and payloads, the list query builder, recurrence, validation
//! - **Content**: quotes, page titles
//! - **Outbound**: email, CSV backups, daily digests and the job scheduler

pub mod backup;
pub mod config;
pub mod data_storage;
pub mod digest;
pub mod email;
pub mod messages;
pub mod query;
pub mod quotes;
pub mod recurrence;
pub mod scheduler;
pub mod task;
pub mod title;
pub mod validate;
