//! SQLite persistence for tasks, lists and the server's bookkeeping tables.
//!
//! [`db::Db`] owns the connection and applies [`migrations`] on open. The
//! repositories borrow that connection, so callers holding the shared lock
//! build them on the fly:
//!
//! ```rust,no_run
//! use todo_server::db::{db::Db, tasks::Tasks};
//! use todo_server::libs::task::NewTask;
//!
//! let db = Db::in_memory()?;
//! let id = Tasks::new(&db.conn).insert(&NewTask::new("Water the plants"))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod db;

/// Versioned schema changes and their history.
pub mod migrations;

pub mod lists;
pub mod request_logs;
pub mod sub_tasks;

/// Task CRUD, toggles and recurrence.
pub mod tasks;

pub mod url_titles;
