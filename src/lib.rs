//! # todo-server
//!
//! A personal to-do backend: tasks with sub-tasks, lists, "my day" and
//! recurring tasks behind an API-key protected HTTP API, plus daily email
//! digests and CSV backups driven by an in-process scheduler.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todo_server::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
pub mod server;
